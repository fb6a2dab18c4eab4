//! Per-frame exchange with the engine.
//!
//! One task owns the frame cadence. Each tick runs a full cycle before the
//! next begins, so at most one frame request is ever in flight: commit the
//! correlated frame call (flushing all queued voids with it), await the
//! engine's reply, then apply the results. In remote mode the engine
//! presents frames itself and only polled events come back; in local mode
//! the reply carries resource updates and a display-list diff for an
//! attached [`Renderer`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::errors::BridgeError;
use crate::events::EventManager;
use crate::protocol::{FrameResult, Method};
use crate::transport::Transport;

/// Where frame output lands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// The engine owns presentation; only events flow back.
    Remote,
    /// Frame diffs flow back to a host-attached renderer.
    Local,
}

/// Consumer of local-mode frame output.
pub trait Renderer: Send {
    fn insert_resource_updates(&mut self, updates: serde_json::Value);
    fn apply_display_list_diff(&mut self, diff: serde_json::Value);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FramePhase {
    Idle,
    Committing,
    AwaitingNative,
    Applying,
}

pub enum PipelineCommand {
    Shutdown,
}

pub struct FramePipeline {
    transport: Transport,
    events: EventManager,
    mode: RenderMode,
    renderer: Option<Box<dyn Renderer>>,
    phase: FramePhase,
}

impl FramePipeline {
    pub fn new(
        transport: Transport,
        events: EventManager,
        mode: RenderMode,
        renderer: Option<Box<dyn Renderer>>,
    ) -> Result<Self, BridgeError> {
        if mode == RenderMode::Local && renderer.is_none() {
            return Err(BridgeError::MissingRenderer);
        }

        Ok(Self {
            transport,
            events,
            mode,
            renderer,
            phase: FramePhase::Idle,
        })
    }

    /// Run the frame loop until shutdown. Ticks that land while a frame is
    /// still in flight are coalesced, never stacked.
    pub fn spawn(
        mut self,
        tick: Duration,
        mut commands: mpsc::UnboundedReceiver<PipelineCommand>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_frame().await,
                    command = commands.recv() => match command {
                        Some(PipelineCommand::Shutdown) | None => break,
                    },
                }
            }
            log::debug!("frame pipeline shut down");
        })
    }

    async fn run_frame(&mut self) {
        debug_assert_eq!(self.phase, FramePhase::Idle);

        self.phase = FramePhase::Committing;
        let method = match self.mode {
            RenderMode::Remote => Method::PostFrameDiff,
            RenderMode::Local => Method::GetFrameDiff,
        };
        let reply = self.transport.invoke_async(method, vec![]);

        self.phase = FramePhase::AwaitingNative;
        let retval = match reply.recv().await {
            Ok(retval) => retval,
            Err(e) => {
                log::warn!("frame exchange aborted: {e}");
                self.phase = FramePhase::Idle;
                return;
            }
        };

        self.phase = FramePhase::Applying;
        match FrameResult::from_retval(retval) {
            Ok(frame) => {
                self.events.dispatch(&frame.polled_events);

                if let Some(renderer) = self.renderer.as_mut() {
                    if let Some(updates) = frame.resource_updates {
                        renderer.insert_resource_updates(updates);
                    }
                    if let Some(diff) = frame.display_list_diff {
                        renderer.apply_display_list_diff(diff);
                    }
                }
            }
            Err(e) => log::warn!("discarding malformed frame reply: {e}"),
        }

        self.phase = FramePhase::Idle;
    }
}
