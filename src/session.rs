//! Session assembly and lifecycle.
//!
//! A [`BridgeSession`] wires one transport, one boundary task, one reply
//! pump and one frame pipeline together, and hands out the node, style and
//! event capabilities built on top. One session per host surface; a
//! [`SessionRegistry`] keeps the surface-to-session mapping so repeated
//! lookups reuse the live session instead of starting a second one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::boundary::{self, NativeBoundary};
use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::events::{RawKeyEvent, RawPointerEvent};
use crate::node::{ElementNode, NodeContext, TextNode};
use crate::pipeline::{FramePipeline, PipelineCommand, Renderer};
use crate::protocol::Method;
use crate::style::Rule;
use crate::transport::{self, Transport};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Where the rendered frame sits on the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostMount {
    pub offset_left: f64,
    pub offset_top: f64,
    pub frame_width: u32,
    pub frame_height: u32,
}

pub struct BridgeSession {
    id: SessionId,
    config: BridgeConfig,
    ctx: NodeContext,
    mounted: Mutex<bool>,
    pipeline_commands: mpsc::UnboundedSender<PipelineCommand>,
}

impl BridgeSession {
    /// Wire up a session and start its background tasks.
    pub fn start(
        config: BridgeConfig,
        native: Box<dyn NativeBoundary>,
        renderer: Option<Box<dyn Renderer>>,
    ) -> Result<Self, BridgeError> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let transport = Transport::new(request_tx);
        boundary::spawn(native, request_rx, reply_tx);
        transport::spawn_reply_pump(transport.clone(), reply_rx);

        let ctx = NodeContext::new(transport.clone());
        let pipeline = FramePipeline::new(
            transport,
            ctx.events.clone(),
            config.render_mode,
            renderer,
        )?;

        let (pipeline_commands, command_rx) = mpsc::unbounded_channel();
        pipeline.spawn(config.tick_interval, command_rx);

        let id = SessionId::new();
        log::info!("session {id} started in {:?} mode", config.render_mode);

        Ok(Self {
            id,
            config,
            ctx,
            mounted: Mutex::new(false),
            pipeline_commands,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }

    /// Attach to a host surface: record pointer offsets and announce the
    /// frame size. A session mounts once.
    pub fn mount(&self, mount: HostMount) -> Result<(), BridgeError> {
        {
            let mut mounted = self.mounted.lock().unwrap();
            if *mounted {
                return Err(BridgeError::AlreadyMounted);
            }
            *mounted = true;
        }

        self.ctx.events.update_offsets(mount.offset_left, mount.offset_top);
        self.ctx.transport.enqueue_void(
            Method::SetFrameSize,
            vec![json!(mount.frame_width), json!(mount.frame_height)],
        );
        Ok(())
    }

    /// Mount with the configured default geometry, offsets at the origin.
    pub fn mount_default(&self) -> Result<(), BridgeError> {
        self.mount(HostMount {
            offset_left: 0.0,
            offset_top: 0.0,
            frame_width: self.config.default_frame_width,
            frame_height: self.config.default_frame_height,
        })
    }

    pub fn create_element(&self, tag: &str) -> Result<ElementNode, BridgeError> {
        ElementNode::create(&self.ctx, tag)
    }

    pub fn create_text(&self, content: &str) -> TextNode {
        TextNode::create(&self.ctx, content)
    }

    pub fn ingest_stylesheet(&self, rules: &[Rule]) {
        self.ctx.styles.ingest_stylesheet(rules);
    }

    pub fn remove_rule(&self, selector: &str) {
        self.ctx.styles.remove_rule(selector);
    }

    pub fn forward_key_down(&self, event: &RawKeyEvent) {
        self.ctx.events.forward_key_down(event);
    }

    pub fn forward_key_press(&self, event: &RawKeyEvent) {
        self.ctx.events.forward_key_press(event);
    }

    pub fn forward_key_up(&self, event: &RawKeyEvent) {
        self.ctx.events.forward_key_up(event);
    }

    pub fn forward_pointer_move(&self, event: &RawPointerEvent) {
        self.ctx.events.forward_pointer_move(event);
    }

    pub fn forward_click(&self, event: &RawPointerEvent) {
        self.ctx.events.forward_click(event);
    }

    /// Hand a font to the engine's resource cache.
    pub fn load_font(&self, family: &str, source: Value) {
        self.ctx
            .transport
            .enqueue_void(Method::LoadFont, vec![json!(family), source]);
    }

    pub fn load_image(&self, url: &str) {
        self.ctx
            .transport
            .enqueue_void(Method::LoadImage, vec![json!(url)]);
    }

    pub fn print_diag(&self, message: &str) {
        self.ctx
            .transport
            .enqueue_void(Method::PrintDiag, vec![json!(message)]);
    }

    /// Ask the engine to release unreferenced nodes and styles. Returns
    /// how many it collected.
    pub async fn collect_garbage(&self) -> Result<u64, BridgeError> {
        let retval = self
            .ctx
            .transport
            .invoke_async(Method::CollectGarbage, vec![])
            .recv()
            .await?;
        retval
            .as_u64()
            .ok_or_else(|| BridgeError::MalformedReply(format!("not a count: {retval}")))
    }

    /// Stop the frame loop. Queued work that never rode a correlated call
    /// is dropped, matching the delivery contract.
    pub fn shutdown(&self) {
        log::info!("session {} shutting down", self.id);
        let _ = self.pipeline_commands.send(PipelineCommand::Shutdown);
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        let _ = self.pipeline_commands.send(PipelineCommand::Shutdown);
    }
}

/// Host-surface keyed session map.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<BridgeSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, surface: &str) -> Option<Arc<BridgeSession>> {
        self.sessions.lock().unwrap().get(surface).map(Arc::clone)
    }

    /// Return the session bound to `surface`, starting one with `start` if
    /// none exists yet.
    pub fn get_or_start(
        &self,
        surface: &str,
        start: impl FnOnce() -> Result<BridgeSession, BridgeError>,
    ) -> Result<Arc<BridgeSession>, BridgeError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get(surface) {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(start()?);
        sessions.insert(surface.to_string(), Arc::clone(&session));
        Ok(session)
    }

    /// Detach and shut down the session for `surface`, if any.
    pub fn remove(&self, surface: &str) -> Option<Arc<BridgeSession>> {
        let session = self.sessions.lock().unwrap().remove(surface);
        if let Some(session) = &session {
            session.shutdown();
        }
        session
    }
}
