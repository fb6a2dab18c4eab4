//! The native side of the wire.
//!
//! [`NativeBoundary`] is the seam a host implements to hand requests to the
//! actual engine process. [`spawn`] runs an implementation on its own task,
//! draining the request channel and pushing correlated replies back.

use tokio::sync::mpsc;

use crate::protocol::{WireReply, WireRequest};

pub mod null;

pub use null::{NullBoundary, RecordingBoundary};

/// Request handler for the engine side of the boundary.
///
/// `handle` receives every wire request, batch included, and returns a reply
/// for correlated requests. Returning `Ok(None)` for a correlated request
/// stalls its waiters; the protocol has no timeout.
pub trait NativeBoundary: Send {
    fn handle(&mut self, request: WireRequest) -> anyhow::Result<Option<WireReply>>;
}

/// Drive a boundary on its own task until the request channel closes.
pub fn spawn(
    mut boundary: Box<dyn NativeBoundary>,
    mut request_rx: mpsc::UnboundedReceiver<WireRequest>,
    reply_tx: mpsc::UnboundedSender<WireReply>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            match boundary.handle(request) {
                Ok(Some(reply)) => {
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::error!("native boundary failed: {e}"),
            }
        }
        log::debug!("native boundary task exiting");
    })
}
