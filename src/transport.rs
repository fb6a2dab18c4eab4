//! Command transport: correlation, batching, reply matching.
//!
//! Two call kinds cross the boundary. [`Transport::enqueue_void`] appends to
//! an in-memory batch and touches no channel. [`Transport::invoke_async`]
//! allocates the next correlation id, attaches the current batch to a single
//! [`WireRequest`], clears the batch and returns a [`ReplyFuture`] resolved
//! when the reply tagged with that id arrives.
//!
//! Void calls are therefore delivered only when piggybacked on a following
//! correlated call. The frame pipeline issues one correlated call per tick,
//! which flushes everything queued since the previous tick.
//!
//! There is no timeout and no retry: a correlated request that never
//! receives a reply stalls its waiters indefinitely. This is a documented
//! limitation of the protocol, not something this layer papers over.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::errors::BridgeError;
use crate::protocol::{Method, PendingCall, RequestId, WireReply, WireRequest};

struct TransportState {
    next_id: RequestId,
    batch: Vec<PendingCall>,
    waiting: HashMap<RequestId, oneshot::Sender<Value>>,
}

/// Cheaply clonable sender half of the command protocol. All clones share
/// one id sequence, one batch and one correlation table.
#[derive(Clone)]
pub struct Transport {
    state: Arc<Mutex<TransportState>>,
    request_tx: mpsc::UnboundedSender<WireRequest>,
}

impl Transport {
    pub fn new(request_tx: mpsc::UnboundedSender<WireRequest>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TransportState {
                next_id: 0,
                batch: Vec::new(),
                waiting: HashMap::new(),
            })),
            request_tx,
        }
    }

    /// Queue a pure side-effect call. No network activity happens here.
    pub fn enqueue_void(&self, method: Method, args: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state.batch.push(PendingCall { method, args });
    }

    /// Send one correlated request, fusing the queued batch into it.
    ///
    /// Allocating the id, snapshotting the batch and clearing it happen
    /// under one lock, so concurrent callers can never observe a half
    /// attached batch.
    pub fn invoke_async(&self, method: Method, args: Vec<Value>) -> ReplyFuture {
        let (reply_tx, reply_rx) = oneshot::channel();

        let request = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = state.next_id;
            state.waiting.insert(id, reply_tx);

            WireRequest {
                id: Some(id),
                batch: std::mem::take(&mut state.batch),
                method,
                args,
            }
        };

        if self.request_tx.send(request).is_err() {
            // The boundary task is gone. Per the protocol there is no
            // recovery path; the returned future simply never resolves,
            // which is surfaced as BoundaryGone when awaited.
            log::warn!("request channel closed; {method:?} will never resolve");
        }

        ReplyFuture { reply_rx }
    }

    /// Resolve the future matching `id`. A reply with an unknown id is
    /// dropped, non-fatal.
    pub fn on_reply(&self, id: RequestId, retval: Value) {
        let waiter = self.state.lock().unwrap().waiting.remove(&id);
        match waiter {
            // The receiver may have been dropped by a caller that did not
            // care about the retval; that is fine.
            Some(tx) => {
                let _ = tx.send(retval);
            }
            None => log::warn!("dropping reply with unknown id {id}"),
        }
    }

    /// Number of queued void calls. Test hook.
    #[cfg(test)]
    pub(crate) fn batch_len(&self) -> usize {
        self.state.lock().unwrap().batch.len()
    }
}

/// Future side of a correlated request.
pub struct ReplyFuture {
    reply_rx: oneshot::Receiver<Value>,
}

impl ReplyFuture {
    /// Wait for the reply. Resolves to [`BridgeError::BoundaryGone`] only
    /// when the owning transport itself is torn down.
    pub async fn recv(self) -> Result<Value, BridgeError> {
        self.reply_rx.await.map_err(|_| BridgeError::BoundaryGone)
    }
}

/// Pump replies from the boundary back into the correlation table. Runs
/// until the boundary drops its sender.
pub fn spawn_reply_pump(
    transport: Transport,
    mut reply_rx: mpsc::UnboundedReceiver<WireReply>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(reply) = reply_rx.recv().await {
            transport.on_reply(reply.id, reply.retval);
        }
    })
}
