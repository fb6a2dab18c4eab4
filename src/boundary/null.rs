//! In-process boundary doubles.
//!
//! [`NullBoundary`] answers every request with the cheapest legal reply and
//! never produces frame output. It backs headless runs and most tests.
//! [`RecordingBoundary`] adds a call log on top for asserting what crossed
//! the wire, and in what order.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::boundary::NativeBoundary;
use crate::protocol::{Method, PendingCall, WireReply, WireRequest};

/// Boundary that allocates handles from local counters and reports empty
/// frames. No layout, no rendering.
#[derive(Default)]
pub struct NullBoundary {
    next_node: u64,
    next_style: u64,
}

impl NullBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    fn retval(&mut self, method: Method) -> Value {
        match method {
            Method::CreateElementNode | Method::CreateTextNode => {
                self.next_node += 1;
                json!(self.next_node)
            }
            Method::RegisterStyle => {
                self.next_style += 1;
                json!(self.next_style)
            }
            Method::GetFrameDiff | Method::PostFrameDiff => json!({ "polledEvents": [] }),
            Method::GetResourceUpdates => json!({ "resourceUpdates": [] }),
            Method::PollEvents => json!({ "polledEvents": [] }),
            Method::CollectGarbage => json!(0),
            _ => Value::Null,
        }
    }
}

impl NativeBoundary for NullBoundary {
    fn handle(&mut self, request: WireRequest) -> anyhow::Result<Option<WireReply>> {
        // Batched voids only bump counters where relevant; their retvals
        // have nowhere to go.
        for call in &request.batch {
            let _ = self.retval(call.method);
        }

        let retval = self.retval(request.method);
        Ok(request.id.map(|id| WireReply { id, retval }))
    }
}

/// [`NullBoundary`] plus a shared log of every call seen, batch entries
/// flattened in delivery order ahead of the correlated call itself.
pub struct RecordingBoundary {
    inner: NullBoundary,
    log: Arc<Mutex<Vec<PendingCall>>>,
}

impl RecordingBoundary {
    pub fn new() -> (Self, Arc<Mutex<Vec<PendingCall>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self { inner: NullBoundary::new(), log: Arc::clone(&log) },
            log,
        )
    }
}

impl NativeBoundary for RecordingBoundary {
    fn handle(&mut self, request: WireRequest) -> anyhow::Result<Option<WireReply>> {
        {
            let mut log = self.log.lock().unwrap();
            log.extend(request.batch.iter().cloned());
            log.push(PendingCall { method: request.method, args: request.args.clone() });
        }
        self.inner.handle(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlated(id: u64, method: Method, batch: Vec<PendingCall>) -> WireRequest {
        WireRequest { id: Some(id), batch, method, args: vec![] }
    }

    #[test]
    fn null_boundary_hands_out_sequential_handles() {
        let mut boundary = NullBoundary::new();

        let first = boundary.handle(correlated(1, Method::CreateElementNode, vec![])).unwrap();
        let second = boundary.handle(correlated(2, Method::CreateTextNode, vec![])).unwrap();

        assert_eq!(first.unwrap().retval, json!(1));
        assert_eq!(second.unwrap().retval, json!(2));
    }

    #[test]
    fn recording_boundary_logs_batch_before_the_correlated_call() {
        let (mut boundary, log) = RecordingBoundary::new();

        let batch = vec![
            PendingCall { method: Method::AppendChild, args: vec![json!(1), json!(2)] },
            PendingCall { method: Method::SetTextContent, args: vec![json!(2), json!("hi")] },
        ];
        boundary.handle(correlated(1, Method::GetFrameDiff, batch)).unwrap();

        let seen: Vec<Method> = log.lock().unwrap().iter().map(|c| c.method).collect();
        assert_eq!(
            seen,
            vec![Method::AppendChild, Method::SetTextContent, Method::GetFrameDiff],
        );
    }
}
