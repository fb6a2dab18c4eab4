//! Shared wiring for async tests.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::boundary::{self, NativeBoundary, NullBoundary, RecordingBoundary};
use crate::protocol::PendingCall;
use crate::transport::{self, Transport};

/// Transport wired to an in-process boundary with a live reply pump.
pub fn wired_transport(native: Box<dyn NativeBoundary>) -> Transport {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();

    let transport = Transport::new(request_tx);
    boundary::spawn(native, request_rx, reply_tx);
    transport::spawn_reply_pump(transport.clone(), reply_rx);
    transport
}

pub fn null_transport() -> Transport {
    wired_transport(Box::new(NullBoundary::new()))
}

pub fn recording_transport() -> (Transport, Arc<Mutex<Vec<PendingCall>>>) {
    let (native, log) = RecordingBoundary::new();
    (wired_transport(Box::new(native)), log)
}

/// Poll `condition` until it holds, panicking after a generous deadline.
/// Keeps tests free of bare sleeps.
pub async fn eventually<F, Fut>(condition: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..500 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached within deadline");
}
