//! Deferred native handles.
//!
//! Node creation is asynchronous: the controlling side keeps operating on a
//! node whose native id has not been assigned yet. [`Remote`] is the shared
//! slot those operations wait on — `Pending` with queued continuations, or
//! `Resolved` with the assigned value. A `Remote` resolves exactly once.

use std::sync::{Arc, Mutex};

use crate::protocol::NodeId;
use crate::transport::ReplyFuture;

type Continuation<T> = Box<dyn FnOnce(T) + Send>;

struct RemoteState<T> {
    value: Option<T>,
    waiters: Vec<Continuation<T>>,
}

/// A value assigned later by the native engine. Clones share one slot.
pub struct Remote<T> {
    state: Arc<Mutex<RemoteState<T>>>,
}

impl<T> Clone for Remote<T> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state) }
    }
}

impl<T: Clone + Send + 'static> Remote<T> {
    pub fn pending() -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState { value: None, waiters: Vec::new() })),
        }
    }

    pub fn resolved(value: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState { value: Some(value), waiters: Vec::new() })),
        }
    }

    /// Resolve the slot and run every queued continuation in registration
    /// order. A second resolution is ignored.
    pub fn resolve(&self, value: T) {
        let waiters = {
            let mut state = self.state.lock().unwrap();
            if state.value.is_some() {
                log::warn!("remote handle resolved twice; keeping first value");
                return;
            }
            state.value = Some(value.clone());
            std::mem::take(&mut state.waiters)
        };

        // Continuations run outside the lock so they may register further
        // waiters on this same slot.
        for waiter in waiters {
            waiter(value.clone());
        }
    }

    pub fn get(&self) -> Option<T> {
        self.state.lock().unwrap().value.clone()
    }

    /// Run `continuation` once the value is assigned; immediately if it
    /// already is. Registrations on one slot preserve their relative order.
    pub fn wait_for(&self, continuation: impl FnOnce(T) + Send + 'static) {
        let mut state = self.state.lock().unwrap();
        match state.value.clone() {
            Some(value) => {
                drop(state);
                continuation(value);
            }
            None => state.waiters.push(Box::new(continuation)),
        }
    }

    /// Run `continuation` once ALL slots resolve, passing values in input
    /// order regardless of resolution order.
    pub fn join(handles: &[Remote<T>], continuation: impl FnOnce(Vec<T>) + Send + 'static) {
        if handles.is_empty() {
            continuation(Vec::new());
            return;
        }

        struct Join<T, F> {
            slots: Vec<Option<T>>,
            remaining: usize,
            continuation: Option<F>,
        }

        let join = Arc::new(Mutex::new(Join {
            slots: vec![None; handles.len()],
            remaining: handles.len(),
            continuation: Some(continuation),
        }));

        for (index, handle) in handles.iter().enumerate() {
            let join = Arc::clone(&join);
            handle.wait_for(move |value| {
                let ready = {
                    let mut join = join.lock().unwrap();
                    join.slots[index] = Some(value);
                    join.remaining -= 1;
                    if join.remaining == 0 {
                        let slots = std::mem::take(&mut join.slots);
                        let continuation = join.continuation.take();
                        Some((slots, continuation))
                    } else {
                        None
                    }
                };

                if let Some((slots, Some(continuation))) = ready {
                    // Every slot is filled once remaining hits zero.
                    let values = slots.into_iter().flatten().collect();
                    continuation(values);
                }
            });
        }
    }
}

impl Remote<NodeId> {
    /// Bridge a create-node reply into a handle. One resolver task per
    /// creation; no implicit global loop.
    pub fn from_reply(reply: ReplyFuture) -> Self {
        let remote = Remote::pending();
        let resolver = remote.clone();

        tokio::spawn(async move {
            match reply.recv().await {
                Ok(retval) => match retval.as_u64() {
                    Some(id) => resolver.resolve(NodeId(id)),
                    // Leave the handle pending: dependent operations stall,
                    // matching the protocol's liveness contract.
                    None => log::warn!("create reply was not a handle: {retval}"),
                },
                Err(e) => log::warn!("create reply lost: {e}"),
            }
        });

        remote
    }
}
