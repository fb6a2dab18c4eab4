//! Input forwarding and listener synthesis.
//!
//! Raw host input flows one way as fire-and-forget calls: the engine does
//! its own hit testing and dispatch. Events flow back as polled
//! target/event-type pairs which [`EventManager::dispatch`] maps to the
//! listeners registered here. Listeners take no payload; they re-read
//! whatever state they care about.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bitflags::bitflags;
use serde_json::{json, Value};

use crate::protocol::{Method, NodeId, VirtualEvent};
use crate::transport::Transport;

pub mod codes;

bitflags! {
    /// Keyboard modifier state attached to every raw input event.
    pub struct Modifiers: u8 {
        const ALT = 0b0001;
        const CTRL = 0b0010;
        const META = 0b0100;
        const SHIFT = 0b1000;
    }
}

impl Modifiers {
    /// Wire order is fixed: alt, ctrl, meta, shift, each as 0 or 1.
    fn flatten(self) -> [Value; 4] {
        [
            json!(self.contains(Self::ALT) as u8),
            json!(self.contains(Self::CTRL) as u8),
            json!(self.contains(Self::META) as u8),
            json!(self.contains(Self::SHIFT) as u8),
        ]
    }
}

/// A keyboard event as received from the host windowing layer.
#[derive(Debug, Clone)]
pub struct RawKeyEvent {
    /// Physical key name, UI Events `code` style ("KeyA", "Enter").
    pub code: String,
    pub modifiers: Modifiers,
}

/// A pointer event as received from the host windowing layer, in host
/// page coordinates.
#[derive(Debug, Clone)]
pub struct RawPointerEvent {
    pub button: u8,
    pub page_x: f64,
    pub page_y: f64,
    pub modifiers: Modifiers,
}

/// A listener callback. Shared so dispatch can invoke it without holding
/// the binding table lock.
pub type SharedListener = Arc<Mutex<dyn FnMut() + Send>>;

pub fn listener(f: impl FnMut() + Send + 'static) -> SharedListener {
    Arc::new(Mutex::new(f))
}

struct EventState {
    bindings: HashMap<(NodeId, u32), SharedListener>,
    offset_left: f64,
    offset_top: f64,
}

/// Listener registry plus raw-input forwarding. Clones share state.
#[derive(Clone)]
pub struct EventManager {
    transport: Transport,
    state: Arc<Mutex<EventState>>,
}

impl EventManager {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(EventState {
                bindings: HashMap::new(),
                offset_left: 0.0,
                offset_top: 0.0,
            })),
        }
    }

    /// Record where the rendered frame sits in host page coordinates, so
    /// pointer positions can be translated to frame-local ones.
    pub fn update_offsets(&self, left: f64, top: f64) {
        let mut state = self.state.lock().unwrap();
        state.offset_left = left;
        state.offset_top = top;
    }

    /// Bind a listener and tell the engine to start synthesizing this event
    /// type for the node. Re-registering replaces the previous listener.
    pub fn register(&self, target: NodeId, event_type: u32, listener: SharedListener) {
        self.transport.enqueue_void(
            Method::AddEventListener,
            vec![json!(target.0), json!(event_type)],
        );
        let mut state = self.state.lock().unwrap();
        state.bindings.insert((target, event_type), listener);
    }

    pub fn deregister(&self, target: NodeId, event_type: u32) {
        self.transport.enqueue_void(
            Method::RemoveEventListener,
            vec![json!(target.0), json!(event_type)],
        );
        let mut state = self.state.lock().unwrap();
        state.bindings.remove(&(target, event_type));
    }

    pub fn forward_key_down(&self, event: &RawKeyEvent) {
        self.forward_key(codes::event_type::KEY_DOWN, event);
    }

    pub fn forward_key_press(&self, event: &RawKeyEvent) {
        self.forward_key(codes::event_type::KEY_PRESS, event);
    }

    pub fn forward_key_up(&self, event: &RawKeyEvent) {
        self.forward_key(codes::event_type::KEY_UP, event);
    }

    fn forward_key(&self, event_type: u32, event: &RawKeyEvent) {
        let mut args = vec![json!(event_type)];
        args.extend(event.modifiers.flatten());
        args.push(json!(codes::key_code(&event.code)));
        self.transport.enqueue_void(Method::ReceiveKeyEvent, args);
    }

    pub fn forward_pointer_move(&self, event: &RawPointerEvent) {
        self.forward_pointer(codes::event_type::MOUSE_MOVE, event);
    }

    pub fn forward_click(&self, event: &RawPointerEvent) {
        self.forward_pointer(codes::event_type::CLICK, event);
    }

    fn forward_pointer(&self, event_type: u32, event: &RawPointerEvent) {
        let (offset_left, offset_top) = {
            let state = self.state.lock().unwrap();
            (state.offset_left, state.offset_top)
        };

        let mut args = vec![json!(event_type)];
        args.extend(event.modifiers.flatten());
        args.push(json!(event.button));
        args.push(json!(event.page_x - offset_left));
        args.push(json!(event.page_y - offset_top));
        self.transport.enqueue_void(Method::ReceiveMouseEvent, args);
    }

    /// Invoke the listener bound to each polled event. Events with no
    /// binding are dropped; the engine keeps synthesizing until the host
    /// deregisters, and unbinding races the last frame in flight.
    pub fn dispatch(&self, events: &[VirtualEvent]) {
        for event in events {
            let bound = {
                let state = self.state.lock().unwrap();
                state.bindings.get(&(event.target, event.event_type)).map(Arc::clone)
            };

            match bound {
                // Outside the table lock: a listener may register or
                // deregister other listeners.
                Some(listener) => (listener.lock().unwrap())(),
                None => log::debug!(
                    "no listener for event {} on {:?}",
                    event.event_type,
                    event.target
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::recording_transport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Voids only travel with a correlated call.
    async fn flush(transport: &Transport) {
        let reply = transport.invoke_async(Method::PollEvents, vec![]);
        let _ = reply.recv().await;
    }

    #[tokio::test]
    async fn click_translates_into_frame_local_coordinates() {
        let (transport, log) = recording_transport();
        let events = EventManager::new(transport.clone());
        events.update_offsets(20.0, 10.0);

        events.forward_click(&RawPointerEvent {
            button: 0,
            page_x: 120.0,
            page_y: 80.0,
            modifiers: Modifiers::empty(),
        });
        flush(&transport).await;

        let log = log.lock().unwrap();
        assert_eq!(log[0].method, Method::ReceiveMouseEvent);
        assert_eq!(
            log[0].args,
            vec![
                json!(codes::event_type::CLICK),
                json!(0), json!(0), json!(0), json!(0),
                json!(0),
                json!(100.0),
                json!(70.0),
            ],
        );
    }

    #[tokio::test]
    async fn key_events_carry_modifiers_in_fixed_order() {
        let (transport, log) = recording_transport();
        let events = EventManager::new(transport.clone());

        events.forward_key_down(&RawKeyEvent {
            code: "KeyA".into(),
            modifiers: Modifiers::CTRL | Modifiers::SHIFT,
        });
        flush(&transport).await;

        let log = log.lock().unwrap();
        assert_eq!(log[0].method, Method::ReceiveKeyEvent);
        assert_eq!(
            log[0].args,
            vec![
                json!(codes::event_type::KEY_DOWN),
                json!(0), json!(1), json!(0), json!(1),
                json!(20),
            ],
        );
    }

    #[tokio::test]
    async fn registration_is_announced_and_replaceable() {
        let (transport, log) = recording_transport();
        let events = EventManager::new(transport.clone());
        let target = NodeId(4);

        let first_hits = Arc::new(AtomicUsize::new(0));
        let second_hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first_hits);
        events.register(target, codes::event_type::CLICK, listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&second_hits);
        events.register(target, codes::event_type::CLICK, listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        events.dispatch(&[VirtualEvent { target, event_type: codes::event_type::CLICK }]);
        assert_eq!(first_hits.load(Ordering::SeqCst), 0);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);

        flush(&transport).await;
        let announced: Vec<Method> = log.lock().unwrap().iter().map(|c| c.method).collect();
        assert_eq!(
            announced,
            vec![Method::AddEventListener, Method::AddEventListener, Method::PollEvents],
        );
    }

    #[tokio::test]
    async fn dispatch_to_an_unbound_target_is_dropped() {
        let (transport, _log) = recording_transport();
        let events = EventManager::new(transport);

        // Must not panic.
        events.dispatch(&[VirtualEvent { target: NodeId(9), event_type: 15 }]);
    }

    #[tokio::test]
    async fn deregistered_listeners_stop_firing() {
        let (transport, _log) = recording_transport();
        let events = EventManager::new(transport);
        let target = NodeId(2);
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        events.register(target, codes::event_type::KEY_UP, listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        events.deregister(target, codes::event_type::KEY_UP);

        events.dispatch(&[VirtualEvent { target, event_type: codes::event_type::KEY_UP }]);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
