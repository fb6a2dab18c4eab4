//! Host-side node handles over the engine's tree.
//!
//! A node is created optimistically: the constructor fires the correlated
//! create call and returns immediately with a pending [`Remote`] handle.
//! Every subsequent operation queues behind that handle, so callers can
//! build and wire whole subtrees before the engine has assigned a single
//! id. Relative order of operations on one node is preserved.

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::errors::BridgeError;
use crate::events::{codes, EventManager, SharedListener};
use crate::handle::Remote;
use crate::protocol::{Method, NodeId};
use crate::style::StyleEngine;
use crate::transport::Transport;

/// The services every node operates against. Cheap to clone.
#[derive(Clone)]
pub struct NodeContext {
    pub transport: Transport,
    pub styles: StyleEngine,
    pub events: EventManager,
}

impl NodeContext {
    pub fn new(transport: Transport) -> Self {
        Self {
            styles: StyleEngine::new(transport.clone()),
            events: EventManager::new(transport.clone()),
            transport,
        }
    }
}

/// A prop assigned to an element: plain text or an event listener.
pub enum PropValue {
    Text(String),
    Listener(SharedListener),
}

impl PropValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn listener(f: impl FnMut() + Send + 'static) -> Self {
        Self::Listener(crate::events::listener(f))
    }
}

struct StyleTriple {
    id_attr: String,
    class_list: String,
}

/// An element in the engine tree.
#[derive(Clone)]
pub struct ElementNode {
    ctx: NodeContext,
    handle: Remote<NodeId>,
    tag: Arc<str>,
    applied: Arc<Mutex<StyleTriple>>,
}

impl ElementNode {
    /// Create an element of the named tag and apply its tag-level styles.
    pub fn create(ctx: &NodeContext, tag: &str) -> Result<Self, BridgeError> {
        let code = codes::element_code(tag)
            .ok_or_else(|| BridgeError::UnknownElement(tag.to_string()))?;

        let reply = ctx
            .transport
            .invoke_async(Method::CreateElementNode, vec![json!(code)]);

        let node = Self {
            ctx: ctx.clone(),
            handle: Remote::from_reply(reply),
            tag: Arc::from(tag),
            applied: Arc::new(Mutex::new(StyleTriple {
                // Sentinel that can never equal a real attribute pair, so
                // the first set_styles always applies.
                id_attr: "\0".into(),
                class_list: "\0".into(),
            })),
        };

        node.set_styles("", "");
        Ok(node)
    }

    pub fn handle(&self) -> Remote<NodeId> {
        self.handle.clone()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Re-resolve and push this element's style set. Setting the identical
    /// id/class pair again is a no-op before any handle wait.
    pub fn set_styles(&self, id_attr: &str, class_list: &str) {
        {
            let mut applied = self.applied.lock().unwrap();
            if applied.id_attr == id_attr && applied.class_list == class_list {
                return;
            }
            applied.id_attr = id_attr.to_string();
            applied.class_list = class_list.to_string();
        }

        let ctx = self.ctx.clone();
        let tag = Arc::clone(&self.tag);
        let id_attr = id_attr.to_string();
        let class_list = class_list.to_string();
        self.handle.wait_for(move |id| {
            // Matching happens at send time so the freshest registrations
            // win; an empty match set sends nothing.
            let ids = ctx.styles.styles_for_element(&tag, &id_attr, &class_list);
            if !ids.is_empty() {
                ctx.transport
                    .enqueue_void(Method::SetStyles, vec![json!(id.0), json!(*ids)]);
            }
        });
    }

    /// Apply a prop set: listener props bind listeners, `id` and
    /// `className` reapply styles, anything else is ignored.
    pub fn receive_props<'a>(&self, props: impl IntoIterator<Item = (&'a str, PropValue)>) {
        for (name, value) in props {
            match (codes::event_prop_code(name), value) {
                (Some(event_type), PropValue::Listener(listener)) => {
                    self.add_event_listener(event_type, listener);
                }
                (Some(_), PropValue::Text(_)) => {
                    log::warn!("listener prop {name} given a text value; ignored");
                }
                (None, PropValue::Text(text)) => {
                    let applied = self.applied.lock().unwrap();
                    match name {
                        "id" => {
                            let class_list = applied.class_list.clone();
                            drop(applied);
                            self.set_styles(&text, &class_list);
                        }
                        "className" => {
                            let id_attr = applied.id_attr.clone();
                            drop(applied);
                            self.set_styles(&id_attr, &text);
                        }
                        _ => log::debug!("ignoring prop {name}"),
                    }
                }
                (None, PropValue::Listener(_)) => {
                    log::warn!("unknown listener prop {name}; ignored");
                }
            }
        }
    }

    pub fn add_event_listener(&self, event_type: u32, listener: SharedListener) {
        let events = self.ctx.events.clone();
        self.handle.wait_for(move |id| events.register(id, event_type, listener));
    }

    pub fn remove_event_listener(&self, event_type: u32) {
        let events = self.ctx.events.clone();
        self.handle.wait_for(move |id| events.deregister(id, event_type));
    }

    /// Queue `child` under this element once both handles resolve.
    pub fn append_child(&self, child: &Node) {
        let transport = self.ctx.transport.clone();
        Remote::join(&[self.handle.clone(), child.handle()], move |ids| {
            transport.enqueue_void(
                Method::AppendChild,
                vec![json!(ids[0].0), json!(ids[1].0)],
            );
        });
    }

    /// Attach this element directly under the engine's root container.
    pub fn append_to_container(&self) {
        let transport = self.ctx.transport.clone();
        self.handle.wait_for(move |id| {
            transport.enqueue_void(Method::AppendToContainer, vec![json!(id.0)]);
        });
    }
}

/// A text run in the engine tree.
#[derive(Clone)]
pub struct TextNode {
    ctx: NodeContext,
    handle: Remote<NodeId>,
    content: Arc<Mutex<String>>,
}

impl TextNode {
    pub fn create(ctx: &NodeContext, content: &str) -> Self {
        let reply = ctx
            .transport
            .invoke_async(Method::CreateTextNode, vec![json!(content)]);

        Self {
            ctx: ctx.clone(),
            handle: Remote::from_reply(reply),
            content: Arc::new(Mutex::new(content.to_string())),
        }
    }

    pub fn handle(&self) -> Remote<NodeId> {
        self.handle.clone()
    }

    /// Replace the text. Setting the current content again is a no-op.
    pub fn set_text_content(&self, content: &str) {
        {
            let mut current = self.content.lock().unwrap();
            if *current == content {
                return;
            }
            *current = content.to_string();
        }

        let transport = self.ctx.transport.clone();
        let content = content.to_string();
        self.handle.wait_for(move |id| {
            transport.enqueue_void(Method::SetTextContent, vec![json!(id.0), json!(content)]);
        });
    }
}

/// Either node kind, where tree operations accept both.
#[derive(Clone)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn handle(&self) -> Remote<NodeId> {
        match self {
            Node::Element(node) => node.handle(),
            Node::Text(node) => node.handle(),
        }
    }
}

impl From<ElementNode> for Node {
    fn from(node: ElementNode) -> Self {
        Node::Element(node)
    }
}

impl From<TextNode> for Node {
    fn from(node: TextNode) -> Self {
        Node::Text(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PendingCall;
    use crate::test_support::{eventually, recording_transport};

    type CallLog = Arc<Mutex<Vec<PendingCall>>>;

    /// Flush queued voids, then check whether `method` has crossed the
    /// wire. Handle waiters run on the resolver task, so a single flush
    /// after resolution can race them; callers poll this instead.
    async fn flushed_count(transport: &Transport, log: &CallLog, method: Method) -> usize {
        let _ = transport.invoke_async(Method::PollEvents, vec![]).recv().await;
        log.lock().unwrap().iter().filter(|c| c.method == method).count()
    }

    #[tokio::test]
    async fn unknown_tags_are_rejected() {
        let (transport, _log) = recording_transport();
        let ctx = NodeContext::new(transport);
        assert!(matches!(
            ElementNode::create(&ctx, "blink"),
            Err(BridgeError::UnknownElement(_)),
        ));
    }

    #[tokio::test]
    async fn append_child_waits_for_both_handles() {
        let (transport, log) = recording_transport();
        let ctx = NodeContext::new(transport.clone());

        let parent = ElementNode::create(&ctx, "div").unwrap();
        let child = TextNode::create(&ctx, "hello");
        parent.append_child(&child.into());

        let transport_probe = transport.clone();
        let log_probe = Arc::clone(&log);
        eventually(move || {
            let transport = transport_probe.clone();
            let log = Arc::clone(&log_probe);
            async move { flushed_count(&transport, &log, Method::AppendChild).await == 1 }
        })
        .await;

        let append = log
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.method == Method::AppendChild)
            .cloned()
            .unwrap();
        // Element was created first, so it got handle 1; the text got 2.
        assert_eq!(append.args, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn repeated_identical_style_triples_do_not_resend() {
        let (transport, log) = recording_transport();
        let ctx = NodeContext::new(transport.clone());
        ctx.styles
            .ingest_stylesheet(&[crate::style::Rule::new(".a", &[("width", "5px")])]);
        let probe = ctx.styles.clone();
        eventually(move || {
            let probe = probe.clone();
            async move { probe.rule_count() == 1 }
        })
        .await;

        let node = ElementNode::create(&ctx, "div").unwrap();
        node.set_styles("", "a");
        node.set_styles("", "a");
        node.set_styles("", "a");

        let transport_probe = transport.clone();
        let log_probe = Arc::clone(&log);
        eventually(move || {
            let transport = transport_probe.clone();
            let log = Arc::clone(&log_probe);
            async move { flushed_count(&transport, &log, Method::SetStyles).await >= 1 }
        })
        .await;

        // Only the first effective triple produced a call.
        assert_eq!(flushed_count(&transport, &log, Method::SetStyles).await, 1);
    }

    #[tokio::test]
    async fn text_updates_skip_identical_content() {
        let (transport, log) = recording_transport();
        let ctx = NodeContext::new(transport.clone());

        let node = TextNode::create(&ctx, "one");
        node.set_text_content("one");
        node.set_text_content("two");
        node.set_text_content("two");

        let transport_probe = transport.clone();
        let log_probe = Arc::clone(&log);
        eventually(move || {
            let transport = transport_probe.clone();
            let log = Arc::clone(&log_probe);
            async move { flushed_count(&transport, &log, Method::SetTextContent).await >= 1 }
        })
        .await;

        assert_eq!(flushed_count(&transport, &log, Method::SetTextContent).await, 1);
    }

    #[tokio::test]
    async fn listener_props_bind_through_the_event_manager() {
        let (transport, log) = recording_transport();
        let ctx = NodeContext::new(transport.clone());

        let node = ElementNode::create(&ctx, "button").unwrap();
        node.receive_props([("onClick", PropValue::listener(|| {}))]);

        let transport_probe = transport.clone();
        let log_probe = Arc::clone(&log);
        eventually(move || {
            let transport = transport_probe.clone();
            let log = Arc::clone(&log_probe);
            async move { flushed_count(&transport, &log, Method::AddEventListener).await == 1 }
        })
        .await;
    }
}
