//! Stylesheet registration and selector matching.
//!
//! Rules compile to [`Declaration`] sets, register with the engine for a
//! [`StyleId`], and are matched per element as the ordered concatenation
//! tag, `#id`, then each class. Match results are cached by composite key;
//! any new registration throws the whole cache away, trading precision for
//! a guarantee that no stale match survives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::protocol::{Method, StyleId};
use crate::transport::Transport;

pub mod compile;
pub mod declarations;

pub use compile::Rule;
pub use declarations::Declaration;

struct StyleState {
    rules: HashMap<String, StyleId>,
    cache: HashMap<String, Arc<Vec<StyleId>>>,
}

/// Shared stylesheet registry. Clones see the same rules and cache.
#[derive(Clone)]
pub struct StyleEngine {
    transport: Transport,
    state: Arc<Mutex<StyleState>>,
}

impl StyleEngine {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(StyleState {
                rules: HashMap::new(),
                cache: HashMap::new(),
            })),
        }
    }

    pub fn ingest_stylesheet(&self, rules: &[Rule]) {
        for rule in rules {
            self.register_rule(rule);
        }
    }

    /// Compile and register one rule. Rules whose declarations all drop are
    /// skipped entirely; they could never affect a match.
    pub fn register_rule(&self, rule: &Rule) {
        let declarations = compile::compile_rule(&rule.properties);
        if declarations.is_empty() {
            log::debug!("skipping empty rule '{}'", rule.selector);
            return;
        }

        let payload = match serde_json::to_string(&declarations) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("could not serialize rule '{}': {e}", rule.selector);
                return;
            }
        };

        let reply = self
            .transport
            .invoke_async(Method::RegisterStyle, vec![Value::String(payload)]);

        let engine = self.clone();
        let selector = rule.selector.clone();
        tokio::spawn(async move {
            match reply.recv().await {
                Ok(retval) => match retval.as_u64() {
                    Some(id) => engine.finish_registration(selector, StyleId(id)),
                    None => log::warn!("registration of '{selector}' returned no id: {retval}"),
                },
                Err(e) => log::warn!("registration of '{selector}' lost: {e}"),
            }
        });
    }

    fn finish_registration(&self, selector: String, id: StyleId) {
        let mut state = self.state.lock().unwrap();
        // A new rule can change the match set of any element, so the entire
        // cache is invalid, not just keys mentioning this selector.
        state.cache.clear();
        log::debug!("registered style {id:?} for '{selector}'");
        state.rules.insert(selector, id);
    }

    /// Drop a rule. The engine-side set is released fire-and-forget.
    pub fn remove_rule(&self, selector: &str) {
        let removed = {
            let mut state = self.state.lock().unwrap();
            let removed = state.rules.remove(selector);
            if removed.is_some() {
                state.cache.clear();
            }
            removed
        };

        if let Some(id) = removed {
            self.transport
                .enqueue_void(Method::UnregisterStyle, vec![serde_json::json!(id.0)]);
        }
    }

    /// Ordered [`StyleId`]s matching an element: tag rule first, then the
    /// `#id` rule, then one per class in class-list order. The returned Arc
    /// is shared with the cache, so repeat lookups are pointer-identical
    /// until the next registration.
    pub fn styles_for_element(
        &self,
        tag: &str,
        id_attr: &str,
        class_list: &str,
    ) -> Arc<Vec<StyleId>> {
        let key = format!("{tag}#{id_attr}.{class_list}");
        let mut state = self.state.lock().unwrap();

        if let Some(hit) = state.cache.get(&key) {
            return Arc::clone(hit);
        }

        let mut ids = Vec::new();
        if let Some(id) = state.rules.get(tag) {
            ids.push(*id);
        }
        if !id_attr.is_empty() {
            if let Some(id) = state.rules.get(&format!("#{id_attr}")) {
                ids.push(*id);
            }
        }
        for class in class_list.split_whitespace() {
            if let Some(id) = state.rules.get(&format!(".{class}")) {
                ids.push(*id);
            }
        }

        let ids = Arc::new(ids);
        state.cache.insert(key, Arc::clone(&ids));
        ids
    }

    #[cfg(test)]
    pub(crate) fn rule_count(&self) -> usize {
        self.state.lock().unwrap().rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{eventually, null_transport};

    fn sheet() -> Vec<Rule> {
        vec![
            Rule::new("div", &[("width", "100px")]),
            Rule::new("#main", &[("height", "50px")]),
            Rule::new(".wide", &[("flex-grow", "1")]),
            Rule::new(".tall", &[("flex-shrink", "0")]),
        ]
    }

    async fn settled_engine(rules: &[Rule]) -> StyleEngine {
        let engine = StyleEngine::new(null_transport());
        engine.ingest_stylesheet(rules);
        let expected = rules.len();
        let probe = engine.clone();
        eventually(move || {
            let probe = probe.clone();
            async move { probe.rule_count() == expected }
        })
        .await;
        engine
    }

    #[tokio::test]
    async fn match_order_is_tag_then_id_then_classes() {
        let engine = settled_engine(&sheet()).await;

        let ids = engine.styles_for_element("div", "main", "wide tall");
        assert_eq!(ids.len(), 4);

        // Class order follows the class list, not registration order.
        let reversed = engine.styles_for_element("div", "main", "tall wide");
        assert_eq!(ids[0], reversed[0]);
        assert_eq!(ids[1], reversed[1]);
        assert_eq!(ids[2], reversed[3]);
        assert_eq!(ids[3], reversed[2]);
    }

    #[tokio::test]
    async fn repeat_lookups_share_the_cached_set() {
        let engine = settled_engine(&sheet()).await;

        let first = engine.styles_for_element("div", "", "wide");
        let second = engine.styles_for_element("div", "", "wide");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn new_registration_invalidates_every_cached_match() {
        let engine = settled_engine(&sheet()).await;

        let before = engine.styles_for_element("div", "", "wide");
        engine.register_rule(&Rule::new("span", &[("width", "10px")]));
        let probe = engine.clone();
        eventually(move || {
            let probe = probe.clone();
            async move { probe.rule_count() == 5 }
        })
        .await;

        // Same key, rebuilt entry: the span rule cannot match a div, but
        // invalidation is total.
        let after = engine.styles_for_element("div", "", "wide");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[tokio::test]
    async fn removing_a_rule_drops_it_from_matches() {
        let engine = settled_engine(&sheet()).await;

        assert_eq!(engine.styles_for_element("div", "", "").len(), 1);
        engine.remove_rule("div");
        assert!(engine.styles_for_element("div", "", "").is_empty());
    }

    #[tokio::test]
    async fn rules_with_nothing_to_register_are_skipped() {
        let engine = StyleEngine::new(null_transport());
        engine.ingest_stylesheet(&[Rule::new("div", &[("display", "flex")])]);

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(engine.rule_count(), 0);
    }
}
