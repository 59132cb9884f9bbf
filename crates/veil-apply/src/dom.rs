//! The document boundary.
//!
//! The host page's document is externally owned and rewritten at will; the
//! core only ever reads structure through [`DocumentSurface`] and writes the
//! three things it owns: inline style properties it set itself, sentinel
//! data-attributes on elements it hid, and root-level marker attributes.
//!
//! [`ScriptedDocument`] is the in-memory implementation used by tests: it
//! can grow and shrink mid-test to imitate virtual-scroll insert storms, and
//! reports every mutation through an optional hook so a scheduler can be
//! wired to it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

/// Opaque handle to one element of the host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Read/write access to the host document, scoped to what appliers need.
/// All operations on absent elements are silent no-ops; the document can
/// change between any two calls.
pub trait DocumentSurface: Send + Sync {
    /// Elements currently matching a selector. May be empty; may differ on
    /// the next call.
    fn select(&self, selector: &str) -> Vec<ElementId>;

    /// Current inline value of a style property, if one is set.
    fn inline_style(&self, el: ElementId, prop: &str) -> Option<String>;

    fn set_inline_style(&self, el: ElementId, prop: &str, value: &str);

    fn clear_inline_style(&self, el: ElementId, prop: &str);

    fn set_attribute(&self, el: ElementId, name: &str, value: &str);

    fn remove_attribute(&self, el: ElementId, name: &str);

    fn has_attribute(&self, el: ElementId, name: &str) -> bool;

    /// Set (`Some`) or remove (`None`) an attribute on the document root.
    fn set_root_attribute(&self, name: &str, value: Option<&str>);
}

#[derive(Clone, Debug, Default)]
struct ScriptedElement {
    selectors: Vec<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
}

#[derive(Default)]
struct ScriptedState {
    elements: BTreeMap<ElementId, ScriptedElement>,
    root_attributes: BTreeMap<String, String>,
    next_id: u64,
}

type MutationHook = Box<dyn Fn() + Send + Sync>;

/// In-memory document for tests. Interior-mutable so it can sit behind the
/// same shared reference the appliers use.
pub struct ScriptedDocument {
    state: Mutex<ScriptedState>,
    mutation_hook: Mutex<Option<MutationHook>>,
}

impl ScriptedDocument {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptedState::default()),
            mutation_hook: Mutex::new(None),
        }
    }

    /// Called on every structural change (insert/remove), imitating a
    /// mutation observer on the watched subtree.
    pub fn set_mutation_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.mutation_hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Insert an element matching the given selectors.
    pub fn insert_element(&self, selectors: &[&str]) -> ElementId {
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = ElementId(state.next_id);
            state.elements.insert(
                id,
                ScriptedElement {
                    selectors: selectors.iter().map(|s| s.to_string()).collect(),
                    ..ScriptedElement::default()
                },
            );
            id
        };
        self.notify_mutation();
        id
    }

    /// Remove an element, as the host page does during virtual scroll.
    pub fn remove_element(&self, el: ElementId) {
        self.state.lock().unwrap().elements.remove(&el);
        self.notify_mutation();
    }

    pub fn root_attribute(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().root_attributes.get(name).cloned()
    }

    pub fn element_count(&self) -> usize {
        self.state.lock().unwrap().elements.len()
    }

    fn notify_mutation(&self) {
        if let Some(hook) = self.mutation_hook.lock().unwrap().as_ref() {
            hook();
        }
    }
}

impl Default for ScriptedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSurface for ScriptedDocument {
    fn select(&self, selector: &str) -> Vec<ElementId> {
        let state = self.state.lock().unwrap();
        state
            .elements
            .iter()
            .filter(|(_, el)| el.selectors.iter().any(|s| s == selector))
            .map(|(&id, _)| id)
            .collect()
    }

    fn inline_style(&self, el: ElementId, prop: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.elements.get(&el).and_then(|e| e.styles.get(prop).cloned())
    }

    fn set_inline_style(&self, el: ElementId, prop: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.elements.get_mut(&el) {
            e.styles.insert(prop.to_string(), value.to_string());
        }
    }

    fn clear_inline_style(&self, el: ElementId, prop: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.elements.get_mut(&el) {
            e.styles.remove(prop);
        }
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.elements.get_mut(&el) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, el: ElementId, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.elements.get_mut(&el) {
            e.attributes.remove(name);
        }
    }

    fn has_attribute(&self, el: ElementId, name: &str) -> bool {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&el)
            .map(|e| e.attributes.contains_key(name))
            .unwrap_or(false)
    }

    fn set_root_attribute(&self, name: &str, value: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        match value {
            Some(v) => {
                state.root_attributes.insert(name.to_string(), v.to_string());
            }
            None => {
                state.root_attributes.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_select_by_selector() {
        let doc = ScriptedDocument::new();
        let a = doc.insert_element(&["#shelf", ".row"]);
        let _b = doc.insert_element(&[".row"]);

        assert_eq!(doc.select("#shelf"), vec![a]);
        assert_eq!(doc.select(".row").len(), 2);
        assert!(doc.select("#missing").is_empty());
    }

    #[test]
    fn test_operations_on_removed_element_are_noops() {
        let doc = ScriptedDocument::new();
        let el = doc.insert_element(&["#shelf"]);
        doc.remove_element(el);

        doc.set_inline_style(el, "display", "none");
        doc.set_attribute(el, "data-x", "1");
        assert_eq!(doc.inline_style(el, "display"), None);
        assert!(!doc.has_attribute(el, "data-x"));
    }

    #[test]
    fn test_mutation_hook_fires_on_structural_change() {
        let doc = ScriptedDocument::new();
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = count.clone();
        doc.set_mutation_hook(move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        });

        let el = doc.insert_element(&["#shelf"]);
        doc.remove_element(el);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_root_attributes() {
        let doc = ScriptedDocument::new();
        doc.set_root_attribute("data-veil-hide-shorts", Some(""));
        assert_eq!(doc.root_attribute("data-veil-hide-shorts"), Some(String::new()));

        doc.set_root_attribute("data-veil-hide-shorts", None);
        assert_eq!(doc.root_attribute("data-veil-hide-shorts"), None);
    }
}
