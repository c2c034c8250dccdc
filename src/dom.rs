//! Document abstraction consumed by the coordinator.
//!
//! The coordinator never talks to a real UI toolkit. Everything it needs from
//! the document (text content, focus, selection, classes, tab order, scroll
//! position, anchors) goes through the [`Dom`] trait. [`HeadlessDom`] is an
//! in-memory tree used by tests and by hosts that render elsewhere.

use std::collections::{BTreeSet, HashMap};

/// Opaque handle to a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Link-like element data used by click interception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub element: Option<ElementId>,
    pub href: String,
    /// Native `target` attribute; `_blank` anchors are left to the host.
    pub target: Option<String>,
    pub line_number: Option<u32>,
    pub preferred_panel: Option<String>,
    /// Delay single-click following so a double click can cancel it.
    pub prevent_follow_on_double_click: bool,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Default::default()
        }
    }
}

/// Element operations the coordinator relies on.
///
/// Operations on detached or unknown elements are the caller's problem;
/// implementations may ignore them.
pub trait Dom {
    fn text_content(&self, element: ElementId) -> String;
    fn set_text_content(&mut self, element: ElementId, text: &str);

    /// True if `node` is `ancestor` or lies inside it.
    fn is_self_or_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool;

    fn focus(&mut self, element: ElementId);
    fn blur(&mut self, element: ElementId);

    fn selection_is_collapsed(&self) -> bool;
    /// True if the current selection's anchor lies inside `element`.
    fn is_caret_inside(&self, element: ElementId) -> bool;
    /// Replace the selection with a zero-length range at the start of `element`.
    fn place_caret(&mut self, element: ElementId);

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn tab_index(&self, element: ElementId) -> i32;
    fn set_tab_index(&mut self, element: ElementId, index: i32);

    fn scroll_position(&self, element: ElementId) -> (f64, f64);
    fn set_scroll_position(&mut self, element: ElementId, position: (f64, f64));

    /// Text inputs, text areas and content-editable elements.
    fn is_editable_field(&self, element: ElementId) -> bool;

    /// The anchor at or above `element`, if any.
    fn enclosing_anchor(&self, element: ElementId) -> Option<Anchor>;

    fn set_style_property(&mut self, element: ElementId, property: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<ElementId>,
    text: String,
    classes: BTreeSet<String>,
    tab_index: i32,
    scroll: (f64, f64),
    editable: bool,
    anchor: Option<Anchor>,
    styles: HashMap<String, String>,
}

/// In-memory document with call counters for assertions.
#[derive(Debug, Default)]
pub struct HeadlessDom {
    nodes: HashMap<ElementId, Node>,
    next_id: u64,
    focused: Option<ElementId>,
    /// Anchor element of the selection and whether it is collapsed.
    selection: Option<(ElementId, bool)>,
    pub caret_placements: usize,
    pub focus_calls: usize,
    pub blur_calls: Vec<ElementId>,
}

impl HeadlessDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element under `parent`. New elements are not in the tab order.
    pub fn create_element(&mut self, parent: Option<ElementId>) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.nodes.insert(
            id,
            Node {
                parent,
                tab_index: -1,
                ..Default::default()
            },
        );
        id
    }

    pub fn create_text_element(&mut self, parent: Option<ElementId>, text: &str) -> ElementId {
        let id = self.create_element(parent);
        self.set_text_content(id, text);
        id
    }

    pub fn set_editable(&mut self, element: ElementId, editable: bool) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.editable = editable;
        }
    }

    /// Make `element` an anchor. `anchor.element` is filled in.
    pub fn set_anchor(&mut self, element: ElementId, mut anchor: Anchor) {
        anchor.element = Some(element);
        if let Some(node) = self.nodes.get_mut(&element) {
            node.anchor = Some(anchor);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Select a non-empty range inside `element`.
    pub fn select_range_in(&mut self, element: ElementId) {
        self.selection = Some((element, false));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn style_property(&self, element: ElementId, property: &str) -> Option<&str> {
        self.nodes
            .get(&element)?
            .styles
            .get(property)
            .map(String::as_str)
    }
}

impl Dom for HeadlessDom {
    fn text_content(&self, element: ElementId) -> String {
        self.nodes
            .get(&element)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    fn set_text_content(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.text = text.to_string();
        }
    }

    fn is_self_or_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn focus(&mut self, element: ElementId) {
        self.focus_calls += 1;
        self.focused = Some(element);
    }

    fn blur(&mut self, element: ElementId) {
        self.blur_calls.push(element);
        if self.focused == Some(element) {
            self.focused = None;
        }
    }

    fn selection_is_collapsed(&self) -> bool {
        self.selection.is_none_or(|(_, collapsed)| collapsed)
    }

    fn is_caret_inside(&self, element: ElementId) -> bool {
        self.selection
            .is_some_and(|(anchor, _)| self.is_self_or_ancestor(element, anchor))
    }

    fn place_caret(&mut self, element: ElementId) {
        self.caret_placements += 1;
        self.selection = Some((element, true));
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.classes.remove(class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(&element)
            .is_some_and(|n| n.classes.contains(class))
    }

    fn tab_index(&self, element: ElementId) -> i32 {
        self.nodes.get(&element).map_or(-1, |n| n.tab_index)
    }

    fn set_tab_index(&mut self, element: ElementId, index: i32) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.tab_index = index;
        }
    }

    fn scroll_position(&self, element: ElementId) -> (f64, f64) {
        self.nodes.get(&element).map_or((0.0, 0.0), |n| n.scroll)
    }

    fn set_scroll_position(&mut self, element: ElementId, position: (f64, f64)) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.scroll = position;
        }
    }

    fn is_editable_field(&self, element: ElementId) -> bool {
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(&id) else {
                return false;
            };
            if node.editable {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    fn enclosing_anchor(&self, element: ElementId) -> Option<Anchor> {
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let node = self.nodes.get(&id)?;
            if let Some(anchor) = &node.anchor {
                return Some(anchor.clone());
            }
            cursor = node.parent;
        }
        None
    }

    fn set_style_property(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestry_and_editability_follow_parents() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_element(None);
        let field = dom.create_element(Some(root));
        let inner = dom.create_element(Some(field));
        dom.set_editable(field, true);

        assert!(dom.is_self_or_ancestor(root, inner));
        assert!(!dom.is_self_or_ancestor(inner, root));
        assert!(dom.is_editable_field(inner));
        assert!(!dom.is_editable_field(root));
    }

    #[test]
    fn caret_tracking() {
        let mut dom = HeadlessDom::new();
        let a = dom.create_element(None);
        let b = dom.create_element(None);
        assert!(dom.selection_is_collapsed());
        assert!(!dom.is_caret_inside(a));

        dom.place_caret(a);
        assert!(dom.is_caret_inside(a));
        assert!(!dom.is_caret_inside(b));

        dom.select_range_in(b);
        assert!(!dom.selection_is_collapsed());
    }

    #[test]
    fn enclosing_anchor_walks_up() {
        let mut dom = HeadlessDom::new();
        let link = dom.create_element(None);
        let label = dom.create_text_element(Some(link), "main.js");
        dom.set_anchor(link, Anchor::new("http://example.com/main.js"));

        let anchor = dom.enclosing_anchor(label).unwrap();
        assert_eq!(anchor.element, Some(link));
        assert_eq!(anchor.href, "http://example.com/main.js");
    }
}
