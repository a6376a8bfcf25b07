//! In-memory element tree
//!
//! The editor works on an arena of elements that mirrors the parts of a
//! browser DOM the interaction layer relies on: tags, attributes, classes,
//! form state, parent/child links and click listeners. Nodes are never freed;
//! a detached subtree simply becomes unreachable from the document root.

pub mod selector;

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::attrs;
use crate::geometry::Rect;
use crate::objects::ObjectKind;

pub use selector::Selector;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Click listeners an element can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    OpenSettings(ObjectKind),
    CloseSettings(ObjectKind),
    ActivateRadio,
    ToggleCheckbox,
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    text: String,
    checked: bool,
    /// Untransformed layout box, written by the front-end
    layout: Option<Rect>,
    listeners: Vec<Listener>,
    /// Elements held by this one, such as those an open overlay froze
    links: Vec<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Node {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The document body; only nodes reachable from it are attached
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Default::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Remove `id` from its parent; the subtree stays intact but detached
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    /// Ancestor chain starting at `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// All descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// True when `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_descendant(id, self.root)
    }

    /// Deep copy of a subtree; the copy is detached and carries no listeners or links
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id);
        let copy = Node {
            tag: source.tag.clone(),
            attrs: source.attrs.clone(),
            classes: source.classes.clone(),
            text: source.text.clone(),
            checked: source.checked,
            layout: None,
            listeners: Vec::new(),
            links: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        let children = source.children.clone();

        self.nodes.push(copy);
        let new_id = NodeId(self.nodes.len() - 1);
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(new_id, child_copy);
        }
        new_id
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Look up an attached element by id
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let selector = Selector::id(id);
        self.query(self.root, &selector)
    }

    /// Descendants of `root` matching `selector`, in document order
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    pub fn query(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    pub fn first_by_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.query(root, &Selector::class(class))
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.node_mut(id).attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attrs.remove(name);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.contains(class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.node_mut(id).classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.node_mut(id).classes.remove(class);
    }

    /// Flip `class`, returning whether it is now present
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.node(id).classes.iter().map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Form and content state
    // ------------------------------------------------------------------

    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.node_mut(id).text = text.into();
    }

    /// Current value of an input; empty when unset
    pub fn value(&self, id: NodeId) -> &str {
        self.attr(id, attrs::VALUE).unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.set_attr(id, attrs::VALUE, value);
    }

    pub fn input_type(&self, id: NodeId) -> Option<&str> {
        if self.tag(id).eq_ignore_ascii_case("input") {
            Some(self.attr(id, attrs::TYPE).unwrap_or("text"))
        } else {
            None
        }
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.node(id).checked
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        self.node_mut(id).checked = checked;
    }

    pub fn layout(&self, id: NodeId) -> Option<Rect> {
        self.node(id).layout
    }

    pub fn set_layout(&mut self, id: NodeId, rect: Rect) {
        self.node_mut(id).layout = Some(rect);
    }

    pub fn listeners(&self, id: NodeId) -> &[Listener] {
        &self.node(id).listeners
    }

    pub fn add_listener(&mut self, id: NodeId, listener: Listener) {
        self.node_mut(id).listeners.push(listener);
    }

    pub fn set_links(&mut self, id: NodeId, links: Vec<NodeId>) {
        self.node_mut(id).links = links;
    }

    /// Remove and return the elements linked from `id`
    pub fn take_links(&mut self, id: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.node_mut(id).links)
    }
}

/// Iterator over an element and its ancestors, innermost first
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        let leaf = doc.create_element("input");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        doc.append_child(inner, leaf);
        (doc, outer, inner, leaf)
    }

    #[test]
    fn test_ancestors_start_at_self() {
        let (doc, outer, inner, leaf) = tree();
        let chain: Vec<_> = doc.ancestors(leaf).collect();
        assert_eq!(chain, vec![leaf, inner, outer, doc.root()]);
    }

    #[test]
    fn test_append_child_reparents() {
        let (mut doc, outer, inner, leaf) = tree();
        doc.append_child(outer, leaf);

        assert_eq!(doc.parent(leaf), Some(outer));
        assert!(doc.children(inner).is_empty());
        assert_eq!(doc.children(outer), &[inner, leaf]);
    }

    #[test]
    fn test_detach_makes_subtree_unreachable() {
        let (mut doc, outer, inner, leaf) = tree();
        doc.set_attr(leaf, attrs::ID, "leaf");
        assert_eq!(doc.element_by_id("leaf"), Some(leaf));

        doc.detach(inner);
        assert!(doc.is_attached(outer));
        assert!(!doc.is_attached(leaf));
        assert_eq!(doc.element_by_id("leaf"), None);
        // Subtree below the detached node is intact
        assert_eq!(doc.parent(leaf), Some(inner));
    }

    #[test]
    fn test_deep_clone_copies_state_not_listeners() {
        let (mut doc, outer, _inner, leaf) = tree();
        doc.add_class(leaf, "name");
        doc.set_value(leaf, "Users");
        doc.set_checked(leaf, true);
        doc.add_listener(leaf, Listener::ToggleCheckbox);
        doc.set_links(leaf, vec![outer]);

        let copy = doc.deep_clone(outer);
        assert_eq!(doc.parent(copy), None);

        let leaf_copy = doc.first_by_class(copy, "name").unwrap();
        assert_ne!(leaf_copy, leaf);
        assert_eq!(doc.value(leaf_copy), "Users");
        assert!(doc.is_checked(leaf_copy));
        assert!(doc.listeners(leaf_copy).is_empty());
        assert!(doc.take_links(leaf_copy).is_empty());
        assert_eq!(doc.take_links(leaf), vec![outer]);
        assert!(doc.take_links(leaf).is_empty());

        // Edits on the copy do not leak back
        doc.set_value(leaf_copy, "Orders");
        assert_eq!(doc.value(leaf), "Users");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("div");
        let d = doc.create_element("div");
        doc.append_child(a, b);
        doc.append_child(b, c);
        doc.append_child(a, d);
        assert_eq!(doc.descendants(a), vec![b, c, d]);
    }

    #[test]
    fn test_toggle_class_and_input_type() {
        let (mut doc, outer, _inner, leaf) = tree();
        assert!(doc.toggle_class(outer, "hidden"));
        assert!(doc.has_class(outer, "hidden"));
        assert!(!doc.toggle_class(outer, "hidden"));
        assert!(!doc.has_class(outer, "hidden"));

        assert_eq!(doc.input_type(leaf), Some("text"));
        assert_eq!(doc.input_type(outer), None);
    }
}
