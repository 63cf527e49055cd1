//! Tree operations: create, append, walk.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{DomId, ElementData, NodeData};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[DomId] = &[];

/// The DOM produced by the DOM resolution path, backed by a slotmap arena.
///
/// Nodes are created detached and then attached with [`Dom::append_child`].
/// Parent/child relationships live in secondary maps so lookups are O(1).
pub struct Dom {
    pub(crate) nodes: SlotMap<DomId, NodeData>,
    children: SecondaryMap<DomId, Vec<DomId>>,
    parent: SecondaryMap<DomId, DomId>,
    root: Option<DomId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Create a detached node. It has no parent and does not become the root.
    pub fn create(&mut self, data: NodeData) -> DomId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, element: ElementData) -> DomId {
        self.create(NodeData::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> DomId {
        self.create(NodeData::Text(text.into()))
    }

    /// Create a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: DomId, data: NodeData) -> DomId {
        let id = self.create(data);
        self.append_child(parent, id);
        id
    }

    /// Move `node` to become the last child of `parent`.
    ///
    /// If `node` was previously attached elsewhere it is detached first.
    /// Unknown ids are ignored.
    pub fn append_child(&mut self, parent: DomId, node: DomId) {
        if !self.nodes.contains_key(node) || !self.nodes.contains_key(parent) {
            return;
        }

        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }

        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(node);
            self.parent.insert(node, parent);
        }
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: DomId) -> &[DomId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: DomId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Whether `id` names an element node (as opposed to text or nothing).
    pub fn is_element(&self, id: DomId) -> bool {
        self.nodes.get(id).is_some_and(NodeData::is_element)
    }

    /// The root element, if set.
    pub fn root(&self) -> Option<DomId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: DomId) {
        self.root = Some(id);
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: DomId) -> Vec<DomId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dom")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}
