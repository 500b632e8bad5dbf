//! Ordered n-ary tree backing a loaded template
//!
//! Nodes live in one insertion-ordered sequence with parent back-references
//! instead of per-node child lists. The root is always the last entry, so a
//! forward walk visits every content node before reaching it. Appending a
//! child scans backwards for the last node already attached to the same parent
//! and inserts right after it, or at the front when the parent has no children.

use std::fmt;

/// Stable handle to a node; insertions elsewhere in the tree never change it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Unknown parent node {parent}")]
    UnknownParent { parent: NodeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    payload: Option<T>,
    parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct NaryTree<T> {
    slots: Vec<Node<T>>,
    order: Vec<NodeId>,
}

impl<T> NaryTree<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Establish the root, or replace the payload of the existing one
    pub fn set_root(&mut self, payload: Option<T>) -> NodeId {
        match self.get_root() {
            Some(root) => {
                self.slots[root.0].payload = payload;
                root
            }
            None => {
                let id = self.allocate(payload);
                self.order.push(id);
                id
            }
        }
    }

    pub fn get_root(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    /// Insert `payload` after the last existing child of `parent`
    pub fn append_child(&mut self, parent: NodeId, payload: T) -> Result<NodeId, TreeError> {
        if parent.0 >= self.slots.len() {
            return Err(TreeError::UnknownParent { parent });
        }

        let insert_at = self
            .order
            .iter()
            .rposition(|id| self.slots[id.0].parent == Some(parent))
            .map_or(0, |index| index + 1);

        let id = self.allocate(Some(payload));
        self.slots[id.0].parent = Some(parent);
        self.order.insert(insert_at, id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0).and_then(|node| node.payload.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|node| node.payload.as_mut())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|node| node.parent)
    }

    /// All nodes in sequence order, ending with the root
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> + '_ {
        self.order.iter().map(move |&id| (id, &self.slots[id.0]))
    }

    /// Payloads of every node before the root, in sequence order
    pub fn contents(&self) -> impl Iterator<Item = &T> + '_ {
        let root = self.get_root();
        self.iter()
            .take_while(move |(id, _)| Some(*id) != root)
            .filter_map(|(_, node)| node.payload.as_ref())
    }

    /// Children of `parent` in sequence order
    pub fn children_of(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |(_, node)| node.parent == Some(parent))
            .map(|(id, _)| id)
    }

    /// Node count, root included
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every node and payload
    pub fn clear(&mut self) {
        self.order.clear();
        self.slots.clear();
    }

    fn allocate(&mut self, payload: Option<T>) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Node {
            payload,
            parent: None,
        });
        id
    }
}

impl<T> Default for NaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
