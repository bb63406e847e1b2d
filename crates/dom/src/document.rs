//! Arena-backed mutable document tree
//!
//! ## Memory Layout
//!
//! ```text
//! Document: Vec<XmlNode>
//!           [Node0][Node1][Node2]...
//!            ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! The tree owns nodes through `children_ids` only. `parent_id` is a
//! navigational index kept in sync by every primitive below. Nodes removed
//! from the tree stay in the arena as unreachable slots; lookups start from
//! the root, so they never see them.
//!
//! Text is stored as text nodes among the element's children, in document
//! order. Adjacent text is merged into one node as it is added.

use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType, XmlNode};
use crate::utils;

/// A document: node arena plus the id of its root element
///
/// Slots are never reused. Every rename or relocation leaves the replaced
/// node behind as an unreachable slot, so the arena only grows over the
/// life of a document; [`Document::len`] counts those slots too. Re-parse
/// the serialized output to start from a compact arena.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Every node ever created, attached or not
    nodes: Vec<XmlNode>,

    root_id: Option<NodeId>,
}

impl Document {
    /// Create a new empty document (no root)
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create document with specific arena capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Create a document whose root is a fresh element named `tag`
    pub fn with_root(tag: &str) -> Self {
        let mut document = Self::new();
        let root_id = document.create_element(tag);
        document.root_id = Some(root_id);
        document
    }

    /// Parse a document from markup with the default parser settings
    pub fn parse(xml: &str) -> Result<Self> {
        crate::parser::DomParser::new().parse_str(xml)
    }

    /// Allocate a new detached, empty element and return its ID
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::new(node_id, tag));
        node_id
    }

    /// Allocate a new detached text node and return its ID
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::new_text(node_id, text));
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&XmlNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    ///
    /// Structural fields must not be edited through this handle; use the
    /// primitives so parent and child links stay consistent.
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut XmlNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Make `node_id` the root element, detaching it from any parent first
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.detach(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    pub fn root(&self) -> Result<&XmlNode> {
        let root_id = self.root_id.ok_or(DomError::NoRoot)?;
        self.get(root_id)
    }

    /// Number of arena slots, including detached nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Result<&str> {
        Ok(self.get(node_id)?.tag_name.as_str())
    }

    /// The node's own text: the value of a text node, or the direct text
    /// children of an element joined in order. Descendants are excluded.
    pub fn text(&self, node_id: NodeId) -> Result<String> {
        let node = self.get(node_id)?;
        if node.is_text() {
            return Ok(node.node_value.clone());
        }

        let mut text = String::new();
        for &child_id in &node.children_ids {
            let child = self.get(child_id)?;
            if child.is_text() {
                text.push_str(&child.node_value);
            }
        }
        Ok(text)
    }

    /// Replace everything under the node with a single text node, like the
    /// DOM's `textContent` setter. An empty string leaves the node empty.
    pub fn set_text(&mut self, node_id: NodeId, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let node = self.get_mut(node_id)?;
        if node.is_text() {
            node.node_value = text;
            return Ok(());
        }

        let children = node.children_ids.clone();
        for child_id in children {
            self.remove_child(node_id, child_id)?;
        }
        if !text.is_empty() {
            let text_id = self.create_text(text);
            self.append_child(node_id, text_id)?;
        }
        Ok(())
    }

    /// Append character data as the last child of `parent_id`, merging it
    /// into the last child when that is already a text node
    pub fn append_text(&mut self, parent_id: NodeId, text: &str) -> Result<()> {
        if let Some(last_id) = self.get(parent_id)?.last_child_id() {
            let last = self.get_mut(last_id)?;
            if last.is_text() {
                last.node_value.push_str(text);
                return Ok(());
            }
        }

        let text_id = self.create_text(text);
        self.append_child(parent_id, text_id)
    }

    /// Detach the direct text children of `node_id` and return their joined
    /// text. Element children stay where they are.
    pub fn take_text(&mut self, node_id: NodeId) -> Result<String> {
        let children = self.get(node_id)?.children_ids.clone();
        let mut text = String::new();

        for child_id in children {
            if self.get(child_id)?.is_text() {
                text.push_str(&self.get(child_id)?.node_value);
                self.remove_child(node_id, child_id)?;
            }
        }
        Ok(text)
    }

    /// DOM-style text content: every descendant text node, in document order
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        utils::get_text_content(self, node_id)
    }

    pub fn children(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(self.get(node_id)?.children_ids.as_slice())
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent_id)
    }

    pub fn last_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.last_child_id())
    }

    pub fn has_children(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.get(node_id)?.has_children())
    }

    /// Inclusive ancestry check: true when `node_id` is `ancestor_id` or lies
    /// somewhere below it
    pub fn contains(&self, ancestor_id: NodeId, node_id: NodeId) -> Result<bool> {
        self.get(ancestor_id)?;
        let mut current = Some(node_id);

        while let Some(id) = current {
            if id == ancestor_id {
                return Ok(true);
            }
            current = self.get(id)?.parent_id;
        }

        Ok(false)
    }

    /// True when the node is reachable from the root
    pub fn is_attached(&self, node_id: NodeId) -> bool {
        match self.root_id {
            Some(root_id) => self.contains(root_id, node_id).unwrap_or(false),
            None => false,
        }
    }

    /// Append `child_id` as the last child of `parent_id`
    ///
    /// The child is detached from its current parent first, so this also
    /// moves nodes. Appending a node under itself, under its own descendant
    /// or under a text node is rejected.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        self.check_hierarchy(parent_id, child_id)?;
        self.detach(child_id)?;

        self.get_mut(parent_id)?.children_ids.push(child_id);
        self.get_mut(child_id)?.parent_id = Some(parent_id);
        Ok(())
    }

    /// Remove `child_id` from `parent_id`'s children
    ///
    /// No-op when `child_id` is not currently a child of `parent_id`.
    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        if self.get(child_id)?.parent_id != Some(parent_id) {
            return Ok(());
        }

        let parent = self.get_mut(parent_id)?;
        if let Some(position) = parent.children_ids.iter().position(|&id| id == child_id) {
            parent.children_ids.remove(position);
        }
        self.get_mut(child_id)?.parent_id = None;
        Ok(())
    }

    /// Put `new_id` at the position `old_id` occupies under `parent_id`,
    /// leaving `old_id` detached
    pub fn replace_child(&mut self, parent_id: NodeId, new_id: NodeId, old_id: NodeId) -> Result<()> {
        if new_id == old_id {
            return Ok(());
        }
        if self.get(old_id)?.parent_id != Some(parent_id) {
            return Err(DomError::NotAChild {
                parent: parent_id,
                child: old_id,
            });
        }
        self.check_hierarchy(parent_id, new_id)?;

        // Detaching first may shift old_id's position when both share a parent
        self.detach(new_id)?;
        let parent = self.get_mut(parent_id)?;
        let position = parent
            .children_ids
            .iter()
            .position(|&id| id == old_id)
            .ok_or(DomError::NotAChild {
                parent: parent_id,
                child: old_id,
            })?;
        parent.children_ids[position] = new_id;

        self.get_mut(new_id)?.parent_id = Some(parent_id);
        self.get_mut(old_id)?.parent_id = None;
        Ok(())
    }

    /// Detach a node from its parent. No-op for parentless nodes.
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        match self.get(node_id)?.parent_id {
            Some(parent_id) => self.remove_child(parent_id, node_id),
            None => Ok(()),
        }
    }

    /// Substitute `new_id` for `old_id` wherever `old_id` sits, including the
    /// root slot. No-op when `old_id` is neither the root nor attached to a
    /// parent.
    pub fn replace_node(&mut self, old_id: NodeId, new_id: NodeId) -> Result<()> {
        if self.root_id == Some(old_id) {
            return self.set_root(new_id);
        }
        match self.get(old_id)?.parent_id {
            Some(parent_id) => self.replace_child(parent_id, new_id, old_id),
            None => Ok(()),
        }
    }

    /// Move every child of `from_id`, in order, to the end of `to_id`'s
    /// children
    pub fn move_children(&mut self, from_id: NodeId, to_id: NodeId) -> Result<()> {
        let children = self.get(from_id)?.children_ids.clone();
        for child_id in children {
            self.append_child(to_id, child_id)?;
        }
        Ok(())
    }

    /// Traverse a subtree depth-first, in document order (iterative, no
    /// recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&XmlNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// All attached elements named `tag` (or every element for `*`), in
    /// document order
    ///
    /// Computed from the current tree on every call, never cached: any
    /// mutation is visible to the next lookup.
    pub fn nodes_with_tag(&self, tag: &str) -> Vec<NodeId> {
        let Some(root_id) = self.root_id else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut stack = vec![root_id];

        while let Some(node_id) = stack.pop() {
            let Ok(node) = self.get(node_id) else {
                continue;
            };
            if node.matches_tag(tag) {
                found.push(node_id);
            }
            stack.extend(node.children_ids.iter().rev().copied());
        }

        found
    }

    /// First attached element named `tag` in document order
    pub fn first_with_tag(&self, tag: &str) -> Option<NodeId> {
        let root_id = self.root_id?;
        let mut stack = vec![root_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id).ok()?;
            if node.matches_tag(tag) {
                return Some(node_id);
            }
            stack.extend(node.children_ids.iter().rev().copied());
        }

        None
    }

    fn check_hierarchy(&self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let parent = self.get(parent_id)?;
        if parent.node_type != NodeType::Element {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: parent.tag_name.clone(),
            });
        }
        if self.contains(child_id, parent_id)? {
            return Err(DomError::HierarchyRequest {
                parent: parent_id,
                child: child_id,
            });
        }
        Ok(())
    }
}
