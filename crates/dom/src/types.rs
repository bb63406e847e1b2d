//! Core node types
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Parent links are indices, never a second ownership edge
//! 3. Use SmallVec for child lists (most elements have few children)

use smallvec::SmallVec;

/// Node identifier (index into the document arena)
pub type NodeId = u32;

/// Tag name that matches every element in lookups
pub const WILDCARD_TAG: &str = "*";

/// Node name carried by text nodes
pub const TEXT_NODE_NAME: &str = "#text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
}

/// One node of the document tree: an element or a run of character data
///
/// Text sits between sibling elements as its own child node, so mixed
/// content keeps its order. Elements never carry a `node_value`; text nodes
/// never carry children or attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Element tag, or `#text`
    pub tag_name: String,
    /// Character data of a text node (unescaped)
    pub node_value: String,

    /// Attributes in source order. Nodes created by rules start with none.
    pub attributes: Vec<(String, String)>,
}

impl XmlNode {
    /// Create a detached, empty element
    pub fn new(node_id: NodeId, tag_name: impl Into<String>) -> Self {
        Self {
            node_id,
            node_type: NodeType::Element,
            parent_id: None,
            children_ids: SmallVec::new(),
            tag_name: tag_name.into(),
            node_value: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a detached text node
    pub fn new_text(node_id: NodeId, text: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            node_value: text.into(),
            ..Self::new(node_id, TEXT_NODE_NAME)
        }
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Child nodes of any type, text included
    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }

    pub fn last_child_id(&self) -> Option<NodeId> {
        self.children_ids.last().copied()
    }

    /// Check whether this node answers to a lookup by `tag`. Text nodes
    /// never do, not even for the wildcard.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.is_element() && (tag == WILDCARD_TAG || self.tag_name == tag)
    }
}
