//! Error types for document operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Cannot append node {child} under {parent}: it is an ancestor of the new parent")]
    HierarchyRequest { parent: u32, child: u32 },

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: u32, child: u32 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(DomError::NodeNotFound(7).to_string(), "Node not found: 7");
        assert_eq!(
            DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: "#text".to_string(),
            }
            .to_string(),
            "Invalid node type: expected element, got #text"
        );
        assert_eq!(
            DomError::Parse("no root element".to_string()).to_string(),
            "Parse error: no root element"
        );
    }
}
