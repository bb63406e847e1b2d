//! Utility functions for document processing

use crate::document::Document;
use crate::error::Result;
use crate::types::NodeId;

/// Cap text length to keep log lines readable
pub fn cap_text_length(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Get all text content from node and its descendants, in document order
pub fn get_text_content(document: &Document, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    document.traverse_df(node_id, |node| {
        if node.is_text() {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}
