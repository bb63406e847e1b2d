//! Transform rules - structural edits on one matched node
//!
//! Each function applies one rule to one node. Callers resolve the matches
//! and guarantee the node is still attached to the tree.

use dom::{Document, NodeId};

use crate::error::Result;

/// Replace `node_id` with a new element named `new_tag` at the same position.
///
/// Child nodes (elements and text, in order) and attributes move to the new
/// element; only the tag name and node identity change. Works on the root
/// too.
pub fn rename_node(document: &mut Document, node_id: NodeId, new_tag: &str) -> Result<NodeId> {
    let renamed = document.create_element(new_tag);

    document.replace_node(node_id, renamed)?;
    move_content(document, node_id, renamed)?;

    tracing::trace!(node_id, renamed, new_tag, "Renamed node");
    Ok(renamed)
}

/// Append an empty `child_tag` element as the last child of `node_id`
pub fn add_child(document: &mut Document, node_id: NodeId, child_tag: &str) -> Result<NodeId> {
    let child = document.create_element(child_tag);
    document.append_child(node_id, child)?;

    tracing::trace!(node_id, child, child_tag, "Added child");
    Ok(child)
}

/// Move the node's own text into a new `new_tag` child appended after any
/// existing children, leaving the node itself without text
///
/// The direct text children are joined into the new element; text deeper in
/// the subtree stays where it is.
pub fn wrap_text(document: &mut Document, node_id: NodeId, new_tag: &str) -> Result<NodeId> {
    let text = document.take_text(node_id)?;

    let wrapper = document.create_element(new_tag);
    document.set_text(wrapper, text)?;
    document.append_child(node_id, wrapper)?;

    tracing::trace!(node_id, wrapper, new_tag, "Wrapped text");
    Ok(wrapper)
}

/// Relocate the node's content under the element(s) named `new_parent_tag`.
///
/// With exactly one candidate parent, the node's content is wrapped in a
/// fresh element carrying the node's tag, appended to that parent, and the
/// original node is dropped from the tree. A node without content stays
/// where it is.
///
/// With zero or several candidates the parents are scanned from last to
/// first in document order:
/// - an empty parent receives the content and scanning continues
/// - a parent whose last child is not named like the node receives the
///   content and scanning stops
/// - a parent whose last child is already named like the node is skipped
///
/// This only behaves predictably for one parent, or for equal numbers of
/// nodes and parents. With other ratios some nodes end up under unexpected
/// parents or are not moved at all. Callers should prefer the other rules
/// when they can express the change.
///
/// Parents that sit inside the node's own subtree are skipped, since the
/// move would make the subtree its own ancestor.
pub fn relocate(document: &mut Document, node_id: NodeId, new_parent_tag: &str) -> Result<()> {
    let target_tag = document.tag_name(node_id)?.to_string();
    let parents = document.nodes_with_tag(new_parent_tag);

    if let &[parent_id] = parents.as_slice() {
        if !is_inside(document, node_id, parent_id)? {
            wrap_and_append(document, node_id, parent_id, &target_tag)?;
        }
        return Ok(());
    }

    for &parent_id in parents.iter().rev() {
        if is_inside(document, node_id, parent_id)? {
            continue;
        }

        let Some(last_id) = document.last_child(parent_id)? else {
            wrap_and_append(document, node_id, parent_id, &target_tag)?;
            continue;
        };

        // A trailing text node never matches
        if document.tag_name(last_id)? != target_tag {
            wrap_and_append(document, node_id, parent_id, &target_tag)?;
            break;
        }
    }

    Ok(())
}

fn is_inside(document: &Document, node_id: NodeId, parent_id: NodeId) -> Result<bool> {
    if document.contains(node_id, parent_id)? {
        tracing::warn!(
            node_id,
            parent_id,
            "Skipping relocation target inside the relocated subtree"
        );
        return Ok(true);
    }
    Ok(false)
}

/// Wrap the node's content in a fresh element named `tag`, append it to
/// `parent_id`, then drop the emptied node from the tree
fn wrap_and_append(
    document: &mut Document,
    node_id: NodeId,
    parent_id: NodeId,
    tag: &str,
) -> Result<()> {
    if !document.has_children(node_id)? {
        return Ok(());
    }

    let wrapper = document.create_element(tag);
    move_content(document, node_id, wrapper)?;
    document.append_child(parent_id, wrapper)?;
    document.detach(node_id)?;

    tracing::trace!(node_id, wrapper, parent_id, "Relocated node");
    Ok(())
}

/// Move child nodes and attributes from one element to another
fn move_content(document: &mut Document, from_id: NodeId, to_id: NodeId) -> Result<()> {
    document.move_children(from_id, to_id)?;

    let attributes = std::mem::take(&mut document.get_mut(from_id)?.attributes);
    document.get_mut(to_id)?.attributes = attributes;
    Ok(())
}
