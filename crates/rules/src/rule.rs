//! Rule - one parameterized transform or validation
//!
//! A closed enum instead of a trait object: the set of rule kinds is fixed,
//! and each variant carries only its own parameters.

use dom::{Document, NodeId};

use crate::error::Result;
use crate::log::ValidationLog;
use crate::transforms;
use crate::validations::{self, TextPattern};

#[derive(Debug, Clone)]
pub enum Rule {
    /// Replace every `target` element with a `new_tag` element
    RenameNode { target: String, new_tag: String },

    /// Append an empty `child_tag` element to every `target` element
    AddChild { target: String, child_tag: String },

    /// Move the text of every `target` element into a new `new_tag` child
    WrapText { target: String, new_tag: String },

    /// Move every `target` element under the `new_parent` element(s).
    /// See [`transforms::relocate`] for the matching heuristic.
    Relocate { target: String, new_parent: String },

    /// Report `target` elements whose whole text does not match `pattern`
    PatternMatch { target: String, pattern: TextPattern },

    /// Report `target` elements whose text does not contain the text of the
    /// first `source` element
    CrossField { target: String, source: String },
}

impl Rule {
    pub fn rename_node(target: impl Into<String>, new_tag: impl Into<String>) -> Self {
        Rule::RenameNode {
            target: target.into(),
            new_tag: new_tag.into(),
        }
    }

    pub fn add_child(target: impl Into<String>, child_tag: impl Into<String>) -> Self {
        Rule::AddChild {
            target: target.into(),
            child_tag: child_tag.into(),
        }
    }

    pub fn wrap_text(target: impl Into<String>, new_tag: impl Into<String>) -> Self {
        Rule::WrapText {
            target: target.into(),
            new_tag: new_tag.into(),
        }
    }

    pub fn relocate(target: impl Into<String>, new_parent: impl Into<String>) -> Self {
        Rule::Relocate {
            target: target.into(),
            new_parent: new_parent.into(),
        }
    }

    /// Fails when `pattern` is not a valid regular expression
    pub fn pattern_match(target: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Rule::PatternMatch {
            target: target.into(),
            pattern: TextPattern::new(pattern)?,
        })
    }

    pub fn cross_field(target: impl Into<String>, source: impl Into<String>) -> Self {
        Rule::CrossField {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Tag name used to select the nodes this rule applies to
    pub fn target_tag(&self) -> &str {
        match self {
            Rule::RenameNode { target, .. }
            | Rule::AddChild { target, .. }
            | Rule::WrapText { target, .. }
            | Rule::Relocate { target, .. }
            | Rule::PatternMatch { target, .. }
            | Rule::CrossField { target, .. } => target,
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::RenameNode { .. } => "rename_node",
            Rule::AddChild { .. } => "add_child",
            Rule::WrapText { .. } => "wrap_text",
            Rule::Relocate { .. } => "relocate",
            Rule::PatternMatch { .. } => "pattern_match",
            Rule::CrossField { .. } => "cross_field",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Rule::PatternMatch { .. } | Rule::CrossField { .. })
    }

    /// Apply the rule to a single node
    pub fn apply(&self, document: &mut Document, log: &mut ValidationLog, node_id: NodeId) -> Result<()> {
        match self {
            Rule::RenameNode { new_tag, .. } => {
                transforms::rename_node(document, node_id, new_tag)?;
            }
            Rule::AddChild { child_tag, .. } => {
                transforms::add_child(document, node_id, child_tag)?;
            }
            Rule::WrapText { new_tag, .. } => {
                transforms::wrap_text(document, node_id, new_tag)?;
            }
            Rule::Relocate { new_parent, .. } => {
                transforms::relocate(document, node_id, new_parent)?;
            }
            Rule::PatternMatch { pattern, .. } => {
                validations::check_pattern(document, log, node_id, pattern)?;
            }
            Rule::CrossField { source, .. } => {
                validations::check_contains(document, log, node_id, source)?;
            }
        }
        Ok(())
    }

    /// Resolve the current matches and apply the rule to each of them.
    /// Returns the number of nodes the rule was applied to.
    ///
    /// Matches are processed from the last one in document order to the
    /// first. Applying a rule can remove or move nodes, so the match list
    /// shrinks and reorders as we go; walking it backwards visits every
    /// original match exactly once. Do not turn this into a forward loop.
    pub fn run(&self, document: &mut Document, log: &mut ValidationLog) -> Result<usize> {
        let matches = document.nodes_with_tag(self.target_tag());
        let mut applied = 0;

        for &node_id in matches.iter().rev() {
            // An earlier application in this run may have dropped the node
            if !document.is_attached(node_id) {
                continue;
            }
            self.apply(document, log, node_id)?;
            applied += 1;
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{DomSerializer, SerializerConfig};

    fn to_xml(document: &Document) -> String {
        DomSerializer::with_config(SerializerConfig::compact())
            .serialize(document)
            .unwrap()
    }

    #[test]
    fn test_target_tag_and_kind() {
        let rule = Rule::relocate("item", "container");
        assert_eq!(rule.target_tag(), "item");
        assert_eq!(rule.kind(), "relocate");
        assert!(!rule.is_validation());
        assert!(Rule::cross_field("total", "subtotal").is_validation());
    }

    #[test]
    fn test_run_without_matches_is_noop() {
        let mut doc = Document::parse("<r><a/></r>").unwrap();
        let mut log = ValidationLog::new();

        let applied = Rule::rename_node("missing", "x")
            .run(&mut doc, &mut log)
            .unwrap();

        assert_eq!(applied, 0);
        assert_eq!(to_xml(&doc), "<r><a/></r>");
    }

    #[test]
    fn test_run_renames_nested_matches() {
        let mut doc = Document::parse("<r><code><code>1</code></code><code/></r>").unwrap();
        let mut log = ValidationLog::new();

        let applied = Rule::rename_node("code", "id").run(&mut doc, &mut log).unwrap();

        assert_eq!(applied, 3);
        assert_eq!(to_xml(&doc), "<r><id><id>1</id></id><id/></r>");
    }

    #[test]
    fn test_run_relocates_many_targets_under_one_parent() {
        let mut doc = Document::parse(
            "<r><item><a/></item><item><b/></item><list/></r>",
        )
        .unwrap();
        let mut log = ValidationLog::new();

        Rule::relocate("item", "list").run(&mut doc, &mut log).unwrap();

        // Reverse order: the second item lands first
        assert_eq!(
            to_xml(&doc),
            "<r><list><item><b/></item><item><a/></item></list></r>"
        );
    }

    #[test]
    fn test_run_add_child_to_every_match() {
        let mut doc = Document::parse("<r><item/><item><x/></item></r>").unwrap();
        let mut log = ValidationLog::new();

        Rule::add_child("item", "code").run(&mut doc, &mut log).unwrap();

        for item in doc.nodes_with_tag("item") {
            let last = doc.last_child(item).unwrap().unwrap();
            assert_eq!(doc.tag_name(last).unwrap(), "code");
        }
        assert_eq!(to_xml(&doc), "<r><item><code/></item><item><x/><code/></item></r>");
    }

    #[test]
    fn test_run_wildcard_pattern() {
        let mut doc = Document::parse("<r><a>1</a><b>x</b></r>").unwrap();
        let mut log = ValidationLog::new();

        Rule::pattern_match("*", r"\d+")
            .unwrap()
            .run(&mut doc, &mut log)
            .unwrap();

        // <r> has text content "1x", <b> has "x"
        let tags: Vec<_> = log.issues().iter().map(|i| i.to_string()).collect();
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().any(|m| m.ends_with(": b")));
        assert!(tags.iter().any(|m| m.ends_with(": r")));
    }
}
