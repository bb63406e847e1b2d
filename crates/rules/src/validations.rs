//! Validation rules - read-only checks that report into the log

use dom::{Document, NodeId};
use regex::Regex;

use crate::error::{Result, RuleError};
use crate::log::{ValidationIssue, ValidationLog};

/// A regular expression that must match a whole text, not a substring of it
#[derive(Debug, Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
}

impl TextPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written by the caller
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Log a [`ValidationIssue::PatternMismatch`] unless the node's entire text
/// content matches `pattern`
pub fn check_pattern(
    document: &Document,
    log: &mut ValidationLog,
    node_id: NodeId,
    pattern: &TextPattern,
) -> Result<()> {
    let text = document.text_content(node_id)?;
    if pattern.is_full_match(&text) {
        return Ok(());
    }

    tracing::trace!(
        node_id,
        text = %dom::utils::cap_text_length(&text, 40),
        pattern = pattern.as_str(),
        "Pattern mismatch"
    );
    log.add(ValidationIssue::PatternMismatch {
        tag: document.tag_name(node_id)?.to_string(),
    });
    Ok(())
}

/// Log a [`ValidationIssue::NotContained`] unless the node's text content
/// contains the text content of the first `source_tag` element.
///
/// The source text is matched literally as `.*<source>.*` against the whole
/// target text. `.` stops at line breaks, so the source must sit on a line
/// of the target that has no other line break around the match.
///
/// When no element is named `source_tag`, a
/// [`ValidationIssue::MissingSource`] is logged instead.
pub fn check_contains(
    document: &Document,
    log: &mut ValidationLog,
    node_id: NodeId,
    source_tag: &str,
) -> Result<()> {
    let tag = document.tag_name(node_id)?.to_string();

    let Some(source_id) = document.first_with_tag(source_tag) else {
        log.add(ValidationIssue::MissingSource {
            tag,
            source_tag: source_tag.to_string(),
        });
        return Ok(());
    };

    let expected = document.text_content(source_id)?;
    let containment = TextPattern::new(&format!(".*{}.*", regex::escape(&expected)))?;
    let text = document.text_content(node_id)?;
    if !containment.is_full_match(&text) {
        log.add(ValidationIssue::NotContained {
            tag,
            source_tag: source_tag.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_anchored() {
        let digits = TextPattern::new(r"\d+").unwrap();

        assert!(digits.is_full_match("42"));
        assert!(!digits.is_full_match("4a2"));
        assert!(!digits.is_full_match("a42"));
        assert!(TextPattern::new(r"^\d+$").unwrap().is_full_match("42"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let pattern = TextPattern::new("yes|no").unwrap();

        assert!(pattern.is_full_match("no"));
        assert!(!pattern.is_full_match("nope"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = TextPattern::new("(").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_check_pattern() {
        let doc = Document::parse("<r><id>42</id><id>4a2</id></r>").unwrap();
        let ids = doc.nodes_with_tag("id");
        let pattern = TextPattern::new(r"^\d+$").unwrap();
        let mut log = ValidationLog::new();

        check_pattern(&doc, &mut log, ids[0], &pattern).unwrap();
        assert!(log.is_valid());

        check_pattern(&doc, &mut log, ids[1], &pattern).unwrap();
        assert_eq!(
            log.issues(),
            &[ValidationIssue::PatternMismatch {
                tag: "id".to_string()
            }]
        );
    }

    #[test]
    fn test_check_contains() {
        let doc = Document::parse(
            "<r><subtotal>100</subtotal><total>100 plus tax</total><total>50</total></r>",
        )
        .unwrap();
        let totals = doc.nodes_with_tag("total");
        let mut log = ValidationLog::new();

        check_contains(&doc, &mut log, totals[0], "subtotal").unwrap();
        assert!(log.is_valid());

        check_contains(&doc, &mut log, totals[1], "subtotal").unwrap();
        let message = log.render();
        assert!(message.contains("total"));
        assert!(message.contains("subtotal"));
        assert!(matches!(log.issues()[0], ValidationIssue::NotContained { .. }));
    }

    #[test]
    fn test_check_contains_treats_source_text_literally() {
        let doc = Document::parse("<r><src>1.5</src><dst>105</dst></r>").unwrap();
        let dst = doc.first_with_tag("dst").unwrap();
        let mut log = ValidationLog::new();

        check_contains(&doc, &mut log, dst, "src").unwrap();

        assert!(!log.is_valid());
    }

    #[test]
    fn test_check_contains_does_not_cross_lines() {
        let doc = Document::parse("<r><src>100</src><t>x\n100</t><u>100\n</u><v>a100b</v></r>")
            .unwrap();
        let mut log = ValidationLog::new();

        let t = doc.first_with_tag("t").unwrap();
        check_contains(&doc, &mut log, t, "src").unwrap();
        assert_eq!(
            log.issues(),
            &[ValidationIssue::NotContained {
                tag: "t".to_string(),
                source_tag: "src".to_string(),
            }]
        );

        let u = doc.first_with_tag("u").unwrap();
        check_contains(&doc, &mut log, u, "src").unwrap();
        assert_eq!(log.len(), 2);

        let v = doc.first_with_tag("v").unwrap();
        check_contains(&doc, &mut log, v, "src").unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_check_pattern_sees_surrounding_whitespace() {
        let doc = Document::parse("<r><id> 42 </id></r>").unwrap();
        let id = doc.first_with_tag("id").unwrap();
        let mut log = ValidationLog::new();

        check_pattern(&doc, &mut log, id, &TextPattern::new(r"^\d+$").unwrap()).unwrap();

        assert!(!log.is_valid());
    }

    #[test]
    fn test_check_pattern_on_mixed_content() {
        let doc = Document::parse("<r><a>x<b>1</b>y</a></r>").unwrap();
        let a = doc.first_with_tag("a").unwrap();
        let mut log = ValidationLog::new();

        check_pattern(&doc, &mut log, a, &TextPattern::new("x1y").unwrap()).unwrap();

        assert!(log.is_valid());
    }

    #[test]
    fn test_check_contains_missing_source() {
        let doc = Document::parse("<r><total>50</total></r>").unwrap();
        let total = doc.first_with_tag("total").unwrap();
        let mut log = ValidationLog::new();

        check_contains(&doc, &mut log, total, "subtotal").unwrap();

        assert_eq!(
            log.issues(),
            &[ValidationIssue::MissingSource {
                tag: "total".to_string(),
                source_tag: "subtotal".to_string(),
            }]
        );
    }
}
