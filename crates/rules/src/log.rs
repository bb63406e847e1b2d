//! Validation log - deduplicating store of validation failures
//!
//! The `valid` flag is sticky: the first issue flips it to false and nothing
//! flips it back. Build a new log to start over.

use ahash::AHashSet;
use serde::Serialize;
use std::fmt;

/// One validation failure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Text content does not fully match the expected pattern
    PatternMismatch { tag: String },

    /// Text content does not contain the source tag's text
    NotContained { tag: String, source_tag: String },

    /// No element carries the source tag, so the cross-check cannot run
    MissingSource { tag: String, source_tag: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::PatternMismatch { tag } => write!(
                f,
                "text type does not match the expected pattern; offending tag: {}",
                tag
            ),
            ValidationIssue::NotContained { tag, source_tag } => write!(
                f,
                "text does not contain the value of {}; offending tag: {}",
                source_tag, tag
            ),
            ValidationIssue::MissingSource { tag, source_tag } => write!(
                f,
                "source tag {} not found; cannot cross-check tag: {}",
                source_tag, tag
            ),
        }
    }
}

/// Append-only validation log
#[derive(Debug, Clone)]
pub struct ValidationLog {
    /// Distinct issues in the order they were first reported
    issues: Vec<ValidationIssue>,
    seen: AHashSet<ValidationIssue>,
    valid: bool,
}

impl ValidationLog {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            seen: AHashSet::new(),
            valid: true,
        }
    }

    /// Record an issue. Returns false when an identical issue was already
    /// present (the log is still marked invalid either way).
    pub fn add(&mut self, issue: ValidationIssue) -> bool {
        self.valid = false;
        if self.seen.contains(&issue) {
            return false;
        }
        tracing::debug!("Validation issue: {}", issue);
        self.seen.insert(issue.clone());
        self.issues.push(issue);
        true
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// One message per line, each terminated by a newline
    pub fn render(&self) -> String {
        let mut output = String::new();
        for issue in &self.issues {
            output.push_str(&issue.to_string());
            output.push('\n');
        }
        output
    }
}

impl Default for ValidationLog {
    fn default() -> Self {
        Self::new()
    }
}
