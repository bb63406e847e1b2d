//! Declarative rule files
//!
//! Rules can be written as JSON and loaded in bulk:
//!
//! ```json
//! {
//!   "name": "75-2 client",
//!   "rules": [
//!     { "kind": "wrap_text", "target": "note", "new_tag": "new_test" },
//!     { "kind": "pattern_match", "target": "periodId", "pattern": "^\\d+$" }
//!   ]
//! }
//! ```
//!
//! A bare array of rules is accepted too.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, RuleError};
use crate::rule::Rule;

/// Serializable description of one [`Rule`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    RenameNode { target: String, new_tag: String },
    AddChild { target: String, child_tag: String },
    WrapText { target: String, new_tag: String },
    Relocate { target: String, new_parent: String },
    PatternMatch { target: String, pattern: String },
    CrossField { target: String, source: String },
}

impl TryFrom<RuleSpec> for Rule {
    type Error = RuleError;

    fn try_from(spec: RuleSpec) -> Result<Self> {
        Ok(match spec {
            RuleSpec::RenameNode { target, new_tag } => Rule::rename_node(target, new_tag),
            RuleSpec::AddChild { target, child_tag } => Rule::add_child(target, child_tag),
            RuleSpec::WrapText { target, new_tag } => Rule::wrap_text(target, new_tag),
            RuleSpec::Relocate { target, new_parent } => Rule::relocate(target, new_parent),
            RuleSpec::PatternMatch { target, pattern } => Rule::pattern_match(target, &pattern)?,
            RuleSpec::CrossField { target, source } => Rule::cross_field(target, source),
        })
    }
}

impl From<&Rule> for RuleSpec {
    fn from(rule: &Rule) -> Self {
        match rule {
            Rule::RenameNode { target, new_tag } => RuleSpec::RenameNode {
                target: target.clone(),
                new_tag: new_tag.clone(),
            },
            Rule::AddChild { target, child_tag } => RuleSpec::AddChild {
                target: target.clone(),
                child_tag: child_tag.clone(),
            },
            Rule::WrapText { target, new_tag } => RuleSpec::WrapText {
                target: target.clone(),
                new_tag: new_tag.clone(),
            },
            Rule::Relocate { target, new_parent } => RuleSpec::Relocate {
                target: target.clone(),
                new_parent: new_parent.clone(),
            },
            Rule::PatternMatch { target, pattern } => RuleSpec::PatternMatch {
                target: target.clone(),
                pattern: pattern.as_str().to_string(),
            },
            Rule::CrossField { target, source } => RuleSpec::CrossField {
                target: target.clone(),
                source: source.clone(),
            },
        }
    }
}

/// A named list of rules, in execution order
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuleFile {
    #[serde(default)]
    pub name: Option<String>,

    pub rules: Vec<RuleSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFileFormat {
    File(RuleFile),
    List(Vec<RuleSpec>),
}

impl RuleFile {
    /// Parse a rule file from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(match serde_json::from_str::<RuleFileFormat>(json)? {
            RuleFileFormat::File(file) => file,
            RuleFileFormat::List(rules) => RuleFile { name: None, rules },
        })
    }

    /// Compile every spec, failing on the first invalid pattern
    pub fn into_rules(self) -> Result<Vec<Rule>> {
        self.rules.into_iter().map(Rule::try_from).collect()
    }
}

/// Load rules from a JSON string
pub fn load_rules_from_str(json: &str) -> Result<Vec<Rule>> {
    RuleFile::from_json(json)?.into_rules()
}

/// Load rules from a JSON file
pub fn load_rules_from_file(path: &Path) -> Result<Vec<Rule>> {
    let content = fs::read_to_string(path)?;
    let file = RuleFile::from_json(&content)?;
    tracing::debug!(
        "Loaded {} rules from {} ({})",
        file.rules.len(),
        path.display(),
        file.name.as_deref().unwrap_or("unnamed")
    );
    file.into_rules()
}
