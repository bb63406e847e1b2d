//! Rule-based transformation and validation of XML documents
//!
//! A [`RuleEngine`] owns one [`dom::Document`], collects [`Rule`]s, and
//! applies them as a batch:
//!
//! ```text
//! add_rule → add_rule → execute → (tree mutated, log filled) → to_xml / validation_log
//! ```
//!
//! Transform rules edit the tree. Validation rules only read it and report
//! into a deduplicating [`ValidationLog`]; a failed validation never stops
//! the batch.

pub mod engine;
pub mod error;
pub mod log;
pub mod rule;
pub mod ruleset;
pub mod transforms;
pub mod validations;

pub use engine::{EngineConfig, RuleEngine};
pub use error::{Result, RuleError};
pub use log::{ValidationIssue, ValidationLog};
pub use rule::Rule;
pub use ruleset::{load_rules_from_file, load_rules_from_str, RuleFile, RuleSpec};
pub use validations::TextPattern;
