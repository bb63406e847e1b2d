//! Rule engine - owns a document and runs batches of rules against it
//!
//! Rules are queued with [`RuleEngine::add_rule`] and applied in insertion
//! order by [`RuleEngine::execute`]. Every rule resolves its matches against
//! the tree as the previous rules left it.

use dom::{Document, DomSerializer, SerializerConfig};

use crate::error::Result;
use crate::log::ValidationLog;
use crate::rule::Rule;

/// Configuration for the engine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Output settings used by [`RuleEngine::to_xml`]
    pub serializer: SerializerConfig,
}

pub struct RuleEngine {
    config: EngineConfig,
    document: Document,
    pending: Vec<Rule>,
    log: ValidationLog,
}

impl RuleEngine {
    /// Create engine over a document with default config
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EngineConfig::default())
    }

    /// Create engine with custom config
    pub fn with_config(document: Document, config: EngineConfig) -> Self {
        Self {
            config,
            document,
            pending: Vec::new(),
            log: ValidationLog::new(),
        }
    }

    /// Parse `xml` and wrap the result in an engine
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(Self::new(Document::parse(xml)?))
    }

    /// Queue a rule. Rules run in the order they were added.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.pending.push(rule);
        self
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> &mut Self {
        self.pending.extend(rules);
        self
    }

    pub fn rename_node(&mut self, target: &str, new_tag: &str) -> &mut Self {
        self.add_rule(Rule::rename_node(target, new_tag))
    }

    pub fn add_child(&mut self, target: &str, child_tag: &str) -> &mut Self {
        self.add_rule(Rule::add_child(target, child_tag))
    }

    pub fn wrap_text(&mut self, target: &str, new_tag: &str) -> &mut Self {
        self.add_rule(Rule::wrap_text(target, new_tag))
    }

    /// Queue a relocation. Only predictable with one parent or with as many
    /// parents as targets; see [`crate::transforms::relocate`].
    pub fn relocate(&mut self, target: &str, new_parent: &str) -> &mut Self {
        self.add_rule(Rule::relocate(target, new_parent))
    }

    /// Fails without queuing anything when `pattern` does not compile
    pub fn pattern_match(&mut self, target: &str, pattern: &str) -> Result<&mut Self> {
        let rule = Rule::pattern_match(target, pattern)?;
        Ok(self.add_rule(rule))
    }

    pub fn cross_field(&mut self, target: &str, source: &str) -> &mut Self {
        self.add_rule(Rule::cross_field(target, source))
    }

    /// Rules queued but not yet executed
    pub fn pending(&self) -> &[Rule] {
        &self.pending
    }

    /// Apply every queued rule in order, then clear the queue.
    ///
    /// The queue is cleared even when a rule fails; rules after the failing
    /// one are dropped. With nothing queued this does nothing.
    pub fn execute(&mut self) -> Result<()> {
        let rules = std::mem::take(&mut self.pending);
        if rules.is_empty() {
            return Ok(());
        }

        let issues_before = self.log.len();
        for rule in &rules {
            let applied = rule.run(&mut self.document, &mut self.log)?;
            tracing::debug!(
                kind = rule.kind(),
                tag = rule.target_tag(),
                applied,
                "Rule executed"
            );
        }

        tracing::info!(
            "Executed {} rules, {} new validation issues",
            rules.len(),
            self.log.len() - issues_before
        );
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.log.is_valid()
    }

    /// Rendered validation log, one message per line
    pub fn validation_log(&self) -> String {
        self.log.render()
    }

    pub fn log(&self) -> &ValidationLog {
        &self.log
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access to the tree between batches
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serialize the current document with the configured settings
    pub fn to_xml(&self) -> Result<String> {
        let serializer = DomSerializer::with_config(self.config.serializer.clone());
        Ok(serializer.serialize(&self.document)?)
    }
}
