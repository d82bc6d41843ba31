use tracing::trace;

use crate::revision::Revision;
use crate::rule::Rule;

/// Ordered collection of declared rules. Registration order is dispatch
/// order.
#[derive(Debug, Default)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Append a rule. Duplicates are not detected; a rule registered twice
    /// fires twice.
    pub fn register(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Every rule matching the revision, in registration order. A rule
    /// that cannot be compared against the revision (unknown attribute
    /// key) is excluded without failing the query.
    pub fn matching(&self, revision: &Revision) -> Vec<&Rule> {
        let mut matched = Vec::new();
        for rule in &self.rules {
            match rule.matches(revision) {
                Ok(true) => matched.push(rule),
                Ok(false) => {}
                Err(err) => {
                    trace!(error = %err, label = rule.label().unwrap_or("<unnamed>"), "rule skipped");
                }
            }
        }
        matched
    }

    /// Remove every registered rule
    pub fn reset(&mut self) {
        self.rules.clear();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
