use std::fmt;

use crate::captures::Captures;
use crate::error::{Result, SvnTriggerError};
use crate::matcher::{MatchValue, Matcher};
use crate::revision::{Attribute, Revision};

/// Action invoked when a rule matches a revision
pub type Callback = Box<dyn Fn(&Revision, &Captures) -> Result<()> + Send + Sync>;

/// Box a closure as a rule callback
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Revision, &Captures) -> Result<()> + Send + Sync + 'static,
{
    Box::new(f)
}

/// One condition a revision must satisfy
#[derive(Debug)]
pub enum Criterion {
    /// Wildcard criterion: the matcher receives the whole revision
    WholeRecord(Matcher),
    /// The matcher receives the value of the named attribute. The key is
    /// resolved against the fixed attribute table at match time.
    Attribute { key: String, matcher: Matcher },
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::WholeRecord(matcher) => write!(f, "all ~ {}", matcher),
            Criterion::Attribute { key, matcher } => write!(f, "{} ~ {}", key, matcher),
        }
    }
}

/// Ordered list of criteria, all of which must hold for a rule to match
#[derive(Debug, Default)]
pub struct Criteria {
    entries: Vec<Criterion>,
}

impl Criteria {
    pub fn new() -> Criteria {
        Criteria::default()
    }

    /// Add a criterion against one named attribute
    pub fn attribute(mut self, key: impl Into<String>, matcher: Matcher) -> Criteria {
        self.entries.push(Criterion::Attribute {
            key: key.into(),
            matcher,
        });
        self
    }

    /// Add a wildcard criterion against the whole revision
    pub fn whole_record(mut self, matcher: Matcher) -> Criteria {
        self.entries.push(Criterion::WholeRecord(matcher));
        self
    }

    pub fn entries(&self) -> &[Criterion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A declared criteria-to-callback binding
pub struct Rule {
    criteria: Criteria,
    callback: Callback,
    label: Option<String>,
}

impl Rule {
    /// Create a rule. Rejects an empty criteria list and a missing
    /// callback, both of which indicate a broken declaration.
    pub fn new(criteria: Criteria, callback: Option<Callback>) -> Result<Rule> {
        let callback = callback.ok_or(SvnTriggerError::MissingCallback)?;
        if criteria.is_empty() {
            return Err(SvnTriggerError::EmptyCriteria);
        }
        Ok(Rule {
            criteria,
            callback,
            label: None,
        })
    }

    /// Shorthand for the common case of one pattern against the log
    /// message.
    pub fn on_message(pattern: &str, callback: Option<Callback>) -> Result<Rule> {
        let criteria = Criteria::new().attribute("message", Matcher::pattern(pattern)?);
        Rule::new(criteria, callback)
    }

    /// Attach a diagnostic name, used in logs and listings only
    pub fn with_label(mut self, label: impl Into<String>) -> Rule {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Whether the revision satisfies every criterion. Attribute keys are
    /// resolved before any matcher runs, so an unrecognized key is
    /// reported even when an earlier criterion would already fail.
    pub fn matches(&self, revision: &Revision) -> Result<bool> {
        let mut pending: Vec<(MatchValue<'_>, &Matcher)> = Vec::with_capacity(self.criteria.len());
        for criterion in self.criteria.entries() {
            match criterion {
                Criterion::WholeRecord(matcher) => {
                    pending.push((MatchValue::whole(revision), matcher));
                }
                Criterion::Attribute { key, matcher } => {
                    let attribute = Attribute::from_key(key)
                        .ok_or_else(|| SvnTriggerError::CannotCompare(key.clone()))?;
                    pending.push((MatchValue::of(attribute, revision), matcher));
                }
            }
        }
        Ok(pending.iter().all(|(value, matcher)| matcher.accepts(value)))
    }

    /// Extract captures and invoke the callback. Callback errors propagate
    /// unmodified.
    pub fn run(&self, revision: &Revision) -> Result<()> {
        let captures = Captures::extract(self, revision);
        (self.callback)(revision, &captures)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::TIMESTAMP_FORMAT;
    use chrono::DateTime;

    fn revision_with(author: &str, message: &str) -> Revision {
        Revision {
            number: 7,
            author: author.to_string(),
            timestamp: DateTime::parse_from_str("2010-07-05 17:00:00 +0200", TIMESTAMP_FORMAT)
                .unwrap(),
            message: message.to_string(),
            changed_directories: vec!["/project1/trunk".to_string()],
        }
    }

    fn noop() -> Option<Callback> {
        Some(callback(|_, _| Ok(())))
    }

    #[test]
    fn test_on_message_matches_substring() {
        let rule = Rule::on_message("foo", noop()).unwrap();
        assert!(rule.matches(&revision_with("bram", "prefix foo suffix")).unwrap());
        assert!(!rule.matches(&revision_with("bram", "bar only")).unwrap());
    }

    #[test]
    fn test_anchored_author_criterion() {
        let criteria = Criteria::new().attribute("author", Matcher::pattern("^john$").unwrap());
        let rule = Rule::new(criteria, noop()).unwrap();
        assert!(rule.matches(&revision_with("john", "x")).unwrap());
        assert!(!rule.matches(&revision_with("johnny", "x")).unwrap());
    }

    #[test]
    fn test_all_criteria_must_hold() {
        let criteria = Criteria::new()
            .attribute("author", Matcher::literal("john"))
            .attribute("message", Matcher::pattern("deploy").unwrap());
        let rule = Rule::new(criteria, noop()).unwrap();
        assert!(rule.matches(&revision_with("john", "please deploy")).unwrap());
        assert!(!rule.matches(&revision_with("john", "no match")).unwrap());
        assert!(!rule.matches(&revision_with("jane", "please deploy")).unwrap());
    }

    #[test]
    fn test_unknown_key_cannot_compare() {
        let criteria = Criteria::new().attribute("bogus", Matcher::pattern("x").unwrap());
        let rule = Rule::new(criteria, noop()).unwrap();
        let err = rule.matches(&revision_with("bram", "x")).unwrap_err();
        match err {
            SvnTriggerError::CannotCompare(key) => assert_eq!(key, "bogus"),
            other => panic!("expected CannotCompare, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_reported_before_matching() {
        // The failing message criterion comes first, but key resolution
        // happens before any matcher runs.
        let criteria = Criteria::new()
            .attribute("message", Matcher::pattern("never matches").unwrap())
            .attribute("bogus", Matcher::pattern("x").unwrap());
        let rule = Rule::new(criteria, noop()).unwrap();
        assert!(matches!(
            rule.matches(&revision_with("bram", "other")),
            Err(SvnTriggerError::CannotCompare(_))
        ));
    }

    #[test]
    fn test_wildcard_predicate_sees_whole_revision() {
        let criteria = Criteria::new().whole_record(Matcher::predicate(
            |value: &MatchValue<'_>| {
                matches!(value, MatchValue::Revision(rev) if rev.author == "bram")
            },
        ));
        let rule = Rule::new(criteria, noop()).unwrap();
        assert!(rule.matches(&revision_with("bram", "x")).unwrap());
        assert!(!rule.matches(&revision_with("john", "x")).unwrap());
    }

    #[test]
    fn test_empty_criteria_rejected() {
        assert!(matches!(
            Rule::new(Criteria::new(), noop()),
            Err(SvnTriggerError::EmptyCriteria)
        ));
    }

    #[test]
    fn test_missing_callback_rejected() {
        let criteria = Criteria::new().attribute("message", Matcher::literal("x"));
        assert!(matches!(
            Rule::new(criteria, None),
            Err(SvnTriggerError::MissingCallback)
        ));
        assert!(matches!(
            Rule::on_message("x", None),
            Err(SvnTriggerError::MissingCallback)
        ));
    }

    #[test]
    fn test_run_propagates_callback_error() {
        let rule = Rule::on_message(
            "deploy",
            Some(callback(|_, _| {
                Err(SvnTriggerError::callback("deploy hook exploded"))
            })),
        )
        .unwrap();
        let err = rule.run(&revision_with("bram", "deploy")).unwrap_err();
        assert!(err.to_string().contains("deploy hook exploded"));
    }

    #[test]
    fn test_label_is_diagnostic_only() {
        let rule = Rule::on_message("x", noop()).unwrap().with_label("notify");
        assert_eq!(rule.label(), Some("notify"));
        assert!(rule.matches(&revision_with("bram", "x")).unwrap());
    }
}
