use std::collections::HashMap;

use crate::matcher::MatchValue;
use crate::revision::{Attribute, Revision};
use crate::rule::{Criterion, Rule};

/// Substrings captured by a rule's pattern criteria, grouped per attribute
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Captures {
    groups: HashMap<String, Vec<String>>,
}

impl Captures {
    /// Collect captures for one rule against one revision.
    ///
    /// Every attribute criterion backed by a pattern contributes an entry
    /// under its key, holding all participating capture groups across all
    /// non-overlapping occurrences, in order. A pattern without groups
    /// still records its key, with an empty sequence. Literal, predicate
    /// and wildcard criteria contribute nothing.
    pub fn extract(rule: &Rule, revision: &Revision) -> Captures {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();

        for criterion in rule.criteria().entries() {
            let (key, matcher) = match criterion {
                Criterion::Attribute { key, matcher } => (key, matcher),
                Criterion::WholeRecord(_) => continue,
            };
            let regex = match matcher.as_regex() {
                Some(regex) => regex,
                None => continue,
            };
            let attribute = match Attribute::from_key(key) {
                Some(attribute) => attribute,
                None => continue,
            };
            let text = match MatchValue::of(attribute, revision).text() {
                Some(text) => text,
                None => continue,
            };

            let entry = groups.entry(key.clone()).or_default();
            for occurrence in regex.captures_iter(text.as_ref()) {
                for group in occurrence.iter().skip(1).flatten() {
                    entry.push(group.as_str().to_string());
                }
            }
        }

        Captures { groups }
    }

    /// Captured substrings for one attribute key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(|values| values.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Number of attributes that recorded an entry
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::revision::TIMESTAMP_FORMAT;
    use crate::rule::{callback, Criteria};
    use chrono::DateTime;

    fn revision(message: &str) -> Revision {
        Revision {
            number: 7,
            author: "bram".to_string(),
            timestamp: DateTime::parse_from_str("2010-07-05 17:00:00 +0200", TIMESTAMP_FORMAT)
                .unwrap(),
            message: message.to_string(),
            changed_directories: vec![],
        }
    }

    fn rule_with(criteria: Criteria) -> Rule {
        Rule::new(criteria, Some(callback(|_, _| Ok(())))).unwrap()
    }

    #[test]
    fn test_single_group_capture() {
        let criteria =
            Criteria::new().attribute("message", Matcher::pattern("hello, (.+)!").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("hello, world!"));
        assert_eq!(captures.get("message"), Some(&["world".to_string()][..]));
    }

    #[test]
    fn test_zero_group_pattern_records_empty_entry() {
        let criteria = Criteria::new().attribute("message", Matcher::pattern("deploy").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("please deploy now"));
        assert!(captures.contains("message"));
        assert_eq!(captures.get("message"), Some(&[][..]));
    }

    #[test]
    fn test_optional_group_participates_only_when_matched() {
        let criteria = Criteria::new().attribute("message", Matcher::pattern("fo(o)?").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("foo"));
        assert_eq!(captures.get("message"), Some(&["o".to_string()][..]));

        let criteria = Criteria::new().attribute("message", Matcher::pattern("fo(o)?").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("fo foo fo"));
        assert_eq!(captures.get("message"), Some(&["o".to_string()][..]));
    }

    #[test]
    fn test_groups_flatten_across_occurrences() {
        let criteria =
            Criteria::new().attribute("message", Matcher::pattern(r"(\w+)@(\w+)").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("a@b then c@d"));
        let expected: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(captures.get("message"), Some(&expected[..]));
    }

    #[test]
    fn test_multiple_attributes_capture_separately() {
        let criteria = Criteria::new()
            .attribute("author", Matcher::pattern("(br)am").unwrap())
            .attribute("message", Matcher::pattern("(fix)").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("fix the build"));
        assert_eq!(captures.get("author"), Some(&["br".to_string()][..]));
        assert_eq!(captures.get("message"), Some(&["fix".to_string()][..]));
        assert_eq!(captures.len(), 2);
    }

    #[test]
    fn test_repeated_attribute_appends_in_criterion_order() {
        let criteria = Criteria::new()
            .attribute("message", Matcher::pattern("(first)").unwrap())
            .attribute("message", Matcher::pattern("(second)").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("first and second"));
        let expected: Vec<String> = vec!["first".to_string(), "second".to_string()];
        assert_eq!(captures.get("message"), Some(&expected[..]));
    }

    #[test]
    fn test_literal_and_predicate_contribute_nothing() {
        let criteria = Criteria::new()
            .attribute("author", Matcher::literal("bram"))
            .attribute(
                "number",
                Matcher::predicate(|value: &MatchValue<'_>| {
                    matches!(value, MatchValue::Number(_))
                }),
            )
            .whole_record(Matcher::predicate(|_: &MatchValue<'_>| true));
        let captures = Captures::extract(&rule_with(criteria), &revision("anything"));
        assert!(captures.is_empty());
    }

    #[test]
    fn test_number_attribute_captures_string_form() {
        let criteria = Criteria::new().attribute("number", Matcher::pattern("^(\\d)").unwrap());
        let captures = Captures::extract(&rule_with(criteria), &revision("x"));
        assert_eq!(captures.get("number"), Some(&["7".to_string()][..]));
    }
}
