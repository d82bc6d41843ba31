use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::Result;
use crate::revision::{Attribute, Revision, TIMESTAMP_FORMAT};

/// Typed value a criterion is evaluated against: one revision attribute,
/// or the whole record for wildcard criteria.
#[derive(Debug, Clone)]
pub enum MatchValue<'a> {
    Author(&'a str),
    Date(DateTime<FixedOffset>),
    Message(&'a str),
    Number(u64),
    Revision(&'a Revision),
}

impl<'a> MatchValue<'a> {
    /// The value of one named attribute
    pub fn of(attribute: Attribute, revision: &'a Revision) -> MatchValue<'a> {
        match attribute {
            Attribute::Author => MatchValue::Author(&revision.author),
            Attribute::Date => MatchValue::Date(revision.timestamp),
            Attribute::Message => MatchValue::Message(&revision.message),
            Attribute::Number => MatchValue::Number(revision.number),
        }
    }

    /// The whole record, handed to wildcard criteria
    pub fn whole(revision: &'a Revision) -> MatchValue<'a> {
        MatchValue::Revision(revision)
    }

    /// String form of the value. The whole record has none, which makes
    /// pattern and literal matchers not applicable to it.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match self {
            MatchValue::Author(author) => Some(Cow::Borrowed(author)),
            MatchValue::Message(message) => Some(Cow::Borrowed(message)),
            MatchValue::Date(timestamp) => {
                Some(Cow::Owned(timestamp.format(TIMESTAMP_FORMAT).to_string()))
            }
            MatchValue::Number(number) => Some(Cow::Owned(number.to_string())),
            MatchValue::Revision(_) => None,
        }
    }
}

/// Custom match condition supplied by the caller
pub trait Predicate: Send + Sync {
    fn satisfied_by(&self, value: &MatchValue<'_>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&MatchValue<'_>) -> bool + Send + Sync,
{
    fn satisfied_by(&self, value: &MatchValue<'_>) -> bool {
        self(value)
    }
}

/// One way of deciding whether a value satisfies a criterion
pub enum Matcher {
    /// Satisfied if the regex matches anywhere in the value's string form
    Pattern(Regex),
    /// Satisfied if the value's string form equals the literal exactly
    Literal(String),
    /// Satisfied if the caller-supplied predicate accepts the typed value
    Predicate(Box<dyn Predicate>),
}

impl Matcher {
    /// Compile a regex pattern matcher
    pub fn pattern(pattern: &str) -> Result<Matcher> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    /// Wrap an already compiled regex
    pub fn regex(regex: Regex) -> Matcher {
        Matcher::Pattern(regex)
    }

    /// Exact string equality matcher
    pub fn literal(text: impl Into<String>) -> Matcher {
        Matcher::Literal(text.into())
    }

    /// Custom predicate matcher
    pub fn predicate(predicate: impl Predicate + 'static) -> Matcher {
        Matcher::Predicate(Box::new(predicate))
    }

    /// Whether the value satisfies this matcher. A matcher that is not
    /// applicable to the value (pattern or literal against the whole
    /// record) answers false.
    pub fn accepts(&self, value: &MatchValue<'_>) -> bool {
        match self {
            Matcher::Pattern(regex) => match value.text() {
                Some(text) => regex.is_match(&text),
                None => false,
            },
            Matcher::Literal(expected) => match value.text() {
                Some(text) => text.as_ref() == expected.as_str(),
                None => false,
            },
            Matcher::Predicate(predicate) => predicate.satisfied_by(value),
        }
    }

    /// The compiled regex, if this is a pattern matcher
    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Matcher::Pattern(regex) => Some(regex),
            _ => None,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Matcher::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Matcher::Literal(text) => write!(f, "\"{}\"", text),
            Matcher::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}
