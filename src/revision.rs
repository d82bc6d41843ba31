use chrono::{DateTime, FixedOffset};

use crate::error::{Result, SvnTriggerError};

/// Timestamp layout used by `svnlook info`, minus the trailing parenthetical
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Path segments that mark the end of a project root
const PROJECT_MARKERS: [&str; 3] = ["trunk", "branches", "tags"];

/// Recognized revision attributes a rule criterion may name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Author,
    Date,
    Message,
    Number,
}

impl Attribute {
    /// Resolve a criterion key against the fixed attribute table
    pub fn from_key(key: &str) -> Option<Attribute> {
        match key {
            "author" => Some(Attribute::Author),
            "date" => Some(Attribute::Date),
            "message" => Some(Attribute::Message),
            "number" => Some(Attribute::Number),
            _ => None,
        }
    }

    /// The key this attribute is declared under
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Author => "author",
            Attribute::Date => "date",
            Attribute::Message => "message",
            Attribute::Number => "number",
        }
    }
}

/// Structured record of one committed revision
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub number: u64,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub changed_directories: Vec<String>,
}

impl Revision {
    /// Parse the raw `svnlook info` and `svnlook dirs-changed` output for
    /// one revision.
    ///
    /// The info text carries four newline-separated fields: author,
    /// timestamp, message byte length (ignored) and the log message, which
    /// may itself span multiple lines.
    pub fn parse(number_text: &str, raw_info: &str, raw_dirs_changed: &str) -> Result<Revision> {
        let number = Revision::parse_number(number_text)?;

        let parts: Vec<&str> = raw_info.splitn(4, '\n').collect();
        if parts.len() < 4 {
            return Err(SvnTriggerError::MalformedRevisionInfo(format!(
                "expected 4 fields, got {}",
                parts.len()
            )));
        }

        let author = parts[0].trim();
        if author.is_empty() {
            return Err(SvnTriggerError::MalformedRevisionInfo(
                "author field is empty".to_string(),
            ));
        }

        let timestamp = parse_timestamp(parts[1])?;

        // One trailing newline belongs to the svnlook framing, not the message.
        let message = parts[3].strip_suffix('\n').unwrap_or(parts[3]).to_string();

        let changed_directories = raw_dirs_changed
            .split_whitespace()
            .map(|dir| dir.to_string())
            .collect();

        Ok(Revision {
            number,
            author: author.to_string(),
            timestamp,
            message,
            changed_directories,
        })
    }

    /// Coerce the revision number argument handed to the hook
    pub fn parse_number(text: &str) -> Result<u64> {
        let trimmed = text.trim();
        match trimmed.parse::<u64>() {
            Ok(number) if number >= 1 => Ok(number),
            _ => Err(SvnTriggerError::InvalidRevisionNumber(trimmed.to_string())),
        }
    }

    /// Project roots touched by this revision, derived from the changed
    /// directories: the path up to the first `trunk`, `branches` or `tags`
    /// segment. First-occurrence order, duplicates collapsed, paths without
    /// a marker segment ignored.
    pub fn projects(&self) -> Vec<String> {
        let mut projects: Vec<String> = Vec::new();
        for dir in &self.changed_directories {
            let segments: Vec<&str> = dir.split('/').collect();
            if let Some(marker) = segments
                .iter()
                .position(|segment| PROJECT_MARKERS.contains(segment))
            {
                let project = segments[..marker].join("/");
                if !projects.contains(&project) {
                    projects.push(project);
                }
            }
        }
        projects
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    // "2010-07-05 17:00:00 +0200 (Mon, 05 Jul 2010)": the parenthetical
    // repeats the date and is ignored.
    let bare = match text.find(" (") {
        Some(at) => &text[..at],
        None => text,
    };
    DateTime::parse_from_str(bare.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| SvnTriggerError::MalformedTimestamp(text.to_string()))
}
