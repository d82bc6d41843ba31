use std::collections::HashMap;
use std::path::Path;

use crate::captures::Captures;
use crate::config::TemplateConfig;
use crate::error::{Result, SvnTriggerError};
use crate::revision::{Revision, TIMESTAMP_FORMAT};

/// Named message templates, defined in an `@@ name` delimited file or
/// inline in the configuration
#[derive(Debug, Default, Clone)]
pub struct TemplateSet {
    templates: HashMap<String, String>,
}

impl TemplateSet {
    /// Parse `@@ name` delimited blocks. Text before the first header is
    /// ignored; on duplicate names the first block wins; each body is
    /// stored without its final newline.
    pub fn parse(source: &str) -> TemplateSet {
        let mut blocks: Vec<(String, String)> = Vec::new();
        for line in source.lines() {
            if let Some(header) = line.strip_prefix("@@ ") {
                blocks.push((header.trim().to_string(), String::new()));
            } else if let Some((_, body)) = blocks.last_mut() {
                body.push_str(line);
                body.push('\n');
            }
        }

        let mut templates = HashMap::new();
        for (name, body) in blocks {
            let body = body.strip_suffix('\n').unwrap_or(&body).to_string();
            templates.entry(name).or_insert(body);
        }
        TemplateSet { templates }
    }

    /// Parse a template file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<TemplateSet> {
        let source = std::fs::read_to_string(path)?;
        Ok(TemplateSet::parse(&source))
    }

    /// Build the set declared by the configuration: the optional template
    /// file, with inline entries taking precedence.
    pub fn from_config(config: &TemplateConfig) -> Result<TemplateSet> {
        let mut set = match &config.file {
            Some(path) => TemplateSet::from_file(path)?,
            None => TemplateSet::default(),
        };
        for (name, template) in &config.inline {
            set.templates.insert(name.clone(), template.clone());
        }
        Ok(set)
    }

    /// Add or replace one template
    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    /// The template body registered under `name`
    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(|template| template.as_str())
            .ok_or_else(|| SvnTriggerError::template(format!("no template named '{}'", name)))
    }

    /// Look up a template and fill in its placeholders
    pub fn render(&self, name: &str, revision: &Revision, captures: &Captures) -> Result<String> {
        Ok(substitute(self.get(name)?, revision, captures))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Replace revision placeholders in a piece of text: `{number}`,
/// `{author}`, `{date}`, `{message}`, `{projects}` and capture references
/// like `{message.1}` (1-based, per attribute). Unknown placeholders are
/// left untouched. The text is scanned once, so placeholder-like content
/// inside substituted values is not expanded.
pub fn substitute(text: &str, revision: &Revision, captures: &Captures) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        rest = &rest[open..];
        let close = match rest.find('}') {
            Some(close) => close,
            None => break,
        };
        match resolve(&rest[1..close], revision, captures) {
            Some(value) => {
                result.push_str(&value);
                rest = &rest[close + 1..];
            }
            None => {
                result.push('{');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

fn resolve(name: &str, revision: &Revision, captures: &Captures) -> Option<String> {
    match name {
        "number" => Some(revision.number.to_string()),
        "author" => Some(revision.author.clone()),
        "date" => Some(revision.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        "message" => Some(revision.message.clone()),
        "projects" => Some(revision.projects().join(", ")),
        _ => {
            let (key, index) = name.rsplit_once('.')?;
            let index: usize = index.parse().ok()?;
            captures.get(key)?.get(index.checked_sub(1)?).cloned()
        }
    }
}
