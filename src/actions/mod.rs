//! Actions wired to configured rules
//!
//! Turns the `[[rules]]` declarations of the configuration into engine
//! rules whose callbacks do the actual work:
//! - mail: render a template and deliver it through sendmail
//! - command: run a program with revision details in its environment
//! - log: write a substituted line to the log

pub mod command;
pub mod mail;

pub use command::CommandAction;
pub use mail::MailAction;

use std::sync::Arc;

use regex::Regex;
use tracing::info;

use crate::captures::Captures;
use crate::config::{ActionConfig, Config, RuleConfig};
use crate::error::Result;
use crate::mail::{MailTransport, Sendmail};
use crate::matcher::{MatchValue, Matcher};
use crate::paths::SearchPath;
use crate::registry::Registry;
use crate::revision::Revision;
use crate::rule::{callback, Callback, Criteria, Rule};
use crate::template::{substitute, TemplateSet};

/// Shared collaborators handed to actions built from the configuration
pub struct ActionEnv {
    pub templates: Arc<TemplateSet>,
    pub transport: Arc<dyn MailTransport>,
    pub search: Arc<SearchPath>,
    pub default_from: String,
}

impl ActionEnv {
    /// Assemble the collaborators the configuration describes
    pub fn from_config(config: &Config) -> Result<ActionEnv> {
        let search = Arc::new(SearchPath::with_preferred(&config.svn.paths));
        let templates = Arc::new(TemplateSet::from_config(&config.templates)?);
        let transport: Arc<dyn MailTransport> = Arc::new(Sendmail::new(search.as_ref().clone()));
        Ok(ActionEnv {
            templates,
            transport,
            search,
            default_from: config.mail.from.clone(),
        })
    }
}

/// One executable action from a rule declaration
pub enum Action {
    Mail(MailAction),
    Command(CommandAction),
    Log(LogAction),
}

impl Action {
    /// Build the action a declaration asks for. Mail actions resolve their
    /// template immediately, so a missing template fails at startup rather
    /// than mid-dispatch.
    pub fn from_config(config: &ActionConfig, env: &ActionEnv) -> Result<Action> {
        match config {
            ActionConfig::Mail {
                to,
                subject,
                template,
                from,
            } => Ok(Action::Mail(MailAction::from_config(
                to,
                subject,
                template,
                from.clone(),
                env,
            )?)),
            ActionConfig::Command { program, args } => Ok(Action::Command(CommandAction::new(
                program,
                args.clone(),
                env.search.clone(),
            ))),
            ActionConfig::Log { message } => Ok(Action::Log(LogAction::new(message.clone()))),
        }
    }

    pub fn run(&self, revision: &Revision, captures: &Captures) -> Result<()> {
        match self {
            Action::Mail(action) => action.run(revision, captures),
            Action::Command(action) => action.run(revision, captures),
            Action::Log(action) => action.run(revision, captures),
        }
    }

    /// Consume the action into a rule callback
    pub fn into_callback(self) -> Callback {
        callback(move |revision, captures| self.run(revision, captures))
    }
}

/// Writes one line to the log when the rule fires
pub struct LogAction {
    message: Option<String>,
}

impl LogAction {
    pub fn new(message: Option<String>) -> LogAction {
        LogAction { message }
    }

    pub fn run(&self, revision: &Revision, captures: &Captures) -> Result<()> {
        let line = match &self.message {
            Some(text) => substitute(text, revision, captures),
            None => format!("rule fired for r{} by {}", revision.number, revision.author),
        };
        info!("{}", line);
        Ok(())
    }
}

/// Build the rule registry the configuration declares, in declaration
/// order. A declaration without criteria or without an action is rejected.
pub fn registry_from_config(config: &Config, env: &ActionEnv) -> Result<Registry> {
    let mut registry = Registry::new();
    for declaration in &config.rules {
        registry.register(rule_from_config(declaration, env)?);
    }
    Ok(registry)
}

fn rule_from_config(declaration: &RuleConfig, env: &ActionEnv) -> Result<Rule> {
    let mut criteria = Criteria::new();
    if let Some(pattern) = &declaration.author {
        criteria = criteria.attribute("author", Matcher::pattern(pattern)?);
    }
    if let Some(pattern) = &declaration.date {
        criteria = criteria.attribute("date", Matcher::pattern(pattern)?);
    }
    if let Some(pattern) = &declaration.message {
        criteria = criteria.attribute("message", Matcher::pattern(pattern)?);
    }
    if let Some(pattern) = &declaration.number {
        criteria = criteria.attribute("number", Matcher::pattern(pattern)?);
    }
    if let Some(pattern) = &declaration.project {
        criteria = criteria.whole_record(project_matcher(pattern)?);
    }

    let action = match &declaration.action {
        Some(config) => Some(Action::from_config(config, env)?),
        None => None,
    };

    let mut rule = Rule::new(criteria, action.map(Action::into_callback))?;
    if let Some(name) = &declaration.name {
        rule = rule.with_label(name);
    }
    Ok(rule)
}

/// Projects are derived data, not a fixed-table attribute, so a project
/// pattern becomes a whole-record predicate testing every derived path.
fn project_matcher(pattern: &str) -> Result<Matcher> {
    let regex = Regex::new(pattern)?;
    Ok(Matcher::predicate(move |value: &MatchValue<'_>| {
        matches!(value, MatchValue::Revision(revision)
            if revision.projects().iter().any(|project| regex.is_match(project)))
    }))
}
