use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SvnTriggerError};

/// Represents the complete configuration for svn-trigger.
///
/// Contains executable lookup settings, mail defaults, template sources and
/// the ordered rule declarations.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub svn: SvnConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub templates: TemplateConfig,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Executable lookup settings.
///
/// Hooks run with an empty environment, so any directory holding `svnlook`,
/// `sendmail` or command-action programs outside the built-in locations
/// must be listed here.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SvnConfig {
    /// Extra directories searched for executables, highest priority first
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Returns the default sender address for mail actions.
fn default_mail_from() -> String {
    "subversion@localhost".to_string()
}

/// Mail defaults applied to mail actions that do not override them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    #[serde(default = "default_mail_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            from: default_mail_from(),
        }
    }
}

/// Where message templates come from.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TemplateConfig {
    /// Optional path to an `@@ name` delimited template file
    pub file: Option<String>,

    /// Templates defined directly in the configuration; these win over
    /// entries loaded from the file
    #[serde(default)]
    pub inline: HashMap<String, String>,
}

/// One declared rule: criteria patterns plus the action to run.
///
/// Every given pattern must match for the rule to fire. A rule without any
/// pattern is rejected, as is a rule without an action.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RuleConfig {
    /// Diagnostic name shown in logs and listings
    pub name: Option<String>,

    /// Regex matched against the author
    pub author: Option<String>,

    /// Regex matched against the timestamp's string form
    pub date: Option<String>,

    /// Regex matched against the log message
    pub message: Option<String>,

    /// Regex matched against the revision number's string form
    pub number: Option<String>,

    /// Regex matched against every project path derived from the changed
    /// directories; the rule fires if any project matches
    pub project: Option<String>,

    pub action: Option<ActionConfig>,
}

/// The action half of a rule declaration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionConfig {
    /// Render a template and deliver it through sendmail. `to` and
    /// `subject` undergo placeholder substitution; `from` falls back to
    /// the `[mail]` section.
    Mail {
        to: String,
        subject: String,
        template: String,
        from: Option<String>,
    },
    /// Run a program with substituted arguments and revision details in
    /// the environment
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Write a substituted line to the log
    Log { message: Option<String> },
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `svntrigger.toml` in current directory
/// 3. `.svntrigger.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./svntrigger.toml").exists() {
        fs::read_to_string("./svntrigger.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".svntrigger.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse one TOML configuration document
pub fn parse_config(source: &str) -> Result<Config> {
    toml::from_str(source).map_err(|err| SvnTriggerError::config(err.to_string()))
}
