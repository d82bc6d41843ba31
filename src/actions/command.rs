use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use tracing::debug;

use crate::captures::Captures;
use crate::error::{Result, SvnTriggerError};
use crate::paths::SearchPath;
use crate::revision::{Revision, TIMESTAMP_FORMAT};
use crate::template::substitute;

/// Runs a configured program when the rule fires.
///
/// Arguments undergo placeholder substitution, and the child process gets
/// the revision details as SVNTRIGGER_* environment variables. A program
/// name without a slash is located through the search path; anything with
/// a slash is taken as a path.
pub struct CommandAction {
    program: String,
    args: Vec<String>,
    search: Arc<SearchPath>,
}

impl CommandAction {
    pub fn new(program: impl Into<String>, args: Vec<String>, search: Arc<SearchPath>) -> Self {
        CommandAction {
            program: program.into(),
            args,
            search,
        }
    }

    /// Environment handed to the child, standing in for the empty
    /// environment hooks run with
    fn env_vars(revision: &Revision) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(
            "SVNTRIGGER_REVISION".to_string(),
            revision.number.to_string(),
        );
        env.insert("SVNTRIGGER_AUTHOR".to_string(), revision.author.clone());
        env.insert(
            "SVNTRIGGER_DATE".to_string(),
            revision.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        );
        env.insert("SVNTRIGGER_MESSAGE".to_string(), revision.message.clone());
        env.insert(
            "SVNTRIGGER_PROJECTS".to_string(),
            revision.projects().join("\n"),
        );
        env
    }

    pub fn run(&self, revision: &Revision, captures: &Captures) -> Result<()> {
        let program = if self.program.contains('/') {
            PathBuf::from(&self.program)
        } else {
            self.search.find(&self.program)?
        };
        debug!(program = %program.display(), "running command action");

        let mut cmd = Command::new(&program);
        for arg in &self.args {
            cmd.arg(substitute(arg, revision, captures));
        }
        for (key, value) in Self::env_vars(revision) {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|err| {
            SvnTriggerError::command(format!("failed to run {}: {}", program.display(), err))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvnTriggerError::command(format!(
                "{} exited with code {}: {}",
                program.display(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(())
    }
}
