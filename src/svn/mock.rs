use std::collections::HashMap;

use crate::error::{Result, SvnTriggerError};
use crate::svn::Repository;

/// Mock repository serving canned `svnlook` output for tests
pub struct MockRepository {
    revisions: HashMap<u64, (String, String)>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            revisions: HashMap::new(),
        }
    }

    /// Add canned info and dirs-changed output for one revision
    pub fn add_revision(
        &mut self,
        number: u64,
        info: impl Into<String>,
        dirs_changed: impl Into<String>,
    ) {
        self.revisions
            .insert(number, (info.into(), dirs_changed.into()));
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn info(&self, revision: u64) -> Result<String> {
        self.revisions
            .get(&revision)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| SvnTriggerError::svn(format!("no such revision: {}", revision)))
    }

    fn dirs_changed(&self, revision: u64) -> Result<String> {
        self.revisions
            .get(&revision)
            .map(|(_, dirs)| dirs.clone())
            .ok_or_else(|| SvnTriggerError::svn(format!("no such revision: {}", revision)))
    }
}
