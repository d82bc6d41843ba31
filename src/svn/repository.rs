use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, SvnTriggerError};
use crate::paths::SearchPath;

/// Repository implementation backed by the `svnlook` binary
#[derive(Debug)]
pub struct SvnRepository {
    root: PathBuf,
    svnlook: PathBuf,
}

impl SvnRepository {
    /// Point at a repository on disk, locating `svnlook` through the
    /// search path
    pub fn open(root: impl AsRef<Path>, search: &SearchPath) -> Result<SvnRepository> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SvnTriggerError::svn(format!(
                "not a repository directory: {}",
                root.display()
            )));
        }
        let svnlook = search.find("svnlook")?;
        Ok(SvnRepository { root, svnlook })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn look(&self, subcommand: &str, revision: u64) -> Result<String> {
        debug!(subcommand, revision, "running svnlook");
        let output = Command::new(&self.svnlook)
            .arg(subcommand)
            .arg(&self.root)
            .arg("-r")
            .arg(revision.to_string())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvnTriggerError::svn(format!(
                "svnlook {} exited with {}: {}",
                subcommand,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl super::Repository for SvnRepository {
    fn info(&self, revision: u64) -> Result<String> {
        self.look("info", revision)
    }

    fn dirs_changed(&self, revision: u64) -> Result<String> {
        self.look("dirs-changed", revision)
    }
}
