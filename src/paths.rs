use std::path::{Path, PathBuf};

use crate::error::{Result, SvnTriggerError};

/// Directories scanned when no configuration says otherwise. Subversion
/// runs hooks with an empty environment, so programs cannot be found
/// through $PATH.
const DEFAULT_LOCATIONS: [&str; 3] = ["/opt/subversion/bin", "/usr/sbin", "/usr/bin"];

/// Ordered list of directories to search for executables
#[derive(Debug, Clone)]
pub struct SearchPath {
    locations: Vec<PathBuf>,
}

impl Default for SearchPath {
    fn default() -> SearchPath {
        SearchPath {
            locations: DEFAULT_LOCATIONS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SearchPath {
    pub fn new() -> SearchPath {
        SearchPath::default()
    }

    /// Default locations with extra directories prepended. The first
    /// entry of `dirs` gets the highest priority.
    pub fn with_preferred(dirs: &[String]) -> SearchPath {
        let mut search = SearchPath::default();
        for dir in dirs.iter().rev() {
            search.prepend(dir);
        }
        search
    }

    /// Add a directory in front of the existing locations
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) {
        self.locations.insert(0, dir.into());
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Full path of the first executable file named `program` in the
    /// search locations
    pub fn find(&self, program: &str) -> Result<PathBuf> {
        for location in &self.locations {
            let candidate = location.join(program);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
        Err(SvnTriggerError::ExecutableNotFound(program.to_string()))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_default_locations_in_order() {
        let search = SearchPath::new();
        let locations: Vec<_> = search
            .locations()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            locations,
            vec!["/opt/subversion/bin", "/usr/sbin", "/usr/bin"]
        );
    }

    #[test]
    fn test_prepend_takes_priority() {
        let mut search = SearchPath::new();
        search.prepend("/custom/bin");
        assert_eq!(search.locations()[0], PathBuf::from("/custom/bin"));
        assert_eq!(search.locations().len(), 4);
    }

    #[test]
    fn test_with_preferred_keeps_given_order() {
        let search =
            SearchPath::with_preferred(&["/first/bin".to_string(), "/second/bin".to_string()]);
        assert_eq!(search.locations()[0], PathBuf::from("/first/bin"));
        assert_eq!(search.locations()[1], PathBuf::from("/second/bin"));
        assert_eq!(search.locations()[2], PathBuf::from("/opt/subversion/bin"));
    }

    #[test]
    fn test_find_missing_program() {
        let search = SearchPath::new();
        let err = search.find("svn-trigger-no-such-program").unwrap_err();
        assert!(matches!(err, SvnTriggerError::ExecutableNotFound(_)));
        assert!(err.to_string().contains("svn-trigger-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_returns_first_hit() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = make_executable(first.path(), "svn-trigger-test-tool");
        make_executable(second.path(), "svn-trigger-test-tool");

        let search = SearchPath::with_preferred(&[
            first.path().display().to_string(),
            second.path().display().to_string(),
        ]);
        assert_eq!(search.find("svn-trigger-test-tool").unwrap(), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_skips_non_executable_files() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join("svn-trigger-test-tool"), "data").unwrap();
        let expected = make_executable(second.path(), "svn-trigger-test-tool");

        let search = SearchPath::with_preferred(&[
            first.path().display().to_string(),
            second.path().display().to_string(),
        ]);
        assert_eq!(search.find("svn-trigger-test-tool").unwrap(), expected);
    }
}
