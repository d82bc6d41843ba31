//! Subversion repository access
//!
//! Everything a hook knows about a revision comes out of `svnlook`. The
//! [Repository] trait abstracts that boundary so the engine can be driven
//! from canned data in tests:
//!
//! - [repository::SvnRepository]: runs the real `svnlook` binary
//! - [mock::MockRepository]: serves canned output for testing
//!
//! ```rust
//! # use svn_trigger::svn::{MockRepository, Repository};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut repo = MockRepository::new();
//! repo.add_revision(
//!     4,
//!     "bram\n2010-07-05 17:00:00 +0200\n13\nFix the build\n",
//!     "/project1/trunk\n",
//! );
//! let revision = repo.revision("4")?;
//! assert_eq!(revision.author, "bram");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::SvnRepository;

use crate::error::Result;
use crate::revision::Revision;

/// Read access to one Subversion repository
///
/// Implementors must be `Send + Sync`. The two required methods return raw
/// `svnlook` output; [Repository::revision] combines them into a parsed
/// [Revision].
pub trait Repository: Send + Sync {
    /// Raw `svnlook info` output for one revision
    fn info(&self, revision: u64) -> Result<String>;

    /// Raw `svnlook dirs-changed` output for one revision
    fn dirs_changed(&self, revision: u64) -> Result<String>;

    /// Load and parse one revision from the number text handed to the hook
    fn revision(&self, number_text: &str) -> Result<Revision> {
        let number = Revision::parse_number(number_text)?;
        let info = self.info(number)?;
        let dirs_changed = self.dirs_changed(number)?;
        Revision::parse(number_text, &info, &dirs_changed)
    }
}
