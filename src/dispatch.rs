use tracing::debug;

use crate::error::Result;
use crate::registry::Registry;
use crate::revision::Revision;

/// Runs the registered rules against revisions
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Dispatcher {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every rule matching the revision, synchronously and in
    /// registration order. The first callback error aborts the run and
    /// propagates; the remaining matched rules do not fire. On success the
    /// number of matched rules is returned.
    pub fn dispatch(&self, revision: &Revision) -> Result<usize> {
        let matched = self.registry.matching(revision);
        debug!(
            revision = revision.number,
            matched = matched.len(),
            "dispatching revision"
        );
        for rule in &matched {
            rule.run(revision)?;
        }
        Ok(matched.len())
    }
}
