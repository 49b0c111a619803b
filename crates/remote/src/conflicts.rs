use std::sync::Arc;

use engine::{ConflictVersion, ResultStore, StorageBackend, Version};

use crate::persisted::PersistedList;

pub const CONFLICTS_KEY: &str = "conflict_versions";

/// Conflicted versions waiting for the user to look at them.
#[derive(Clone)]
pub struct ConflictLog {
    conflicts: PersistedList<ConflictVersion>,
}

impl ConflictLog {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            conflicts: PersistedList::new(backend, CONFLICTS_KEY),
        }
    }

    pub fn add(&self, conflicts: Vec<ConflictVersion>) -> ResultStore<usize> {
        if conflicts.is_empty() {
            return Ok(self.conflicts.list()?.len());
        }
        self.conflicts.update(|log| log.extend(conflicts))
    }

    pub fn list(&self) -> ResultStore<Vec<ConflictVersion>> {
        self.conflicts.list()
    }

    /// Forget the first entry for `version`, if any.
    pub fn remove(&self, version: &Version) -> ResultStore<usize> {
        self.conflicts.update(|log| {
            if let Some(idx) = log.iter().position(|c| &c.version == version) {
                log.remove(idx);
            }
        })
    }

    pub fn clear(&self) -> ResultStore<()> {
        self.conflicts.update(Vec::clear)?;
        Ok(())
    }
}
