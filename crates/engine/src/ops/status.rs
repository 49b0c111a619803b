use tracing::debug;

use crate::{
    ConflictVersion, ResultStore, Version, VersionStatus, conflict::conflicts_from,
};

use super::BudgetSpendingsStore;

impl BudgetSpendingsStore {
    /// Upload acknowledgement: a pending version becomes `Applied`.
    ///
    /// Missing budget, spending or version is not an error, and a version
    /// that is already `InDb` or `Applied` is left alone.
    pub fn set_status_applied(
        &self,
        budget_id: i64,
        spending_id: &str,
        version: &Version,
    ) -> ResultStore<()> {
        let mut chains = self.load_chains(budget_id)?;
        let Some(target) = chains
            .iter_mut()
            .find(|c| c.id == spending_id)
            .and_then(|c| c.versions.iter_mut().find(|v| &v.version == version))
        else {
            debug!(budget_id, spending_id, %version, "applied version not found");
            return Ok(());
        };
        if target.status != VersionStatus::Pending {
            return Ok(());
        }

        target.set_status(VersionStatus::Applied, self.clock.now());
        self.save_chains(budget_id, &chains)?;
        debug!(budget_id, spending_id, %version, "version applied");
        Ok(())
    }

    /// Unwind a version rejected by the server together with every version
    /// stacked on it. The removed versions are returned without a reason;
    /// the caller knows why the server refused them.
    ///
    /// Missing targets yield an empty list.
    pub fn revoke_conflict_version(
        &self,
        budget_id: i64,
        spending_id: &str,
        version: &Version,
    ) -> ResultStore<Vec<ConflictVersion>> {
        let mut chains = self.load_chains(budget_id)?;
        let Some(chain_idx) = chains.iter().position(|c| c.id == spending_id) else {
            return Ok(Vec::new());
        };
        let Some(idx) = chains[chain_idx].position(version) else {
            return Ok(Vec::new());
        };

        let conflicts = conflicts_from(budget_id, &chains[chain_idx], idx, None, self.clock.now());
        chains[chain_idx].versions.truncate(idx);
        if chains[chain_idx].versions.is_empty() {
            chains.remove(chain_idx);
        }

        self.save_chains(budget_id, &chains)?;
        debug!(budget_id, spending_id, %version, revoked = conflicts.len(), "version revoked");
        Ok(conflicts)
    }
}
