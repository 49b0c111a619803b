use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    ConflictVersion, ResultStore, Version, VersionStatus, VersionedSpending,
    conflict::{REASON_DELETED, REASON_DIFF, conflicts_from},
};

use super::BudgetSpendingsStore;

impl BudgetSpendingsStore {
    /// Merge the authoritative spending list of a budget into the local
    /// chains and return the local versions that had to be given up.
    ///
    /// - remote only: a new chain holding the remote record as `InDb`;
    /// - local only: kept while [`VersionedSpending::awaits_read`] holds,
    ///   dropped otherwise with its pending versions reported;
    /// - both: if the remote token is in the chain, everything older is
    ///   discarded and that version becomes `InDb` (newer pending versions
    ///   stay on top). Otherwise the pending versions are reported and the
    ///   chain is replaced by the remote record.
    ///
    /// The merged collection is written once, sorted by id.
    pub fn store_spendings_from_remote(
        &self,
        budget_id: i64,
        remote: Vec<api_types::spending::Spending>,
    ) -> ResultStore<Vec<ConflictVersion>> {
        self.require_budget(budget_id)?;
        let now = self.clock.now();

        let mut local: BTreeMap<String, VersionedSpending> = self
            .load_chains(budget_id)?
            .into_iter()
            .map(|chain| (chain.id.clone(), chain))
            .collect();
        let mut merged = Vec::with_capacity(remote.len() + local.len());
        let mut conflicts = Vec::new();

        for record in remote {
            let Some(mut chain) = local.remove(&record.id) else {
                merged.push(VersionedSpending::from_remote(record, now));
                continue;
            };

            match chain.position(&Version::from(record.version.as_str())) {
                Some(idx) => {
                    chain.versions.drain(..idx);
                    let base = &mut chain.versions[0];
                    if base.status != VersionStatus::InDb {
                        base.set_status(VersionStatus::InDb, now);
                    }
                    merged.push(chain);
                }
                None => {
                    if let Some(start) = chain.first_pending() {
                        conflicts.extend(conflicts_from(
                            budget_id,
                            &chain,
                            start,
                            Some(REASON_DIFF),
                            now,
                        ));
                    }
                    merged.push(VersionedSpending::from_remote(record, now));
                }
            }
        }

        for chain in local.into_values() {
            if chain.awaits_read(now, self.read_lag) {
                merged.push(chain);
            } else if let Some(start) = chain.first_pending() {
                conflicts.extend(conflicts_from(
                    budget_id,
                    &chain,
                    start,
                    Some(REASON_DELETED),
                    now,
                ));
            }
        }

        merged.sort_by(|a, b| a.id.cmp(&b.id));
        self.save_chains(budget_id, &merged)?;

        info!(
            budget_id,
            spendings = merged.len(),
            conflicts = conflicts.len(),
            "spendings reconciled"
        );
        for conflict in &conflicts {
            warn!(
                budget_id,
                spending_id = %conflict.spending_id,
                version = %conflict.version,
                reason = conflict.reason.as_deref().unwrap_or_default(),
                "local version conflicted"
            );
        }
        Ok(conflicts)
    }
}
