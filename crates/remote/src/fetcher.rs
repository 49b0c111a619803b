use std::{collections::HashSet, sync::Arc};

use engine::{Budget, BudgetSpendingsStore, ConflictVersion, load_json, save_json};
use tracing::{info, warn};

use crate::{ApiClient, ConflictLog, SyncError, SyncStatus};

pub const LAST_UPDATED_KEY: &str = "fetcher:last_updated_at";

/// Pulls the authoritative snapshot and merges it into the store.
#[derive(Clone)]
pub struct Fetcher {
    client: ApiClient,
    store: Arc<BudgetSpendingsStore>,
    conflicts: ConflictLog,
    status: SyncStatus,
}

impl Fetcher {
    pub fn new(
        client: ApiClient,
        store: Arc<BudgetSpendingsStore>,
        conflicts: ConflictLog,
        status: SyncStatus,
    ) -> Self {
        Self {
            client,
            store,
            conflicts,
            status,
        }
    }

    /// Fetch once, store budgets and spendings, log the conflicts found.
    pub async fn fetch_and_store(&self) -> Result<Vec<ConflictVersion>, SyncError> {
        let result = self.try_fetch_and_store().await;
        match &result {
            Ok(conflicts) => {
                self.status.set_get_spendings(Ok(()));
                info!(conflicts = conflicts.len(), "snapshot stored");
            }
            Err(err) => {
                warn!(error = %err, "fetch failed");
                self.status.set_get_spendings(Err(err));
            }
        }
        result
    }

    async fn try_fetch_and_store(&self) -> Result<Vec<ConflictVersion>, SyncError> {
        let snapshot = self.client.fetch().await?;

        let known: HashSet<i64> = snapshot.budgets.iter().map(|b| b.id).collect();
        self.store
            .store_budgets_from_remote(snapshot.budgets.into_iter().map(Budget::from).collect())?;

        let mut all = Vec::new();
        for block in snapshot.spendings_by_budget {
            if !known.contains(&block.budget_id) {
                warn!(budget_id = block.budget_id, "spendings for unknown budget skipped");
                continue;
            }
            let conflicts = self
                .store
                .store_spendings_from_remote(block.budget_id, block.spendings)?;
            self.conflicts.add(conflicts.clone())?;
            all.extend(conflicts);
        }

        let stamp = self.store.now().timestamp_millis();
        save_json(self.store.backend().as_ref(), LAST_UPDATED_KEY, &stamp)?;
        Ok(all)
    }

    /// Unix millis of the last successful fetch, 0 if none.
    pub fn last_updated_at(&self) -> Result<i64, SyncError> {
        Ok(load_json(self.store.backend().as_ref(), LAST_UPDATED_KEY)?)
    }

    pub fn is_initialized(&self) -> Result<bool, SyncError> {
        Ok(self.last_updated_at()? != 0)
    }
}
