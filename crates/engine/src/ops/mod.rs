use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    Budget, Clock, MemoryBackend, ResultStore, StorageBackend, StoreError, SystemClock,
    VersionedSpending,
    backend::{load_json, save_json},
};

mod budgets;
mod reconcile;
mod spendings;
mod status;

/// How long an applied version may stay invisible in server snapshots
/// before its absence counts as a deletion.
pub const READ_LAG_GRACE: Duration = Duration::from_secs(15);

pub(crate) const BUDGETS_KEY: &str = "budgets";

pub(crate) fn spendings_key(budget_id: i64) -> String {
    format!("spendings:{budget_id}")
}

/// Local store of budgets and of the per-budget spending chains.
///
/// Every operation is a synchronous read-modify-write of whole values in
/// the backend: budgets live under `budgets`, the chains of a budget under
/// `spendings:<id>` kept sorted by spending id.
pub struct BudgetSpendingsStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    read_lag: chrono::Duration,
}

impl fmt::Debug for BudgetSpendingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetSpendingsStore")
            .field("read_lag", &self.read_lag)
            .finish_non_exhaustive()
    }
}

impl BudgetSpendingsStore {
    /// Return a builder for `BudgetSpendingsStore`. Help to build the struct.
    pub fn builder() -> BudgetSpendingsStoreBuilder {
        BudgetSpendingsStoreBuilder::default()
    }

    pub fn backend(&self) -> Arc<dyn StorageBackend> {
        Arc::clone(&self.backend)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn load_budgets(&self) -> ResultStore<Vec<Budget>> {
        load_json(self.backend.as_ref(), BUDGETS_KEY)
    }

    fn require_budget(&self, budget_id: i64) -> ResultStore<()> {
        if self.load_budgets()?.iter().any(|b| b.id == budget_id) {
            Ok(())
        } else {
            Err(StoreError::UnknownBudget(budget_id))
        }
    }

    fn load_chains(&self, budget_id: i64) -> ResultStore<Vec<VersionedSpending>> {
        load_json(self.backend.as_ref(), &spendings_key(budget_id))
    }

    fn save_chains(&self, budget_id: i64, chains: &[VersionedSpending]) -> ResultStore<()> {
        save_json(self.backend.as_ref(), &spendings_key(budget_id), chains)
    }
}

/// The builder for `BudgetSpendingsStore`
#[derive(Default)]
pub struct BudgetSpendingsStoreBuilder {
    backend: Option<Arc<dyn StorageBackend>>,
    clock: Option<Arc<dyn Clock>>,
    read_lag: Option<Duration>,
}

impl BudgetSpendingsStoreBuilder {
    /// Pass the persistence backend. Defaults to a fresh [`MemoryBackend`].
    pub fn backend(mut self, backend: Arc<dyn StorageBackend>) -> BudgetSpendingsStoreBuilder {
        self.backend = Some(backend);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> BudgetSpendingsStoreBuilder {
        self.clock = Some(clock);
        self
    }

    /// Override [`READ_LAG_GRACE`].
    pub fn read_lag(mut self, read_lag: Duration) -> BudgetSpendingsStoreBuilder {
        self.read_lag = Some(read_lag);
        self
    }

    /// Construct `BudgetSpendingsStore`
    pub fn build(self) -> ResultStore<BudgetSpendingsStore> {
        let read_lag = chrono::Duration::from_std(self.read_lag.unwrap_or(READ_LAG_GRACE))
            .map_err(|err| StoreError::Backend(format!("read lag out of range: {err}")))?;

        Ok(BudgetSpendingsStore {
            backend: self
                .backend
                .unwrap_or_else(|| Arc::new(MemoryBackend::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            read_lag,
        })
    }
}
