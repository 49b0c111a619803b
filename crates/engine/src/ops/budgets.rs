use std::collections::HashSet;

use tracing::{debug, info};

use crate::{Budget, ResultStore, backend::save_json};

use super::{BUDGETS_KEY, BudgetSpendingsStore, spendings_key};

impl BudgetSpendingsStore {
    /// Return the stored budgets, ascending by id.
    pub fn get_budgets(&self) -> ResultStore<Vec<Budget>> {
        self.load_budgets()
    }

    /// Replace the budget list with the authoritative one.
    ///
    /// A budget missing from `remote` loses its whole spending collection,
    /// pending edits included. If the id comes back later it starts empty.
    pub fn store_budgets_from_remote(&self, remote: Vec<Budget>) -> ResultStore<()> {
        let mut budgets = remote;
        budgets.sort_by_key(|b| b.id);

        let kept: HashSet<i64> = budgets.iter().map(|b| b.id).collect();
        for removed in self.load_budgets()?.iter().filter(|b| !kept.contains(&b.id)) {
            info!(budget_id = removed.id, "budget removed remotely, dropping its spendings");
            self.backend.delete(&spendings_key(removed.id))?;
        }

        save_json(self.backend.as_ref(), BUDGETS_KEY, &budgets)?;
        debug!(count = budgets.len(), "budgets stored");
        Ok(())
    }
}
