use tracing::debug;

use crate::{
    DelSpending, ResultStore, Spending, SpendingVersion, StoreError, Version, VersionChange,
    VersionedSpending,
};

use super::BudgetSpendingsStore;

impl BudgetSpendingsStore {
    /// Return the visible spendings of a budget, ascending by id.
    ///
    /// Chains whose head is a deletion are skipped.
    pub fn spendings_by_budget_id(&self, budget_id: i64) -> ResultStore<Vec<Spending>> {
        Ok(self
            .load_chains(budget_id)?
            .iter()
            .filter_map(VersionedSpending::to_spending)
            .collect())
    }

    /// Concatenation of [`Self::spendings_by_budget_id`] in the given order.
    pub fn spendings_by_budget_ids(&self, budget_ids: &[i64]) -> ResultStore<Vec<Spending>> {
        let mut out = Vec::new();
        for &budget_id in budget_ids {
            out.extend(self.spendings_by_budget_id(budget_id)?);
        }
        Ok(out)
    }

    /// Raw chains of a budget, statuses included.
    pub fn versioned_spendings(&self, budget_id: i64) -> ResultStore<Vec<VersionedSpending>> {
        self.load_chains(budget_id)
    }

    /// Start a new chain with a single pending version.
    pub fn create_spending(&self, budget_id: i64, spending: &Spending) -> ResultStore<()> {
        self.require_budget(budget_id)?;
        let mut chains = self.load_chains(budget_id)?;

        if chains.iter().any(|c| c.id == spending.id) {
            return Err(StoreError::AlreadyExists(spending.id.clone()));
        }

        let first = SpendingVersion::pending(
            spending.version.clone(),
            VersionChange::Upsert(spending.data()),
            spending.updated_at,
        );
        let idx = chains.partition_point(|c| c.id < spending.id);
        chains.insert(
            idx,
            VersionedSpending::new(spending.id.clone(), spending.created_at, first),
        );

        self.save_chains(budget_id, &chains)?;
        debug!(budget_id, spending_id = %spending.id, version = %spending.version, "spending created");
        Ok(())
    }

    /// Append a pending version on top of `spending.parent_version`.
    pub fn update_spending(&self, budget_id: i64, spending: &Spending) -> ResultStore<()> {
        self.require_budget(budget_id)?;
        let mut chains = self.load_chains(budget_id)?;

        let chain = chains
            .iter_mut()
            .find(|c| c.id == spending.id)
            .ok_or_else(|| StoreError::NotFound(spending.id.clone()))?;
        ensure_appendable(
            chain,
            spending.parent_version.as_ref(),
            StoreError::VersionConflict,
        )?;

        chain.versions.push(SpendingVersion::pending(
            spending.version.clone(),
            VersionChange::Upsert(spending.data()),
            spending.updated_at,
        ));

        self.save_chains(budget_id, &chains)?;
        debug!(budget_id, spending_id = %spending.id, version = %spending.version, "spending updated");
        Ok(())
    }

    /// Append a pending tombstone; the chain is immutable afterwards.
    pub fn delete_spending(&self, budget_id: i64, del: &DelSpending) -> ResultStore<()> {
        self.require_budget(budget_id)?;
        let mut chains = self.load_chains(budget_id)?;

        let chain = chains
            .iter_mut()
            .find(|c| c.id == del.id)
            .ok_or_else(|| StoreError::NotFound(del.id.clone()))?;
        ensure_appendable(
            chain,
            Some(&del.parent_version),
            StoreError::InvalidParent,
        )?;

        chain.versions.push(SpendingVersion::pending(
            del.version.clone(),
            VersionChange::Deleted,
            del.updated_at,
        ));

        self.save_chains(budget_id, &chains)?;
        debug!(budget_id, spending_id = %del.id, version = %del.version, "spending deleted");
        Ok(())
    }
}

/// Checks that a new version can be appended to `chain` as the child of
/// `parent`.
fn ensure_appendable(
    chain: &VersionedSpending,
    parent: Option<&Version>,
    stale_parent: fn(String) -> StoreError,
) -> ResultStore<()> {
    let head = chain
        .head()
        .ok_or_else(|| StoreError::NotFound(chain.id.clone()))?;
    if head.is_terminal() {
        return Err(StoreError::Immutable(chain.id.clone()));
    }
    if parent != Some(&head.version) {
        return Err(stale_parent(format!(
            "{}: head is {}, got {}",
            chain.id,
            head.version,
            parent.map_or("none", Version::as_str)
        )));
    }
    Ok(())
}
