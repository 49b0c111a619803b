use std::sync::Arc;

use api_types::event::SpendingEvent;
use engine::{Budget, BudgetSpendingsStore, DelSpending, Spending};
use tracing::debug;

use crate::{
    EventQueue, SyncError, SyncStatus,
    events::{create_event, delete_event, update_event},
};

/// Entry point for user edits: every change lands in the store first and is
/// queued for upload only once the store accepted it.
#[derive(Clone)]
pub struct Facade {
    store: Arc<BudgetSpendingsStore>,
    queue: EventQueue,
    status: SyncStatus,
}

impl Facade {
    pub fn new(store: Arc<BudgetSpendingsStore>, queue: EventQueue, status: SyncStatus) -> Self {
        Self {
            store,
            queue,
            status,
        }
    }

    pub fn budgets(&self) -> Result<Vec<Budget>, SyncError> {
        Ok(self.store.get_budgets()?)
    }

    pub fn spendings_by_budget_id(&self, budget_id: i64) -> Result<Vec<Spending>, SyncError> {
        Ok(self.store.spendings_by_budget_id(budget_id)?)
    }

    pub fn spendings_by_budget_ids(&self, budget_ids: &[i64]) -> Result<Vec<Spending>, SyncError> {
        Ok(self.store.spendings_by_budget_ids(budget_ids)?)
    }

    pub fn create_spending(&self, budget_id: i64, spending: &Spending) -> Result<(), SyncError> {
        self.store.create_spending(budget_id, spending)?;
        self.enqueue(create_event(budget_id, spending))
    }

    pub fn update_spending(&self, budget_id: i64, spending: &Spending) -> Result<(), SyncError> {
        self.store.update_spending(budget_id, spending)?;
        self.enqueue(update_event(budget_id, spending))
    }

    pub fn delete_spending(&self, budget_id: i64, del: &DelSpending) -> Result<(), SyncError> {
        self.store.delete_spending(budget_id, del)?;
        self.enqueue(delete_event(budget_id, del))
    }

    fn enqueue(&self, event: SpendingEvent) -> Result<(), SyncError> {
        debug!(
            event_id = %event.event_id,
            kind = event.payload.kind(),
            spending_id = %event.spending_id,
            "event queued"
        );
        let pending = self.queue.add(event)?;
        self.status.set_pending_events(pending);
        Ok(())
    }
}
