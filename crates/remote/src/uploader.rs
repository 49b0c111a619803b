use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use api_types::event::{BulkUpdateResponse, SpendingEvent};
use engine::{BudgetSpendingsStore, StoreError, Version};
use tracing::{debug, info, warn};

use crate::{ApiClient, ConflictLog, EventQueue, SyncError, SyncStatus, UploadErrors};

/// Events of one flush, split by what the server said about them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadOutcome {
    pub success: Vec<SpendingEvent>,
    pub conflict: Vec<SpendingEvent>,
}

/// Sends queued events and feeds the answer back into the store.
#[derive(Clone)]
pub struct Uploader {
    client: ApiClient,
    store: Arc<BudgetSpendingsStore>,
    queue: EventQueue,
    upload_errors: UploadErrors,
    conflicts: ConflictLog,
    status: SyncStatus,
}

impl Uploader {
    pub fn new(
        client: ApiClient,
        store: Arc<BudgetSpendingsStore>,
        queue: EventQueue,
        upload_errors: UploadErrors,
        conflicts: ConflictLog,
        status: SyncStatus,
    ) -> Self {
        Self {
            client,
            store,
            queue,
            upload_errors,
            conflicts,
            status,
        }
    }

    pub fn pending(&self) -> Result<usize, SyncError> {
        Ok(self.queue.len()?)
    }

    /// Upload every queued event in one bulk call.
    ///
    /// - accepted: the version becomes `Applied` and the event leaves the
    ///   queue;
    /// - rejected: the version and everything stacked on it are revoked and
    ///   logged as conflicts carrying the server message, the event moves to
    ///   the upload errors;
    /// - transport or status failure: nothing leaves the queue.
    ///
    /// A store failure on one event keeps that event queued; the others are
    /// still handled and the first failure is returned.
    pub async fn flush(&self) -> Result<UploadOutcome, SyncError> {
        let events = self.queue.list()?;
        if events.is_empty() {
            self.status.set_pending_events(0);
            return Ok(UploadOutcome::default());
        }

        let response = match self.client.bulk_update(&events).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, queued = events.len(), "upload failed");
                self.status.set_update_spendings(Err(&err));
                return Err(err.into());
            }
        };

        match self.apply(&events, &response) {
            Ok(outcome) => {
                self.status.set_update_spendings(Ok(()));
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "upload response not applied");
                self.status.set_update_spendings(Err(&err));
                Err(err.into())
            }
        }
    }

    fn apply(
        &self,
        events: &[SpendingEvent],
        response: &BulkUpdateResponse,
    ) -> Result<UploadOutcome, StoreError> {
        let by_id: HashMap<&str, &SpendingEvent> =
            events.iter().map(|e| (e.event_id.as_str(), e)).collect();
        let mut done = HashSet::new();
        let mut revoked = HashSet::new();
        let mut logged = Vec::new();
        let mut failure = None;
        let mut outcome = UploadOutcome::default();

        for rejected in &response.errors {
            let Some(event) = by_id.get(rejected.event_id.as_str()) else {
                warn!(event_id = %rejected.event_id, "error for unknown event");
                continue;
            };
            warn!(
                event_id = %event.event_id,
                spending_id = %event.spending_id,
                version = %event.new_version,
                error = %rejected.error,
                "event rejected"
            );

            let conflicts = match self.store.revoke_conflict_version(
                event.budget_id,
                &event.spending_id,
                &Version::from(event.new_version.as_str()),
            ) {
                Ok(conflicts) => conflicts,
                Err(err) => {
                    warn!(event_id = %event.event_id, error = %err, "cannot revoke version");
                    failure = failure.or(Some(err));
                    continue;
                }
            };
            for mut conflict in conflicts {
                conflict.reason = Some(rejected.error.clone());
                revoked.insert((conflict.spending_id.clone(), conflict.version.to_string()));
                logged.push(conflict);
            }

            done.insert(event.event_id.clone());
            outcome.conflict.push((*event).clone());
        }

        for accepted in &response.success {
            let Some(event) = by_id.get(accepted.as_str()) else {
                warn!(event_id = %accepted, "success for unknown event");
                continue;
            };
            if done.contains(&event.event_id) {
                continue;
            }
            if let Err(err) = self.store.set_status_applied(
                event.budget_id,
                &event.spending_id,
                &Version::from(event.new_version.as_str()),
            ) {
                warn!(event_id = %event.event_id, error = %err, "cannot mark version applied");
                failure = failure.or(Some(err));
                continue;
            }
            done.insert(event.event_id.clone());
            outcome.success.push((*event).clone());
        }

        // queued edits stacked on a revoked version can no longer apply
        for event in events {
            if !done.contains(&event.event_id)
                && revoked.contains(&(event.spending_id.clone(), event.new_version.clone()))
            {
                debug!(event_id = %event.event_id, "dropping event of revoked version");
                done.insert(event.event_id.clone());
            }
        }

        // trim first so a failed side write never replays handled events
        let pending = self.queue.remove(&done)?;
        self.status.set_pending_events(pending);
        self.conflicts.add(logged)?;
        self.upload_errors.add(outcome.conflict.clone())?;
        info!(
            applied = outcome.success.len(),
            rejected = outcome.conflict.len(),
            pending,
            "events uploaded"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(outcome),
        }
    }
}
