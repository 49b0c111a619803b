//! Synchronisation of the local store with the budget server.
//!
//! [`Facade`] applies user edits to the store and queues upload events,
//! [`Uploader`] sends them and feeds acknowledgements and rejections back,
//! [`Fetcher`] merges authoritative snapshots. [`Syncer`] drives the last
//! two on timers.

use std::{sync::Arc, time::Duration};

use engine::{BudgetSpendingsStore, StoreError};
use tracing::{debug, info, warn};

pub use client::{ApiClient, ApiError};
pub use conflicts::{CONFLICTS_KEY, ConflictLog};
pub use events::{
    EVENTS_KEY, EventQueue, UPLOAD_ERRORS_KEY, UploadErrors, create_event, delete_event,
    update_event,
};
pub use facade::Facade;
pub use fetcher::{Fetcher, LAST_UPDATED_KEY};
pub use status::{StatusSnapshot, SyncStatus};
pub use uploader::{UploadOutcome, Uploader};

mod client;
mod conflicts;
mod events;
mod facade;
mod fetcher;
mod persisted;
mod status;
mod uploader;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Every sync component wired over one store and one client.
#[derive(Clone)]
pub struct Remote {
    pub facade: Facade,
    pub fetcher: Fetcher,
    pub uploader: Uploader,
    pub queue: EventQueue,
    pub conflicts: ConflictLog,
    pub upload_errors: UploadErrors,
    pub status: SyncStatus,
}

impl Remote {
    pub fn new(store: Arc<BudgetSpendingsStore>, client: ApiClient) -> Self {
        let backend = store.backend();
        let queue = EventQueue::new(Arc::clone(&backend));
        let conflicts = ConflictLog::new(Arc::clone(&backend));
        let upload_errors = UploadErrors::new(backend);
        let status = SyncStatus::new();

        Self {
            facade: Facade::new(Arc::clone(&store), queue.clone(), status.clone()),
            fetcher: Fetcher::new(
                client.clone(),
                Arc::clone(&store),
                conflicts.clone(),
                status.clone(),
            ),
            uploader: Uploader::new(
                client,
                store,
                queue.clone(),
                upload_errors.clone(),
                conflicts.clone(),
                status.clone(),
            ),
            queue,
            conflicts,
            upload_errors,
            status,
        }
    }

    pub fn syncer(&self) -> Syncer {
        Syncer::new(self.fetcher.clone(), self.uploader.clone())
    }
}

const MIN_TICK: Duration = Duration::from_millis(10);

pub struct Syncer {
    fetcher: Fetcher,
    uploader: Uploader,
}

impl Syncer {
    pub fn new(fetcher: Fetcher, uploader: Uploader) -> Self {
        Self { fetcher, uploader }
    }

    /// Fetch every `fetch_every` and upload queued events every
    /// `retry_every`, forever. Periods below 10 ms are raised to 10 ms.
    ///
    /// A store that never completed a fetch waits for the first one before
    /// entering the loop. Failures inside the loop are logged and retried on
    /// the next tick.
    pub async fn run(&self, fetch_every: Duration, retry_every: Duration) -> Result<(), SyncError> {
        // a zero period would panic inside tokio
        let mut fetch_tick = tokio::time::interval(fetch_every.max(MIN_TICK));
        let mut upload_tick = tokio::time::interval(retry_every.max(MIN_TICK));

        if !self.fetcher.is_initialized()? {
            info!("first fetch");
            fetch_tick.tick().await;
            if let Err(err) = self.fetcher.fetch_and_store().await {
                warn!(error = %err, "first fetch failed");
            }
        }

        loop {
            tokio::select! {
                _ = fetch_tick.tick() => {
                    // errors are logged and recorded in the status
                    let _ = self.fetcher.fetch_and_store().await;
                }
                _ = upload_tick.tick() => {
                    match self.uploader.pending() {
                        Ok(0) => {}
                        Ok(_) => {
                            if let Err(err) = self.uploader.flush().await {
                                debug!(error = %err, "upload retried on the next tick");
                            }
                        }
                        Err(err) => warn!(error = %err, "cannot read upload queue"),
                    }
                }
            }
        }
    }
}
