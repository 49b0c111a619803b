use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;

/// Last outcome of each sync direction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// `ok`, `Error <message>`, or empty before the first fetch.
    pub get_spendings: String,
    pub update_spendings: String,
    pub pending_events: usize,
}

/// Shared handle to the sync status. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct SyncStatus {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl SyncStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_get_spendings(&self, outcome: Result<(), &dyn fmt::Display>) {
        let text = describe(outcome);
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_spendings = text;
    }

    pub fn set_update_spendings(&self, outcome: Result<(), &dyn fmt::Display>) {
        let text = describe(outcome);
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update_spendings = text;
    }

    pub fn set_pending_events(&self, pending: usize) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending_events = pending;
    }
}

fn describe(outcome: Result<(), &dyn fmt::Display>) -> String {
    match outcome {
        Ok(()) => "ok".to_string(),
        Err(err) => format!("Error {err}"),
    }
}
