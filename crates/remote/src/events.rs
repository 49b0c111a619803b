//! Upload events: the queue of local changes the server has not
//! acknowledged yet, and the list of changes it refused.

use std::{collections::HashSet, sync::Arc};

use api_types::event::{CreateData, DeleteData, EventPayload, SpendingEvent, UpdateData};
use engine::{DelSpending, ResultStore, Spending, StorageBackend};
use uuid::Uuid;

use crate::persisted::PersistedList;

pub const EVENTS_KEY: &str = "events";
pub const UPLOAD_ERRORS_KEY: &str = "upload_errors";

/// Events waiting for a bulk upload, oldest first.
#[derive(Clone)]
pub struct EventQueue {
    events: PersistedList<SpendingEvent>,
}

impl EventQueue {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            events: PersistedList::new(backend, EVENTS_KEY),
        }
    }

    /// Append an event; returns the queue length.
    pub fn add(&self, event: SpendingEvent) -> ResultStore<usize> {
        self.events.update(|events| events.push(event))
    }

    pub fn list(&self) -> ResultStore<Vec<SpendingEvent>> {
        self.events.list()
    }

    /// Drop the events with the given ids; returns the queue length.
    pub fn remove(&self, event_ids: &HashSet<String>) -> ResultStore<usize> {
        self.events
            .update(|events| events.retain(|e| !event_ids.contains(&e.event_id)))
    }

    pub fn len(&self) -> ResultStore<usize> {
        Ok(self.events.list()?.len())
    }
}

/// Events the server rejected, kept for inspection.
#[derive(Clone)]
pub struct UploadErrors {
    events: PersistedList<SpendingEvent>,
}

impl UploadErrors {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            events: PersistedList::new(backend, UPLOAD_ERRORS_KEY),
        }
    }

    pub fn add(&self, rejected: Vec<SpendingEvent>) -> ResultStore<usize> {
        self.events.update(|events| events.extend(rejected))
    }

    pub fn list(&self) -> ResultStore<Vec<SpendingEvent>> {
        self.events.list()
    }
}

pub fn create_event(budget_id: i64, spending: &Spending) -> SpendingEvent {
    SpendingEvent {
        event_id: Uuid::new_v4().to_string(),
        date_time: spending.updated_at,
        budget_id,
        spending_id: spending.id.clone(),
        new_version: spending.version.to_string(),
        payload: EventPayload::Create {
            create_data: CreateData {
                date: spending.date,
                sort: spending.sort,
                money: spending.money.clone().into(),
                description: spending.description.clone(),
            },
        },
    }
}

/// `spending.parent_version` must be set; the store refuses updates without it.
pub fn update_event(budget_id: i64, spending: &Spending) -> SpendingEvent {
    SpendingEvent {
        event_id: Uuid::new_v4().to_string(),
        date_time: spending.updated_at,
        budget_id,
        spending_id: spending.id.clone(),
        new_version: spending.version.to_string(),
        payload: EventPayload::Update {
            update_data: UpdateData {
                prev_version: spending
                    .parent_version
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                date: spending.date,
                sort: spending.sort,
                money: spending.money.clone().into(),
                description: spending.description.clone(),
            },
        },
    }
}

pub fn delete_event(budget_id: i64, del: &DelSpending) -> SpendingEvent {
    SpendingEvent {
        event_id: Uuid::new_v4().to_string(),
        date_time: del.updated_at,
        budget_id,
        spending_id: del.id.clone(),
        new_version: del.version.to_string(),
        payload: EventPayload::Delete {
            delete_data: DeleteData {
                prev_version: del.parent_version.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use engine::{MemoryBackend, Money, Version};

    use super::*;

    fn spending() -> Spending {
        let at = Utc.with_ymd_and_hms(2025, 10, 3, 12, 0, 0).unwrap();
        Spending {
            id: "sp1".to_string(),
            version: Version::from("v2-aaaaa"),
            parent_version: Some(Version::from("v1-bbbbb")),
            date: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
            sort: 7,
            money: Money::new(20_00, 2, "RUB"),
            description: "taxi".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn builders_fill_event_payloads() {
        let sp = spending();

        let created = create_event(4, &sp);
        assert_eq!(created.payload.kind(), "create");
        assert_eq!(created.new_version, "v2-aaaaa");
        assert_eq!(created.date_time, sp.updated_at);

        let updated = update_event(4, &sp);
        let EventPayload::Update { update_data } = &updated.payload else {
            panic!("expected update payload");
        };
        assert_eq!(update_data.prev_version, "v1-bbbbb");
        assert_ne!(created.event_id, updated.event_id);

        let deleted = delete_event(
            4,
            &DelSpending {
                id: "sp1".to_string(),
                version: Version::from("v3-ccccc"),
                parent_version: Version::from("v2-aaaaa"),
                updated_at: sp.updated_at,
            },
        );
        assert_eq!(deleted.payload.kind(), "delete");
        assert_eq!(deleted.spending_id, "sp1");
    }

    #[test]
    fn queue_keeps_order_and_removes_by_id() {
        let queue = EventQueue::new(Arc::new(MemoryBackend::new()));
        let first = create_event(1, &spending());
        let second = update_event(1, &spending());

        assert_eq!(queue.add(first.clone()).unwrap(), 1);
        assert_eq!(queue.add(second.clone()).unwrap(), 2);
        assert_eq!(queue.list().unwrap(), vec![first.clone(), second.clone()]);

        let done = HashSet::from([first.event_id.clone()]);
        assert_eq!(queue.remove(&done).unwrap(), 1);
        assert_eq!(queue.list().unwrap(), vec![second]);
    }
}
