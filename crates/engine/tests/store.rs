use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use engine::{
    Budget, BudgetSpendingsStore, Clock, DelSpending, FileBackend, MemoryBackend, Money,
    REASON_DELETED, REASON_DIFF, Spending, StorageBackend, StoreError, Version, VersionStatus,
};

struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn budget(id: i64) -> Budget {
    Budget {
        id,
        alias: format!("b{id}"),
        name: format!("Budget {id}"),
        sort: id,
        description: None,
        money: Money::new(30_000_00, 2, "RUB"),
        date_from: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        date_to: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        params: serde_json::Value::Null,
    }
}

fn store_with_budgets(ids: &[i64]) -> (BudgetSpendingsStore, Arc<TestClock>) {
    let clock = TestClock::new();
    let store = BudgetSpendingsStore::builder()
        .backend(Arc::new(MemoryBackend::new()))
        .clock(clock.clone())
        .build()
        .unwrap();
    store
        .store_budgets_from_remote(ids.iter().copied().map(budget).collect())
        .unwrap();
    (store, clock)
}

fn coffee(id: &str, version: &str, amount: i64) -> Spending {
    let at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    Spending {
        id: id.to_string(),
        version: Version::from(version),
        parent_version: None,
        date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        sort: 101,
        money: Money::new(amount, 2, "RUB"),
        description: "кофе".to_string(),
        created_at: at,
        updated_at: at,
    }
}

fn edit(base: &Spending, parent: &str, version: &str, amount: i64) -> Spending {
    Spending {
        version: Version::from(version),
        parent_version: Some(Version::from(parent)),
        money: Money::new(amount, 2, "RUB"),
        updated_at: base.updated_at + Duration::minutes(1),
        ..base.clone()
    }
}

fn removal(id: &str, parent: &str, version: &str) -> DelSpending {
    DelSpending {
        id: id.to_string(),
        version: Version::from(version),
        parent_version: Version::from(parent),
        updated_at: Utc.with_ymd_and_hms(2025, 5, 1, 11, 0, 0).unwrap(),
    }
}

fn remote(id: &str, version: &str, amount: i64) -> api_types::spending::Spending {
    let at = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
    api_types::spending::Spending {
        id: id.to_string(),
        version: version.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        description: "кофе".to_string(),
        money: api_types::Money {
            amount,
            fraction: 2,
            currency: "RUB".to_string(),
        },
        sort: 101,
        created_at: at,
        updated_at: at,
    }
}

fn statuses(store: &BudgetSpendingsStore, bid: i64, id: &str) -> Vec<(String, VersionStatus)> {
    store
        .versioned_spendings(bid)
        .unwrap()
        .into_iter()
        .find(|c| c.id == id)
        .map(|c| {
            c.versions
                .into_iter()
                .map(|v| (v.version.to_string(), v.status))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn created_spending_is_listed_as_pending() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1-aaaaa", 85_00);

    store.create_spending(23, &sp).unwrap();

    assert_eq!(store.spendings_by_budget_id(23).unwrap(), vec![sp]);
    assert_eq!(
        statuses(&store, 23, "sp1"),
        vec![("v1-aaaaa".to_string(), VersionStatus::Pending)]
    );
}

#[test]
fn create_checks_budget_and_id() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1-aaaaa", 85_00);

    assert_eq!(
        store.create_spending(7, &sp).unwrap_err(),
        StoreError::UnknownBudget(7)
    );
    store.create_spending(23, &sp).unwrap();
    assert_eq!(
        store.create_spending(23, &sp).unwrap_err(),
        StoreError::AlreadyExists("sp1".to_string())
    );
}

#[test]
fn chains_stay_sorted_by_id() {
    let (store, _) = store_with_budgets(&[1, 2]);
    for id in ["c", "a", "b"] {
        store.create_spending(1, &coffee(id, "v1-aaaaa", 1)).unwrap();
    }
    store.create_spending(2, &coffee("z", "v1-bbbbb", 1)).unwrap();

    let ids: Vec<String> = store
        .spendings_by_budget_id(1)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    let ids: Vec<String> = store
        .spendings_by_budget_ids(&[2, 1])
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, ["z", "a", "b", "c"]);

    assert!(store.spendings_by_budget_id(99).unwrap().is_empty());
}

#[test]
fn update_requires_current_head_as_parent() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1-aaaaa", 85_00);
    store.create_spending(23, &sp).unwrap();

    let stale = edit(&sp, "v0-zzzzz", "v2-bbbbb", 90_00);
    assert!(matches!(
        store.update_spending(23, &stale),
        Err(StoreError::VersionConflict(_))
    ));
    let orphan = Spending {
        parent_version: None,
        ..edit(&sp, "v1-aaaaa", "v2-bbbbb", 90_00)
    };
    assert!(matches!(
        store.update_spending(23, &orphan),
        Err(StoreError::VersionConflict(_))
    ));
    // rejected edits leave the chain untouched
    assert_eq!(statuses(&store, 23, "sp1").len(), 1);

    let next = edit(&sp, "v1-aaaaa", "v2-bbbbb", 90_00);
    store.update_spending(23, &next).unwrap();

    let listed = store.spendings_by_budget_id(23).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].version, Version::from("v2-bbbbb"));
    assert_eq!(listed[0].money, Money::new(90_00, 2, "RUB"));
    assert_eq!(listed[0].created_at, sp.created_at);
    assert_eq!(listed[0].parent_version, None);

    // v1 is no longer the head
    let again = edit(&sp, "v1-aaaaa", "v3-ccccc", 95_00);
    assert!(matches!(
        store.update_spending(23, &again),
        Err(StoreError::VersionConflict(_))
    ));
}

#[test]
fn head_parent_is_the_only_append_condition() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1", 85_00);
    store.create_spending(23, &sp).unwrap();
    store.update_spending(23, &edit(&sp, "v1", "v2", 90_00)).unwrap();

    // a token seen earlier in the chain is accepted on top of the head
    store.update_spending(23, &edit(&sp, "v2", "v1", 95_00)).unwrap();
    store
        .delete_spending(23, &removal("sp1", "v1", "v2"))
        .unwrap();

    let versions: Vec<String> = statuses(&store, 23, "sp1")
        .into_iter()
        .map(|(version, _)| version)
        .collect();
    assert_eq!(versions, ["v1", "v2", "v1", "v2"]);
    assert!(store.spendings_by_budget_id(23).unwrap().is_empty());
}

#[test]
fn update_and_delete_of_missing_spending() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1-aaaaa", 85_00);

    assert_eq!(
        store
            .update_spending(23, &edit(&sp, "v1-aaaaa", "v2-bbbbb", 1))
            .unwrap_err(),
        StoreError::NotFound("sp1".to_string())
    );
    assert_eq!(
        store
            .delete_spending(23, &removal("sp1", "v1-aaaaa", "v2-bbbbb"))
            .unwrap_err(),
        StoreError::NotFound("sp1".to_string())
    );
    assert_eq!(
        store
            .delete_spending(5, &removal("sp1", "v1-aaaaa", "v2-bbbbb"))
            .unwrap_err(),
        StoreError::UnknownBudget(5)
    );
}

#[test]
fn delete_with_stale_parent_is_rejected() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .create_spending(23, &coffee("sp1", "v1-aaaaa", 85_00))
        .unwrap();

    assert!(matches!(
        store.delete_spending(23, &removal("sp1", "nope", "v2-bbbbb")),
        Err(StoreError::InvalidParent(_))
    ));
    assert_eq!(store.spendings_by_budget_id(23).unwrap().len(), 1);
}

#[test]
fn deleted_chain_is_terminal() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1-aaaaa", 85_00);
    store.create_spending(23, &sp).unwrap();
    store
        .delete_spending(23, &removal("sp1", "v1-aaaaa", "v2-bbbbb"))
        .unwrap();

    assert!(store.spendings_by_budget_id(23).unwrap().is_empty());

    for parent in ["v2-bbbbb", "v1-aaaaa", "other"] {
        assert_eq!(
            store
                .update_spending(23, &edit(&sp, parent, "v3-ccccc", 1))
                .unwrap_err(),
            StoreError::Immutable("sp1".to_string())
        );
        assert_eq!(
            store
                .delete_spending(23, &removal("sp1", parent, "v3-ccccc"))
                .unwrap_err(),
            StoreError::Immutable("sp1".to_string())
        );
    }
    assert_eq!(statuses(&store, 23, "sp1").len(), 2);
}

#[test]
fn removed_budget_drops_its_spendings_for_good() {
    let (store, _) = store_with_budgets(&[3, 1, 2]);
    let ids: Vec<i64> = store.get_budgets().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, [1, 2, 3]);

    store.create_spending(2, &coffee("sp1", "v1-aaaaa", 1)).unwrap();
    store.create_spending(3, &coffee("sp2", "v1-aaaaa", 1)).unwrap();

    store
        .store_budgets_from_remote(vec![budget(1), budget(3)])
        .unwrap();
    assert!(store.spendings_by_budget_id(2).unwrap().is_empty());
    assert_eq!(store.spendings_by_budget_id(3).unwrap().len(), 1);
    assert_eq!(
        store.create_spending(2, &coffee("sp3", "v1-aaaaa", 1)).unwrap_err(),
        StoreError::UnknownBudget(2)
    );

    store
        .store_budgets_from_remote(vec![budget(2), budget(1), budget(3)])
        .unwrap();
    assert!(store.spendings_by_budget_id(2).unwrap().is_empty());
}

#[test]
fn remote_only_spendings_arrive_in_db() {
    let (store, _) = store_with_budgets(&[23]);

    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("b", "ver_1", 10_00), remote("a", "ver_2", 20_00)])
        .unwrap();
    assert!(conflicts.is_empty());

    let listed = store.spendings_by_budget_id(23).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "a");
    assert_eq!(listed[0].money, Money::new(20_00, 2, "RUB"));
    assert_eq!(
        statuses(&store, 23, "b"),
        vec![("ver_1".to_string(), VersionStatus::InDb)]
    );
}

#[test]
fn reconcile_requires_known_budget() {
    let (store, _) = store_with_budgets(&[23]);
    assert_eq!(
        store.store_spendings_from_remote(24, vec![]).unwrap_err(),
        StoreError::UnknownBudget(24)
    );
}

#[test]
fn remote_confirming_known_version_is_not_a_conflict() {
    let (store, _) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1", 85_00);
    store.create_spending(23, &sp).unwrap();
    store
        .update_spending(23, &edit(&sp, "v1", "v2", 90_00))
        .unwrap();

    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("sp1", "v1", 85_00)])
        .unwrap();

    assert!(conflicts.is_empty());
    assert_eq!(
        statuses(&store, 23, "sp1"),
        vec![
            ("v1".to_string(), VersionStatus::InDb),
            ("v2".to_string(), VersionStatus::Pending),
        ]
    );
}

#[test]
fn remote_confirmation_drops_older_history() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(23, vec![remote("sp1", "v1", 85_00)])
        .unwrap();
    let sp = coffee("sp1", "v1", 85_00);
    store
        .update_spending(23, &edit(&sp, "v1", "v2", 90_00))
        .unwrap();
    store
        .update_spending(23, &edit(&sp, "v2", "v3", 95_00))
        .unwrap();
    store
        .set_status_applied(23, "sp1", &Version::from("v2"))
        .unwrap();

    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("sp1", "v2", 90_00)])
        .unwrap();

    assert!(conflicts.is_empty());
    assert_eq!(
        statuses(&store, 23, "sp1"),
        vec![
            ("v2".to_string(), VersionStatus::InDb),
            ("v3".to_string(), VersionStatus::Pending),
        ]
    );
}

#[test]
fn diverged_remote_replaces_chain_and_reports_pending() {
    let (store, clock) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(23, vec![remote("sp1", "v1", 85_00)])
        .unwrap();
    let sp = coffee("sp1", "v1", 85_00);
    store
        .update_spending(23, &edit(&sp, "v1", "v2", 90_00))
        .unwrap();
    store
        .update_spending(23, &edit(&sp, "v2", "v3", 95_00))
        .unwrap();
    clock.advance(Duration::minutes(5));

    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("sp1", "v4", 70_00)])
        .unwrap();

    let versions: Vec<&str> = conflicts.iter().map(|c| c.version.as_str()).collect();
    assert_eq!(versions, ["v2", "v3"]);
    assert!(
        conflicts
            .iter()
            .all(|c| c.reason.as_deref() == Some(REASON_DIFF) && c.budget_id == 23)
    );
    assert_eq!(conflicts[0].conflicted_at, clock.now());
    assert_eq!(
        statuses(&store, 23, "sp1"),
        vec![("v4".to_string(), VersionStatus::InDb)]
    );
    assert_eq!(
        store.spendings_by_budget_id(23).unwrap()[0].money,
        Money::new(70_00, 2, "RUB")
    );
}

#[test]
fn coffee_price_change_scenario() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(23, vec![remote("sp1", "ver_server_1", 85_00)])
        .unwrap();
    let base = coffee("sp1", "ver_server_1", 85_00);
    store
        .update_spending(23, &edit(&base, "ver_server_1", "pending_2", 90_00))
        .unwrap();

    // unchanged on the server: the local edit survives
    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("sp1", "ver_server_1", 85_00)])
        .unwrap();
    assert!(conflicts.is_empty());
    assert_eq!(
        store.spendings_by_budget_id(23).unwrap()[0].version,
        Version::from("pending_2")
    );

    // changed elsewhere: the local edit is lost
    let conflicts = store
        .store_spendings_from_remote(23, vec![remote("sp1", "ver_server_3", 85_00)])
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    let conflict = &conflicts[0];
    assert_eq!(conflict.version, Version::from("pending_2"));
    assert_eq!(conflict.spending_id, "sp1");
    assert_eq!(conflict.from.as_deref(), Some("01.05: 85 RUB кофе"));
    assert_eq!(conflict.to.as_deref(), Some("01.05: 90 RUB кофе"));
    assert_eq!(conflict.reason.as_deref(), Some(REASON_DIFF));
    assert_eq!(
        conflict.version_dt,
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 1, 0).unwrap()
    );
}

#[test]
fn local_only_pending_chain_survives_snapshot() {
    let (store, clock) = store_with_budgets(&[23]);
    store
        .create_spending(23, &coffee("sp1", "v1", 85_00))
        .unwrap();
    clock.advance(Duration::hours(1));

    let conflicts = store.store_spendings_from_remote(23, vec![]).unwrap();
    assert!(conflicts.is_empty());
    assert_eq!(store.spendings_by_budget_id(23).unwrap().len(), 1);
}

#[test]
fn applied_chain_survives_only_within_read_lag() {
    let (store, clock) = store_with_budgets(&[23]);
    let sp = coffee("sp1", "v1", 85_00);
    store.create_spending(23, &sp).unwrap();
    store
        .set_status_applied(23, "sp1", &Version::from("v1"))
        .unwrap();
    store
        .update_spending(23, &edit(&sp, "v1", "v2", 90_00))
        .unwrap();

    clock.advance(Duration::seconds(14));
    assert!(store.store_spendings_from_remote(23, vec![]).unwrap().is_empty());
    assert_eq!(statuses(&store, 23, "sp1").len(), 2);

    clock.advance(Duration::seconds(2));
    let conflicts = store.store_spendings_from_remote(23, vec![]).unwrap();
    assert!(store.versioned_spendings(23).unwrap().is_empty());
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].version, Version::from("v2"));
    assert_eq!(conflicts[0].reason.as_deref(), Some(REASON_DELETED));
    assert_eq!(conflicts[0].from.as_deref(), Some("01.05: 85 RUB кофе"));
}

#[test]
fn in_db_chain_missing_remotely_is_dropped() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(
            23,
            vec![remote("sp1", "v1", 85_00), remote("sp2", "w1", 10_00)],
        )
        .unwrap();
    store
        .update_spending(23, &edit(&coffee("sp2", "w1", 10_00), "w1", "w2", 12_00))
        .unwrap();

    let conflicts = store.store_spendings_from_remote(23, vec![]).unwrap();

    assert!(store.versioned_spendings(23).unwrap().is_empty());
    let reported: Vec<(&str, &str)> = conflicts
        .iter()
        .map(|c| (c.spending_id.as_str(), c.version.as_str()))
        .collect();
    assert_eq!(reported, [("sp2", "w2")]);
}

#[test]
fn read_lag_can_be_configured() {
    let clock = TestClock::new();
    let store = BudgetSpendingsStore::builder()
        .clock(clock.clone())
        .read_lag(StdDuration::from_secs(60))
        .build()
        .unwrap();
    store.store_budgets_from_remote(vec![budget(1)]).unwrap();
    store.create_spending(1, &coffee("sp1", "v1", 1)).unwrap();
    store
        .set_status_applied(1, "sp1", &Version::from("v1"))
        .unwrap();

    clock.advance(Duration::seconds(30));
    store.store_spendings_from_remote(1, vec![]).unwrap();
    assert_eq!(store.spendings_by_budget_id(1).unwrap().len(), 1);

    clock.advance(Duration::seconds(31));
    store.store_spendings_from_remote(1, vec![]).unwrap();
    assert!(store.spendings_by_budget_id(1).unwrap().is_empty());
}

#[test]
fn set_status_applied_only_moves_pending() {
    let (store, clock) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(23, vec![remote("sp1", "v1", 85_00)])
        .unwrap();
    store
        .update_spending(23, &edit(&coffee("sp1", "v1", 85_00), "v1", "v2", 90_00))
        .unwrap();
    clock.advance(Duration::seconds(3));

    store
        .set_status_applied(23, "sp1", &Version::from("v1"))
        .unwrap();
    store
        .set_status_applied(23, "sp1", &Version::from("v2"))
        .unwrap();

    let chain = store.versioned_spendings(23).unwrap().remove(0);
    assert_eq!(chain.versions[0].status, VersionStatus::InDb);
    assert_eq!(chain.versions[1].status, VersionStatus::Applied);
    assert_eq!(chain.versions[1].status_at, Some(clock.now()));

    // a repeated acknowledgement keeps the first stamp
    let applied_at = clock.now();
    clock.advance(Duration::seconds(5));
    store
        .set_status_applied(23, "sp1", &Version::from("v2"))
        .unwrap();
    let chain = store.versioned_spendings(23).unwrap().remove(0);
    assert_eq!(chain.versions[1].status_at, Some(applied_at));

    // missing targets are fine
    store
        .set_status_applied(23, "sp1", &Version::from("v9"))
        .unwrap();
    store
        .set_status_applied(23, "nope", &Version::from("v1"))
        .unwrap();
    store
        .set_status_applied(404, "sp1", &Version::from("v1"))
        .unwrap();
}

#[test]
fn revoke_unwinds_version_and_successors() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .store_spendings_from_remote(23, vec![remote("sp1", "v1", 85_00)])
        .unwrap();
    let sp = coffee("sp1", "v1", 85_00);
    store
        .update_spending(23, &edit(&sp, "v1", "v2", 90_00))
        .unwrap();
    store
        .delete_spending(23, &removal("sp1", "v2", "v3"))
        .unwrap();

    let revoked = store
        .revoke_conflict_version(23, "sp1", &Version::from("v2"))
        .unwrap();

    let versions: Vec<&str> = revoked.iter().map(|c| c.version.as_str()).collect();
    assert_eq!(versions, ["v2", "v3"]);
    assert!(revoked.iter().all(|c| c.reason.is_none()));
    assert_eq!(revoked[0].from.as_deref(), Some("01.05: 85 RUB кофе"));
    assert_eq!(revoked[1].to, None);

    let listed = store.spendings_by_budget_id(23).unwrap();
    assert_eq!(listed[0].version, Version::from("v1"));

    let again = store
        .revoke_conflict_version(23, "sp1", &Version::from("v2"))
        .unwrap();
    assert!(again.is_empty());
}

#[test]
fn revoking_first_version_removes_chain() {
    let (store, _) = store_with_budgets(&[23]);
    store
        .create_spending(23, &coffee("sp1", "v1", 85_00))
        .unwrap();

    let revoked = store
        .revoke_conflict_version(23, "sp1", &Version::from("v1"))
        .unwrap();
    assert_eq!(revoked.len(), 1);
    assert_eq!(revoked[0].from, None);
    assert!(store.versioned_spendings(23).unwrap().is_empty());

    assert!(
        store
            .revoke_conflict_version(23, "sp1", &Version::from("v1"))
            .unwrap()
            .is_empty()
    );
    assert!(
        store
            .revoke_conflict_version(99, "sp1", &Version::from("v1"))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn corrupted_values_are_reported() {
    let backend = MemoryBackend::new();
    let store = BudgetSpendingsStore::builder()
        .backend(Arc::new(backend.clone()))
        .build()
        .unwrap();
    store.store_budgets_from_remote(vec![budget(1)]).unwrap();

    backend.set("spendings:1", "{not json").unwrap();
    assert!(matches!(
        store.spendings_by_budget_id(1),
        Err(StoreError::Corrupted { .. })
    ));

    backend.set("budgets", "[{}]").unwrap();
    assert_eq!(
        store.get_budgets().unwrap_err(),
        StoreError::Corrupted {
            key: "budgets".to_string(),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        }
    );
}

#[test]
fn file_backed_store_survives_restart() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_stores")
        .join(Uuid::new_v4().to_string());

    {
        let store = BudgetSpendingsStore::builder()
            .backend(Arc::new(FileBackend::new(&root)))
            .build()
            .unwrap();
        store.store_budgets_from_remote(vec![budget(23)]).unwrap();
        store
            .create_spending(23, &coffee("sp1", "v1-aaaaa", 85_00))
            .unwrap();
    }

    let store = BudgetSpendingsStore::builder()
        .backend(Arc::new(FileBackend::new(&root)))
        .build()
        .unwrap();
    assert_eq!(store.get_budgets().unwrap(), vec![budget(23)]);
    assert_eq!(
        store.spendings_by_budget_id(23).unwrap(),
        vec![coffee("sp1", "v1-aaaaa", 85_00)]
    );

    let _ = std::fs::remove_dir_all(root);
}
