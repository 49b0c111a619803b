//! Offline store of budgets and spendings.
//!
//! Spendings are edited locally first and kept as version chains
//! ([`VersionedSpending`]) until the server confirms them. The
//! [`BudgetSpendingsStore`] checks edits against the chain head, merges
//! authoritative snapshots and reports the local versions that lost.

pub use backend::{FileBackend, MemoryBackend, StorageBackend, load_json, save_json};
pub use budget::Budget;
pub use clock::{Clock, SystemClock};
pub use conflict::{ConflictVersion, REASON_DELETED, REASON_DIFF};
pub use error::StoreError;
pub use money::Money;
pub use ops::{BudgetSpendingsStore, BudgetSpendingsStoreBuilder, READ_LAG_GRACE};
pub use spending::{
    DelSpending, Spending, SpendingData, SpendingVersion, VersionChange, VersionStatus,
    VersionedSpending,
};
pub use version::{Version, new_spending_id};

mod backend;
mod budget;
mod clock;
mod conflict;
mod error;
mod money;
mod ops;
mod spending;
mod version;

pub type ResultStore<T> = Result<T, StoreError>;
