//! The version-chain model.
//!
//! Every spending is stored as a [`VersionedSpending`]: the ordered list of
//! versions it went through on this client, oldest first. Only the last
//! element (the head) can be extended, and a head that is a deletion is
//! terminal. [`Spending`] is the public view derived from the head.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Money, Version};

/// Merged view of a spending, as handed to the UI.
///
/// `parent_version` is only meaningful as input: on update it must name the
/// head the caller edited. Views built from the store leave it empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spending {
    pub id: String,
    pub version: Version,
    pub parent_version: Option<Version>,
    pub date: NaiveDate,
    pub sort: i64,
    pub money: Money,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Spending {
    pub fn data(&self) -> SpendingData {
        SpendingData {
            date: self.date,
            sort: self.sort,
            money: self.money.clone(),
            description: self.description.clone(),
        }
    }
}

/// Deletion request: `version` is the token of the tombstone to append.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelSpending {
    pub id: String,
    pub version: Version,
    pub parent_version: Version,
    pub updated_at: DateTime<Utc>,
}

/// Editable part of a spending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingData {
    pub date: NaiveDate,
    pub sort: i64,
    pub money: Money,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Present in the last authoritative snapshot.
    InDb,
    /// Made on this client and not confirmed yet.
    Pending,
    /// Accepted by the server upload, possibly not readable there yet.
    Applied,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionChange {
    Upsert(SpendingData),
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendingVersion {
    pub version: Version,
    pub status: VersionStatus,
    /// When `status` was last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_at: Option<DateTime<Utc>>,
    pub change: VersionChange,
    pub updated_at: DateTime<Utc>,
}

impl SpendingVersion {
    pub fn pending(version: Version, change: VersionChange, updated_at: DateTime<Utc>) -> Self {
        Self {
            version,
            status: VersionStatus::Pending,
            status_at: None,
            change,
            updated_at,
        }
    }

    /// A deleted version ends the chain.
    pub fn is_terminal(&self) -> bool {
        matches!(self.change, VersionChange::Deleted)
    }

    pub fn data(&self) -> Option<&SpendingData> {
        match &self.change {
            VersionChange::Upsert(data) => Some(data),
            VersionChange::Deleted => None,
        }
    }

    /// `DD.MM: <amount> <currency> <description>`, `None` for a deletion.
    pub fn summary(&self) -> Option<String> {
        self.data().map(|data| {
            format!(
                "{}: {} {}",
                data.date.format("%d.%m"),
                data.money,
                data.description
            )
        })
    }

    pub(crate) fn set_status(&mut self, status: VersionStatus, at: DateTime<Utc>) {
        self.status = status;
        self.status_at = Some(at);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionedSpending {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Never empty while the chain is stored.
    pub versions: Vec<SpendingVersion>,
}

impl VersionedSpending {
    pub fn new(id: String, created_at: DateTime<Utc>, first: SpendingVersion) -> Self {
        Self {
            id,
            created_at,
            versions: vec![first],
        }
    }

    /// Single-version chain holding a server record, already confirmed.
    pub fn from_remote(remote: api_types::spending::Spending, now: DateTime<Utc>) -> Self {
        let version = SpendingVersion {
            version: Version::new(remote.version),
            status: VersionStatus::InDb,
            status_at: Some(now),
            change: VersionChange::Upsert(SpendingData {
                date: remote.date,
                sort: remote.sort,
                money: remote.money.into(),
                description: remote.description,
            }),
            updated_at: remote.updated_at,
        };
        Self::new(remote.id, remote.created_at, version)
    }

    pub fn head(&self) -> Option<&SpendingVersion> {
        self.versions.last()
    }

    pub fn position(&self, version: &Version) -> Option<usize> {
        self.versions.iter().position(|v| &v.version == version)
    }

    pub fn first_pending(&self) -> Option<usize> {
        self.versions
            .iter()
            .position(|v| v.status == VersionStatus::Pending)
    }

    /// Public view of the head, `None` when the head is a tombstone.
    pub fn to_spending(&self) -> Option<Spending> {
        let head = self.head()?;
        let data = head.data()?;
        Some(Spending {
            id: self.id.clone(),
            version: head.version.clone(),
            parent_version: None,
            date: data.date,
            sort: data.sort,
            money: data.money.clone(),
            description: data.description.clone(),
            created_at: self.created_at,
            updated_at: head.updated_at,
        })
    }

    /// Whether a chain missing from a server snapshot may simply not be
    /// readable there yet: its first version is still pending, or was
    /// applied less than `read_lag` ago.
    pub fn awaits_read(&self, now: DateTime<Utc>, read_lag: Duration) -> bool {
        let Some(first) = self.versions.first() else {
            return false;
        };
        match first.status {
            VersionStatus::Pending => true,
            VersionStatus::Applied => first
                .status_at
                .is_some_and(|at| now.signed_duration_since(at) < read_lag),
            VersionStatus::InDb => false,
        }
    }
}
