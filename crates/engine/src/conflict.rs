//! Versions the client had to give up, in the shape handed to conflict
//! reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Version, VersionedSpending};

pub const REASON_DIFF: &str = "local and remote diff";
pub const REASON_DELETED: &str = "locally or remote deleted";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictVersion {
    pub version: Version,
    pub budget_id: i64,
    pub spending_id: String,
    /// `updated_at` of the conflicted version.
    pub version_dt: DateTime<Utc>,
    pub conflicted_at: DateTime<Utc>,
    /// Summary of the version right before the conflicted one.
    pub from: Option<String>,
    /// Summary of the conflicted version, `None` for a deletion.
    pub to: Option<String>,
    pub reason: Option<String>,
}

/// One conflict per version of `chain` from `start` to the end.
pub(crate) fn conflicts_from(
    budget_id: i64,
    chain: &VersionedSpending,
    start: usize,
    reason: Option<&str>,
    conflicted_at: DateTime<Utc>,
) -> Vec<ConflictVersion> {
    let versions = &chain.versions;
    (start..versions.len())
        .map(|idx| {
            let current = &versions[idx];
            let from = idx
                .checked_sub(1)
                .and_then(|prev| versions[prev].summary());
            ConflictVersion {
                version: current.version.clone(),
                budget_id,
                spending_id: chain.id.clone(),
                version_dt: current.updated_at,
                conflicted_at,
                from,
                to: current.summary(),
                reason: reason.map(ToString::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{Money, SpendingData, SpendingVersion, VersionChange};

    fn upsert(version: &str, amount: i64) -> SpendingVersion {
        SpendingVersion::pending(
            Version::from(version),
            VersionChange::Upsert(SpendingData {
                date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                sort: 1,
                money: Money::new(amount, 2, "RUB"),
                description: "кофе".to_string(),
            }),
            Utc.timestamp_opt(1_746_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn summaries_follow_the_chain() {
        let now = Utc.timestamp_opt(1_746_100_000, 0).unwrap();
        let mut chain = VersionedSpending::new(
            "sp1".to_string(),
            Utc.timestamp_opt(1_746_000_000, 0).unwrap(),
            upsert("ver_server_1", 85_00),
        );
        chain.versions.push(upsert("pending_2", 90_00));
        chain.versions.push(SpendingVersion::pending(
            Version::from("pending_3"),
            VersionChange::Deleted,
            now,
        ));

        let conflicts = conflicts_from(23, &chain, 1, Some(REASON_DIFF), now);
        assert_eq!(conflicts.len(), 2);

        assert_eq!(conflicts[0].version, Version::from("pending_2"));
        assert_eq!(conflicts[0].from.as_deref(), Some("01.05: 85 RUB кофе"));
        assert_eq!(conflicts[0].to.as_deref(), Some("01.05: 90 RUB кофе"));
        assert_eq!(conflicts[0].reason.as_deref(), Some(REASON_DIFF));
        assert_eq!(conflicts[0].budget_id, 23);

        assert_eq!(conflicts[1].from.as_deref(), Some("01.05: 90 RUB кофе"));
        assert_eq!(conflicts[1].to, None);
        assert_eq!(conflicts[1].conflicted_at, now);
    }

    #[test]
    fn first_version_has_no_from() {
        let now = Utc.timestamp_opt(1_746_100_000, 0).unwrap();
        let chain = VersionedSpending::new("sp1".to_string(), now, upsert("v1-aaaaa", 100));
        let conflicts = conflicts_from(1, &chain, 0, None, now);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].from, None);
        assert_eq!(conflicts[0].reason, None);

        let json = serde_json::to_value(&conflicts[0]).unwrap();
        assert_eq!(json["spendingId"], "sp1");
        assert!(json.get("versionDt").is_some());
    }
}
