use serde::{Deserialize, Serialize};

/// Money as it travels on the wire: an integer amount of minor units plus
/// the number of fraction digits (`8500`, `2`, `RUB` is 85.00 RUB).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub fraction: u32,
    pub currency: String,
}

pub mod budget {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Budget {
        pub id: i64,
        pub alias: String,
        pub name: String,
        pub sort: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// Allowance for the whole budget period.
        pub money: Money,
        pub date_from: NaiveDate,
        pub date_to: NaiveDate,
        /// Free-form budget parameters (e.g. `{"perDay": true}`).
        #[serde(default)]
        pub params: serde_json::Value,
    }
}

pub mod spending {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::*;
    use crate::budget::Budget;

    /// A spending as reported by the server snapshot.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Spending {
        pub id: String,
        pub version: String,
        pub date: NaiveDate,
        pub description: String,
        pub money: Money,
        pub sort: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetSpendings {
        pub budget_id: i64,
        #[serde(default)]
        pub spendings: Vec<Spending>,
    }

    /// Response body of `GET /budgets/spendings`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetsSpendings {
        #[serde(default)]
        pub budgets: Vec<Budget>,
        #[serde(default, rename = "spendings")]
        pub spendings_by_budget: Vec<BudgetSpendings>,
    }
}

pub mod event {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::*;

    /// A single local change queued for `POST /budgets/spendings/bulk`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingEvent {
        pub event_id: String,
        /// When the change was made on the client (the spending `updatedAt`).
        pub date_time: DateTime<Utc>,
        pub budget_id: i64,
        pub spending_id: String,
        pub new_version: String,
        #[serde(flatten)]
        pub payload: EventPayload,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    pub enum EventPayload {
        Create {
            #[serde(rename = "createData")]
            create_data: CreateData,
        },
        Update {
            #[serde(rename = "updateData")]
            update_data: UpdateData,
        },
        Delete {
            #[serde(rename = "deleteData")]
            delete_data: DeleteData,
        },
    }

    impl EventPayload {
        pub fn kind(&self) -> &'static str {
            match self {
                Self::Create { .. } => "create",
                Self::Update { .. } => "update",
                Self::Delete { .. } => "delete",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CreateData {
        pub date: NaiveDate,
        pub sort: i64,
        pub money: Money,
        pub description: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateData {
        pub prev_version: String,
        pub date: NaiveDate,
        pub sort: i64,
        pub money: Money,
        pub description: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeleteData {
        pub prev_version: String,
    }

    /// Request body of `POST /budgets/spendings/bulk`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkUpdate {
        pub updates: Vec<SpendingEvent>,
    }

    /// Per-event outcome of a bulk update. Returned with status 200 when every
    /// event was applied and with status 400 when some were rejected.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct BulkUpdateResponse {
        #[serde(default)]
        pub success: Vec<String>,
        #[serde(default)]
        pub errors: Vec<EventError>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventError {
        pub event_id: String,
        /// Position of the event in the submitted batch.
        #[serde(default)]
        pub number: u32,
        pub error: String,
    }
}
