//! Budgets are owned by the server: the client stores the last authoritative
//! list as-is and never edits a single budget.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub alias: String,
    pub name: String,
    pub sort: i64,
    pub description: Option<String>,
    /// Allowance for the whole period.
    pub money: Money,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl From<api_types::budget::Budget> for Budget {
    fn from(value: api_types::budget::Budget) -> Self {
        Self {
            id: value.id,
            alias: value.alias,
            name: value.name,
            sort: value.sort,
            description: value.description,
            money: value.money.into(),
            date_from: value.date_from,
            date_to: value.date_to,
            params: value.params,
        }
    }
}
