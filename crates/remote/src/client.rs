use std::time::Duration;

use api_types::{
    event::{BulkUpdate, BulkUpdateResponse, SpendingEvent},
    spending::BudgetsSpendings,
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

const FETCH_PATH: &str = "/budgets/spendings";
const BULK_PATH: &str = "/budgets/spendings/bulk";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

impl ApiClient {
    /// Client whose every request is aborted after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url.into()))
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Authoritative snapshot of every budget and its spendings.
    pub async fn fetch(&self) -> Result<BudgetsSpendings, ApiError> {
        let resp = self.client.get(self.url(FETCH_PATH)).send().await?;
        if resp.status().is_success() {
            return Ok(resp.json::<BudgetsSpendings>().await?);
        }
        Err(server_error(resp).await)
    }

    /// Submit a batch of change events.
    ///
    /// The server answers 200 when every event applied and 400 when some were
    /// rejected; both carry the per-event outcome.
    pub async fn bulk_update(
        &self,
        events: &[SpendingEvent],
    ) -> Result<BulkUpdateResponse, ApiError> {
        let body = BulkUpdate {
            updates: events.to_vec(),
        };
        let resp = self
            .client
            .post(self.url(BULK_PATH))
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK | StatusCode::BAD_REQUEST => {
                Ok(resp.json::<BulkUpdateResponse>().await?)
            }
            _ => Err(server_error(resp).await),
        }
    }
}

async fn server_error(resp: Response) -> ApiError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(err) => err.error,
        Err(_) => "server error".to_string(),
    };
    ApiError::Server { status, message }
}
