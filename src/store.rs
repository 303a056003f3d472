//! Step store access
//!
//! Tool handlers depend on the [`StepStore`] trait so tests can substitute
//! in-memory fixtures. The concrete [`RestStepStore`] reads the `step_data`
//! table through a PostgREST-style endpoint with a service key.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::DailyStepRecord;
use crate::error::StoreError;

/// Read access to the daily step series.
#[async_trait]
pub trait StepStore: Send + Sync {
    /// Fetch all records with `start <= date <= end`, ascending by date.
    async fn fetch_step_records(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError>;
}

/// Raw row shape returned by the store. A null `step_count` is legal in the
/// table and normalizes to 0 here, so the engine only ever sees totals.
#[derive(Debug, Deserialize)]
struct StepRow {
    date: NaiveDate,
    step_count: Option<u64>,
}

impl From<StepRow> for DailyStepRecord {
    fn from(row: StepRow) -> Self {
        DailyStepRecord {
            date: row.date,
            step_count: row.step_count.unwrap_or(0),
        }
    }
}

/// PostgREST-backed step store.
pub struct RestStepStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestStepStore {
    /// Create a store client for the given REST base URL and service key.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        RestStepStore {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/step_data", self.base_url)
    }
}

#[async_trait]
impl StepStore for RestStepStore {
    async fn fetch_step_records(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError> {
        let gte = format!("gte.{start}");
        let lte = format!("lte.{end}");
        let query = [
            ("select", "date,step_count"),
            ("date", gte.as_str()),
            ("date", lte.as_str()),
            ("order", "date.asc"),
        ];

        let response = self
            .client
            .get(self.rows_url())
            .query(&query)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<StepRow> = response.json().await?;
        Ok(rows.into_iter().map(DailyStepRecord::from).collect())
    }
}
