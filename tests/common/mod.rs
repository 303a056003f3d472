//! Shared test fixtures: in-memory step store fakes.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use stepstats_mcp::analytics::DailyStepRecord;
use stepstats_mcp::error::StoreError;
use stepstats_mcp::store::StepStore;

/// Build one record from an ISO date and a count.
pub fn record(date: &str, steps: u64) -> DailyStepRecord {
    DailyStepRecord {
        date: date.parse().unwrap(),
        step_count: steps,
    }
}

/// The documented Mon/Tue/Wed scenario.
pub fn three_day_records() -> Vec<DailyStepRecord> {
    vec![
        record("2024-01-01", 1000),
        record("2024-01-02", 5000),
        record("2024-01-03", 3000),
    ]
}

/// Store fake returning a fixed record set regardless of range.
pub struct FixtureStore {
    pub records: Vec<DailyStepRecord>,
}

impl FixtureStore {
    pub fn three_days() -> Self {
        FixtureStore {
            records: three_day_records(),
        }
    }

    pub fn empty() -> Self {
        FixtureStore {
            records: Vec::new(),
        }
    }
}

#[async_trait]
impl StepStore for FixtureStore {
    async fn fetch_step_records(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

/// Store fake that counts fetches, used to prove a handler never ran.
pub struct CountingStore {
    pub fetches: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        (
            CountingStore {
                fetches: fetches.clone(),
            },
            fetches,
        )
    }
}

#[async_trait]
impl StepStore for CountingStore {
    async fn fetch_step_records(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(three_day_records())
    }
}

/// Store fake that always fails.
pub struct FailingStore;

#[async_trait]
impl StepStore for FailingStore {
    async fn fetch_step_records(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError> {
        Err(StoreError::Request("store offline".to_string()))
    }
}
