//! Property-based tests for the dispatcher and the aggregation engine.
//!
//! Uses proptest to generate arbitrary record series and method names and
//! verify the documented invariants: aggregation arithmetic, extrema bounds,
//! weekday grouping, dispatch totality, and envelope exclusivity.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;
use serde_json::Value;

use stepstats_mcp::analytics::{self, summarize, DailyStepRecord};
use stepstats_mcp::mcp::{McpServer, Method, MethodRequest};
use stepstats_mcp::store::StepStore;
use stepstats_mcp::error::StoreError;

const KNOWN_METHODS: [&str; 5] = [
    "initialize",
    "tools/list",
    "tools/call",
    "resources/list",
    "resources/read",
];

// ============================================================================
// Strategies
// ============================================================================

/// Ascending-by-date record series, matching the store contract.
fn arb_records() -> impl Strategy<Value = Vec<DailyStepRecord>> {
    (0u64..20_000, prop::collection::vec(0u64..200_000, 0..60)).prop_map(|(offset, counts)| {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap();
        counts
            .into_iter()
            .enumerate()
            .map(|(i, step_count)| DailyStepRecord {
                date: base.checked_add_days(Days::new(i as u64)).unwrap(),
                step_count,
            })
            .collect()
    })
}

/// Method names outside the fixed dispatch set.
fn arb_unknown_method() -> impl Strategy<Value = String> {
    "[a-z_/]{0,24}".prop_filter("must not be a known method", |name| {
        !KNOWN_METHODS.contains(&name.as_str())
    })
}

fn rounded_mean(total: u64, count: u64) -> u64 {
    (total as f64 / count as f64).round() as u64
}

// ============================================================================
// Aggregation properties
// ============================================================================

proptest! {
    #[test]
    fn prop_total_and_average(records in arb_records()) {
        let summary = summarize(&records);

        let expected_total: u64 = records.iter().map(|r| r.step_count).sum();
        prop_assert_eq!(summary.total_steps, expected_total);

        if records.is_empty() {
            prop_assert_eq!(summary.average_steps, 0);
        } else {
            prop_assert_eq!(
                summary.average_steps,
                rounded_mean(expected_total, records.len() as u64)
            );
        }
    }

    #[test]
    fn prop_extrema_bound_every_record(records in arb_records()) {
        prop_assume!(!records.is_empty());
        let summary = summarize(&records);

        for record in &records {
            prop_assert!(summary.most_active_day.steps >= record.step_count);
            prop_assert!(summary.least_active_day.steps <= record.step_count);
        }

        // Both extrema name actual records
        prop_assert!(records
            .iter()
            .any(|r| r.date.to_string() == summary.most_active_day.date
                && r.step_count == summary.most_active_day.steps));
        prop_assert!(records
            .iter()
            .any(|r| r.date.to_string() == summary.least_active_day.date
                && r.step_count == summary.least_active_day.steps));
    }

    #[test]
    fn prop_weekly_pattern_keys_and_means(records in arb_records()) {
        let summary = summarize(&records);

        let expected_keys: BTreeSet<String> = records
            .iter()
            .map(|r| analytics::weekday_name(r.date.weekday()).to_string())
            .collect();
        let actual_keys: BTreeSet<String> =
            summary.weekly_pattern.keys().cloned().collect();
        prop_assert_eq!(actual_keys, expected_keys);

        for (day, average) in &summary.weekly_pattern {
            let group: Vec<u64> = records
                .iter()
                .filter(|r| analytics::weekday_name(r.date.weekday()) == day)
                .map(|r| r.step_count)
                .collect();
            let total: u64 = group.iter().sum();
            prop_assert_eq!(*average, rounded_mean(total, group.len() as u64));
        }
    }

    #[test]
    fn prop_daily_data_mirrors_input(records in arb_records()) {
        let summary = summarize(&records);

        prop_assert_eq!(summary.daily_data.len(), records.len());
        for (stat, record) in summary.daily_data.iter().zip(&records) {
            prop_assert_eq!(&stat.date, &record.date.to_string());
            prop_assert_eq!(stat.steps, record.step_count);
        }
    }

    #[test]
    fn prop_window_normalization_is_positive(days in any::<i64>()) {
        let normalized = analytics::normalized_window_days(Some(days));
        prop_assert!(normalized > 0);
        if days > 0 {
            prop_assert_eq!(normalized, days);
        }
    }
}

// ============================================================================
// Dispatch properties
// ============================================================================

struct EmptyStore;

#[async_trait::async_trait]
impl StepStore for EmptyStore {
    async fn fetch_step_records(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<DailyStepRecord>, StoreError> {
        Ok(Vec::new())
    }
}

proptest! {
    #[test]
    fn prop_unknown_methods_are_method_not_found(method in arb_unknown_method()) {
        prop_assert!(Method::from_name(&method).is_none());

        let server = McpServer::new(Arc::new(EmptyStore), None);
        let response = tokio_test::block_on(server.dispatch(MethodRequest {
            method: method.clone(),
            params: None,
        }));

        let json: Value = serde_json::to_value(&response).unwrap();
        prop_assert_eq!(&json["error"]["code"], -32601);
        let message = json["error"]["message"].as_str().unwrap();
        prop_assert!(message.contains(&method));
        prop_assert!(json.get("result").is_none());
    }

    #[test]
    fn prop_every_dispatch_outcome_is_an_exclusive_envelope(
        method in "[a-z/]{0,16}",
        params in prop_oneof![
            Just(None),
            Just(Some(serde_json::json!({}))),
            Just(Some(serde_json::json!({"name": "get_step_summary", "arguments": {}}))),
            Just(Some(serde_json::json!({"uri": "steps://daily-data"}))),
        ],
    ) {
        let server = McpServer::new(Arc::new(EmptyStore), None);
        let response = tokio_test::block_on(server.dispatch(MethodRequest { method, params }));

        let json: Value = serde_json::to_value(&response).unwrap();
        let has_result = json.get("result").is_some();
        let has_error = json.get("error").is_some();
        prop_assert!(has_result ^ has_error, "exactly one of result/error: {json}");
    }
}

#[test]
fn known_method_names_all_parse() {
    for name in KNOWN_METHODS {
        assert!(Method::from_name(name).is_some(), "{name} should dispatch");
    }
}
