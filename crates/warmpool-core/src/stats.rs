//! Windowed statistics over the event log.
//!
//! Everything here is read-only. Interval queries iterate the log in
//! insertion order; [`max_over`] works on a timestamp-sorted view because a
//! running maximum depends on event order.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::history::EventLog;

/// Number of hourly buckets in the net-change histogram.
pub const HISTORY_BUCKETS: usize = 24;

/// Net change over the half-open interval `[start, end)`.
pub fn net_change_over(log: &EventLog, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    log.iter()
        .filter(|e| e.timestamp >= start && e.timestamp < end)
        .map(|e| e.op.delta())
        .sum()
}

/// Peak of the running net change over the trailing window `(end, start]`.
///
/// `start` is the most recent bound. Events are folded in timestamp order;
/// the result never goes below zero.
pub fn max_over(log: &EventLog, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut running = 0i64;
    let mut peak = 0i64;
    for event in log.by_timestamp() {
        if event.timestamp <= start && event.timestamp > end {
            running += event.op.delta();
            peak = peak.max(running);
        }
    }
    peak
}

/// Net change per hour over the last 24 hours, most recent first.
///
/// Bucket boundaries are truncated to the hour, so element 0 covers the
/// current (partial) hour and element `i` the hour that started `i` hours
/// before it.
pub fn hourly_net_change(log: &EventLog, now: DateTime<Utc>) -> Vec<i64> {
    (0..HISTORY_BUCKETS as i64)
        .map(|i| {
            let start = truncate_to_hour(now - TimeDelta::hours(i));
            let end = truncate_to_hour(now - TimeDelta::hours(i - 1));
            net_change_over(log, start, end)
        })
        .collect()
}

/// Arithmetic mean, 0 for an empty slice.
pub fn average(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    sum as f64 / values.len() as f64
}

/// Sample standard deviation (divides by `n - 1`), 0 when `n <= 1`.
pub fn standard_deviation(values: &[i64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let avg = average(values);
    let squares: f64 = values.iter().map(|&v| (v as f64 - avg).powi(2)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}

/// Nearest-rank 75th percentile: sorted value at `round((n - 1) * 0.75)`.
pub fn percentile75(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = ((sorted.len() - 1) as f64 * 0.75).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Standard deviation and average, each rounded to the nearest integer
/// (halves away from zero).
pub fn rounded_std_dev_and_average(values: &[i64]) -> (i64, i64) {
    (
        standard_deviation(values).round() as i64,
        average(values).round() as i64,
    )
}

fn truncate_to_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.duration_trunc(TimeDelta::hours(1)).unwrap_or(instant)
}
