//! Allocation event log with a 24 hour retention window.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How long events are retained, in hours.
pub const RETENTION_HOURS: i64 = 24;

/// Retention window as a duration.
pub fn retention() -> TimeDelta {
    TimeDelta::hours(RETENTION_HOURS)
}

/// Direction of a single pool event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// A resource was handed out.
    Allocate,
    /// A resource was returned.
    Release,
}

impl Op {
    /// Signed contribution to the net change: +1 or -1.
    pub fn delta(self) -> i64 {
        match self {
            Op::Allocate => 1,
            Op::Release => -1,
        }
    }
}

/// One recorded allocation or release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    /// In-use count immediately after this event.
    pub in_use: u64,
    pub op: Op,
}

/// Events in call order. Timestamps are not required to be monotonic.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Events ordered by timestamp. Ties keep insertion order.
    pub fn by_timestamp(&self) -> Vec<&Event> {
        let mut sorted: Vec<&Event> = self.events.iter().collect();
        sorted.sort_by_key(|e| e.timestamp);
        sorted
    }

    /// Drop every event whose age at `now` is 24 hours or more.
    ///
    /// Survivors keep their relative order. Returns the number evicted.
    pub fn garbage_collect(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.events.len();
        let window = retention();
        self.events.retain(|e| now - e.timestamp < window);
        let evicted = before - self.events.len();
        if evicted > 0 {
            debug!(evicted, retained = self.events.len(), "garbage collected event history");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, h, m, 0).unwrap()
    }

    fn event(ts: DateTime<Utc>, op: Op) -> Event {
        Event { timestamp: ts, in_use: 0, op }
    }

    #[test]
    fn op_deltas() {
        assert_eq!(Op::Allocate.delta(), 1);
        assert_eq!(Op::Release.delta(), -1);
    }

    #[test]
    fn gc_on_empty_log_is_noop() {
        let mut log = EventLog::new();
        assert_eq!(log.garbage_collect(at(12, 0)), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn gc_evicts_entries_at_or_past_retention() {
        let now = at(12, 0);
        let mut log = EventLog::new();
        log.push(event(now - TimeDelta::hours(25), Op::Allocate));
        log.push(event(now - TimeDelta::hours(24), Op::Allocate));
        log.push(event(now - TimeDelta::hours(23), Op::Release));
        log.push(event(now - TimeDelta::minutes(1), Op::Allocate));

        assert_eq!(log.garbage_collect(now), 2);
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|e| now - e.timestamp < retention()));
    }

    #[test]
    fn gc_preserves_survivor_order() {
        let now = at(12, 0);
        let mut log = EventLog::new();
        log.push(event(at(11, 0), Op::Allocate));
        log.push(event(now - TimeDelta::hours(30), Op::Allocate));
        log.push(event(at(9, 0), Op::Release));
        log.push(event(at(10, 0), Op::Allocate));

        log.garbage_collect(now);
        let order: Vec<_> = log.iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![at(11, 0), at(9, 0), at(10, 0)]);
    }

    #[test]
    fn gc_is_idempotent() {
        let now = at(12, 0);
        let mut log = EventLog::new();
        log.push(event(now - TimeDelta::hours(48), Op::Allocate));
        log.push(event(now, Op::Allocate));

        log.garbage_collect(now);
        let len = log.len();
        assert_eq!(log.garbage_collect(now), 0);
        assert_eq!(log.len(), len);
    }

    #[test]
    fn by_timestamp_sorts_out_of_order_inserts() {
        let mut log = EventLog::new();
        log.push(event(at(11, 0), Op::Allocate));
        log.push(event(at(9, 0), Op::Release));
        log.push(event(at(10, 0), Op::Allocate));

        let sorted: Vec<_> = log.by_timestamp().iter().map(|e| e.timestamp).collect();
        assert_eq!(sorted, vec![at(9, 0), at(10, 0), at(11, 0)]);
        // Insertion order is untouched.
        assert_eq!(log.iter().next().map(|e| e.timestamp), Some(at(11, 0)));
    }
}
