//! Warm pool manager — per-node allocation history and target computation.
//!
//! Callers report each allocation and release; the manager keeps the last
//! 24 hours of events and turns them into a warm target on demand.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::PolicyConfig;
use crate::history::{Event, EventLog, Op, retention};
use crate::policy::{self, Decision};
use crate::stats;

/// Trailing window reported as `peak_30m` in snapshots.
const PEAK_WINDOW_MINUTES: i64 = 30;

/// Point-in-time view of a manager, for dashboards and exposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSnapshot {
    pub taken_at: DateTime<Utc>,
    pub in_use: u64,
    pub history_len: usize,
    /// Hourly net change, most recent hour first.
    pub net_change: Vec<i64>,
    pub average: i64,
    pub std_dev: i64,
    pub p75: i64,
    pub burst: i64,
    /// Highest running net change over the last 30 minutes.
    pub peak_30m: i64,
    pub target: u32,
}

/// Tracks in-use resources and recommends a warm pool size.
///
/// Not internally synchronized; see [`crate::SharedWarmPoolManager`].
#[derive(Debug)]
pub struct WarmPoolManager {
    in_use: u64,
    history: EventLog,
    last_gc: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    policy: PolicyConfig,
}

impl WarmPoolManager {
    /// Create a manager on the system clock.
    pub fn new(initial_in_use: u64) -> Self {
        Self::with_clock(initial_in_use, Arc::new(SystemClock))
    }

    pub fn with_clock(initial_in_use: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            in_use: initial_in_use,
            history: EventLog::new(),
            last_gc: clock.now(),
            clock,
            policy: PolicyConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn in_use(&self) -> u64 {
        self.in_use
    }

    pub fn history(&self) -> &EventLog {
        &self.history
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// When the throttled histogram-path collection last ran.
    pub fn last_garbage_collect(&self) -> DateTime<Utc> {
        self.last_gc
    }

    /// Record a successful allocation at `at` (default: now).
    pub fn record_allocation(&mut self, at: Option<DateTime<Utc>>) {
        self.in_use += 1;
        self.record(Op::Allocate, at);
    }

    /// Record a release at `at` (default: now). The in-use count floors at 0.
    pub fn record_deallocation(&mut self, at: Option<DateTime<Utc>>) {
        self.in_use = self.in_use.saturating_sub(1);
        self.record(Op::Release, at);
    }

    fn record(&mut self, op: Op, at: Option<DateTime<Utc>>) {
        let timestamp = at.unwrap_or_else(|| self.clock.now());
        self.history.push(Event {
            timestamp,
            in_use: self.in_use,
            op,
        });
        self.garbage_collect();
    }

    /// Drop events that are 24 hours old or older. Returns the number evicted.
    pub fn garbage_collect(&mut self) -> usize {
        let now = self.clock.now();
        self.history.garbage_collect(now)
    }

    /// Net change over `[start, end)`.
    pub fn net_change_over(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        stats::net_change_over(&self.history, start, end)
    }

    /// Running-peak net change over `(end, start]`.
    pub fn max_over(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        stats::max_over(&self.history, start, end)
    }

    /// Hourly net change for the last 24 hours, most recent first.
    ///
    /// Collects stale history first when the previous throttled collection
    /// is more than 24 hours old.
    pub fn net_change_over_history(&mut self) -> Vec<i64> {
        let now = self.clock.now();
        if now - self.last_gc > retention() {
            self.history.garbage_collect(now);
            self.last_gc = now;
        }
        stats::hourly_net_change(&self.history, now)
    }

    /// Net change over the last hour.
    pub fn check_for_bursts(&self) -> i64 {
        let now = self.clock.now();
        self.net_change_over(now - TimeDelta::hours(1), now)
    }

    /// Recommended warm pool size.
    ///
    /// With `None` the histogram is derived from recorded history and the
    /// burst is [`Self::check_for_bursts`], the trailing hour `[now - 1h, now)`.
    /// A supplied histogram is evaluated on its own: its first element, the
    /// current clock-hour bucket, doubles as the burst signal. The windows
    /// differ, so passing back [`Self::net_change_over_history`] can yield a
    /// lower target than `None` shortly after the hour turns.
    pub fn get_warm_target(&mut self, net: Option<&[i64]>) -> u32 {
        self.evaluate(net).target
    }

    /// Like [`Self::get_warm_target`] but returns the full breakdown.
    pub fn evaluate(&mut self, net: Option<&[i64]>) -> Decision {
        let (net, burst) = match net {
            Some(net) => (net.to_vec(), policy::histogram_burst(net)),
            None => (self.net_change_over_history(), self.check_for_bursts()),
        };
        let decision = policy::decide(&net, burst, &self.policy);
        debug!(
            warm_target = decision.target,
            std_dev = decision.std_dev,
            avg = decision.average,
            p75 = decision.p75,
            burst = decision.burst,
            net = ?net,
            "computed warm target"
        );
        decision
    }

    pub fn snapshot(&mut self) -> PoolSnapshot {
        let net_change = self.net_change_over_history();
        let burst = self.check_for_bursts();
        let decision = policy::decide(&net_change, burst, &self.policy);
        let now = self.clock.now();
        PoolSnapshot {
            taken_at: now,
            in_use: self.in_use,
            history_len: self.history.len(),
            peak_30m: self.max_over(now, now - TimeDelta::minutes(PEAK_WINDOW_MINUTES)),
            net_change,
            average: decision.average,
            std_dev: decision.std_dev,
            p75: decision.p75,
            burst: decision.burst,
            target: decision.target,
        }
    }
}
