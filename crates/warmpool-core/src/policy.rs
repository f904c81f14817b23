//! Warm target decision policy.
//!
//! Folds the hourly net-change histogram and the burst signal into a
//! single target. Each step can only raise the target, so the order below
//! matters only for readability of the logged breakdown.

use serde::Serialize;

use crate::config::PolicyConfig;
use crate::stats;

/// A target together with the statistics that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub target: u32,
    pub std_dev: i64,
    pub average: i64,
    pub p75: i64,
    pub burst: i64,
}

/// Compute the warm target for a net-change histogram.
///
/// `burst` is the net change over the most recent hour.
pub fn decide(net: &[i64], burst: i64, policy: &PolicyConfig) -> Decision {
    let (std_dev, average) = stats::rounded_std_dev_and_average(net);
    let p75 = stats::percentile75(net);

    let mut target = std_dev.saturating_add(average);
    if std_dev > policy.stddev_threshold {
        target = target.max(p75);
    }
    target = target.max(burst);
    target = target.max(i64::from(policy.min_target));

    Decision {
        target: u32::try_from(target).unwrap_or(u32::MAX),
        std_dev,
        average,
        p75,
        burst,
    }
}

/// Burst signal carried by a histogram: its most recent bucket.
pub fn histogram_burst(net: &[i64]) -> i64 {
    net.first().copied().unwrap_or(0)
}
