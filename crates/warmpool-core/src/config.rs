//! warmpool.toml configuration.
//!
//! Every field is optional; omitted values fall back to the defaults that
//! reproduce the standard target policy. Environment variables override
//! file values.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{WarmPoolError, WarmPoolResult};

pub const ENV_MIN_TARGET: &str = "WARMPOOL_MIN_TARGET";
pub const ENV_STDDEV_THRESHOLD: &str = "WARMPOOL_STDDEV_THRESHOLD";
pub const ENV_RECONCILE_INTERVAL: &str = "WARMPOOL_RECONCILE_INTERVAL";
pub const ENV_SCALE_DOWN_WINDOW: &str = "WARMPOOL_SCALE_DOWN_WINDOW";

const DEFAULT_MIN_TARGET: u32 = 2;
const DEFAULT_STDDEV_THRESHOLD: i64 = 5;
const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_SCALE_DOWN_WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarmPoolConfig {
    pub policy: Option<PolicySection>,
    pub reconcile: Option<ReconcileSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySection {
    pub min_target: Option<u32>,
    pub stddev_threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSection {
    /// Poll interval (e.g., "30s").
    pub interval: Option<String>,
    /// Cooldown before a lower target is applied (e.g., "5m").
    pub scale_down_window: Option<String>,
}

/// Resolved policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Floor applied last; the target is never below this.
    pub min_target: u32,
    /// Rounded standard deviation above which p75 is considered.
    pub stddev_threshold: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_target: DEFAULT_MIN_TARGET,
            stddev_threshold: DEFAULT_STDDEV_THRESHOLD,
        }
    }
}

/// Resolved reconcile loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub interval: Duration,
    pub scale_down_window: Duration,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RECONCILE_INTERVAL,
            scale_down_window: DEFAULT_SCALE_DOWN_WINDOW,
        }
    }
}

impl WarmPoolConfig {
    pub fn from_file(path: &Path) -> WarmPoolResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WarmPoolError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> WarmPoolResult<Self> {
        toml::from_str(content).map_err(|e| WarmPoolError::ConfigParse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> WarmPoolResult<String> {
        toml::to_string_pretty(self).map_err(|e| WarmPoolError::ConfigSerialize(e.to_string()))
    }

    /// Apply `WARMPOOL_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> WarmPoolResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> WarmPoolResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MIN_TARGET) {
            let value = parse_number(ENV_MIN_TARGET, &raw)?;
            self.policy.get_or_insert_with(Default::default).min_target = Some(value);
        }
        if let Some(raw) = lookup(ENV_STDDEV_THRESHOLD) {
            let value = parse_number(ENV_STDDEV_THRESHOLD, &raw)?;
            self.policy.get_or_insert_with(Default::default).stddev_threshold = Some(value);
        }
        if let Some(raw) = lookup(ENV_RECONCILE_INTERVAL) {
            parse_duration(&raw)?;
            self.reconcile.get_or_insert_with(Default::default).interval = Some(raw);
        }
        if let Some(raw) = lookup(ENV_SCALE_DOWN_WINDOW) {
            parse_duration(&raw)?;
            self.reconcile.get_or_insert_with(Default::default).scale_down_window = Some(raw);
        }
        Ok(())
    }

    pub fn policy(&self) -> PolicyConfig {
        let defaults = PolicyConfig::default();
        let section = self.policy.clone().unwrap_or_default();
        PolicyConfig {
            min_target: section.min_target.unwrap_or(defaults.min_target),
            stddev_threshold: section.stddev_threshold.unwrap_or(defaults.stddev_threshold),
        }
    }

    pub fn reconcile(&self) -> WarmPoolResult<ReconcileSettings> {
        let defaults = ReconcileSettings::default();
        let section = self.reconcile.clone().unwrap_or_default();
        Ok(ReconcileSettings {
            interval: section
                .interval
                .as_deref()
                .map(parse_duration)
                .transpose()?
                .unwrap_or(defaults.interval),
            scale_down_window: section
                .scale_down_window
                .as_deref()
                .map(parse_duration)
                .transpose()?
                .unwrap_or(defaults.scale_down_window),
        })
    }
}

/// Parse a duration string like "30s", "5m", "1h", or bare seconds.
pub fn parse_duration(s: &str) -> WarmPoolResult<Duration> {
    let s = s.trim();
    let invalid = || WarmPoolError::InvalidDuration(s.to_string());
    let (digits, unit) = if let Some(v) = s.strip_suffix('h') {
        (v, 3600)
    } else if let Some(v) = s.strip_suffix('m') {
        (v, 60)
    } else if let Some(v) = s.strip_suffix('s') {
        (v, 1)
    } else {
        (s, 1)
    };
    let n: u64 = digits.trim().parse().map_err(|_| invalid())?;
    n.checked_mul(unit).map(Duration::from_secs).ok_or_else(invalid)
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> WarmPoolResult<T> {
    raw.trim().parse().map_err(|_| WarmPoolError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
