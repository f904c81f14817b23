//! warmpool-metrics — observability for warm pool managers.
//!
//! Renders [`PoolSnapshot`](warmpool_core::PoolSnapshot)s into the
//! Prometheus text exposition format, one `scope` label per managed node.
//!
//! # Architecture
//!
//! ```text
//! SharedWarmPoolManager::snapshot() → PoolSnapshot
//!   └── render_prometheus(&[ScopedSnapshot]) → text/plain for /metrics
//! ```

pub mod prometheus;

pub use prometheus::{ScopedSnapshot, render_prometheus};
