//! warmpool-core — adaptive warm pool sizing.
//!
//! Observes allocation and release events for a node-scoped resource pool
//! and recommends how many unused resources to keep ready.
//!
//! # Architecture
//!
//! ```text
//! WarmPoolManager
//!   ├── record_allocation() / record_deallocation() ← called per event
//!   ├── EventLog (24h retention, garbage collected on every insert)
//!   ├── stats::hourly_net_change() → 24 hourly net-change buckets
//!   └── get_warm_target() → policy::decide() → target
//! ```
//!
//! # Target Algorithm
//!
//! ```text
//! std_dev, avg = round(sample_stddev(net)), round(mean(net))
//! target       = std_dev + avg
//! if std_dev > 5:  target = max(target, p75(net))
//! target       = max(target, burst)     // net change over the last hour
//! target       = max(target, 2)
//! ```
//!
//! `WarmPoolManager` is single-owner. Share it across threads through
//! [`SharedWarmPoolManager`], which serializes access behind a mutex.

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod manager;
pub mod policy;
pub mod shared;
pub mod stats;
pub mod trace;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PolicyConfig, ReconcileSettings, WarmPoolConfig};
pub use error::{WarmPoolError, WarmPoolResult};
pub use history::{Event, EventLog, Op};
pub use manager::{PoolSnapshot, WarmPoolManager};
pub use policy::Decision;
pub use shared::SharedWarmPoolManager;
pub use trace::TraceEvent;
