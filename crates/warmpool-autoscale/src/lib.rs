//! warmpool-autoscale — applies warm targets to a real pool.
//!
//! Polls a [`SharedWarmPoolManager`](warmpool_core::SharedWarmPoolManager)
//! on an interval and emits resize decisions for the owning resource
//! manager. The actual resize is performed by a callback.
//!
//! # Reconcile Rule
//!
//! ```text
//! desired = manager.get_warm_target()
//!
//! if nothing applied yet or desired > current:
//!     Resize(desired)                 // grow immediately
//! if desired < current and now - last_resize >= scale_down_window:
//!     Resize(desired)                 // shrink after cooldown
//! otherwise NoChange
//! ```

pub mod reconciler;

pub use reconciler::{BoxFuture, PoolDecision, Reconciler, ResizeCallback};
