//! Reconciler — turns warm targets into pool resize actions.
//!
//! Reads the current target from the shared manager, compares it with the
//! last applied size, and decides whether the pool should change. Growth is
//! applied at once; shrinking waits out a cooldown to prevent thrashing.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use warmpool_core::{ReconcileSettings, SharedWarmPoolManager};

/// A resize decision for the warm pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolDecision {
    /// Resize the warm pool to the given number of resources.
    Resize(u32),
    /// No change needed.
    NoChange,
}

/// Callback type for performing resize actions.
///
/// The reconciler calls this with the new warm pool size.
pub type ResizeCallback = Box<dyn Fn(u32) -> BoxFuture + Send + Sync>;

/// Future returned by a [`ResizeCallback`].
pub type BoxFuture = std::pin::Pin<
    Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
>;

/// Polls the manager and resizes the pool when the target moves.
pub struct Reconciler {
    manager: SharedWarmPoolManager,
    scale_down_window: TimeDelta,
    /// Size last applied, if any.
    applied: Option<u32>,
    /// When `applied` was set.
    last_resize: Option<DateTime<Utc>>,
    /// Callback to perform resizing.
    resize_fn: Option<ResizeCallback>,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(manager: SharedWarmPoolManager, settings: &ReconcileSettings) -> Self {
        Self {
            manager,
            scale_down_window: TimeDelta::from_std(settings.scale_down_window)
                .unwrap_or(TimeDelta::MAX),
            applied: None,
            last_resize: None,
            resize_fn: None,
        }
    }

    /// Set the callback used to perform resizing.
    pub fn with_resize_fn(mut self, f: ResizeCallback) -> Self {
        self.resize_fn = Some(f);
        self
    }

    /// The pool size last applied.
    pub fn applied(&self) -> Option<u32> {
        self.applied
    }

    /// Decide what to do about the current target without applying it.
    pub fn evaluate(&self) -> PoolDecision {
        let desired = self.manager.get_warm_target(None);
        let now = self.manager.now();

        match self.applied {
            None => PoolDecision::Resize(desired),
            Some(current) if desired > current => {
                debug!(from = current, to = desired, "growing warm pool");
                PoolDecision::Resize(desired)
            }
            Some(current) if desired < current => {
                let cooled = self
                    .last_resize
                    .is_none_or(|at| now - at >= self.scale_down_window);
                if cooled {
                    debug!(from = current, to = desired, "shrinking warm pool");
                    PoolDecision::Resize(desired)
                } else {
                    debug!(from = current, to = desired, "shrink deferred by cooldown");
                    PoolDecision::NoChange
                }
            }
            Some(_) => PoolDecision::NoChange,
        }
    }

    /// Evaluate and, on a resize, run the callback and record the new size.
    ///
    /// A failed callback leaves the applied size untouched so the next
    /// pass retries.
    pub async fn reconcile(&mut self) -> anyhow::Result<PoolDecision> {
        let decision = self.evaluate();

        if let PoolDecision::Resize(target) = decision {
            if let Some(ref resize_fn) = self.resize_fn
                && let Err(e) = resize_fn(target).await
            {
                warn!(size = target, error = %e, "warm pool resize failed");
                return Err(e);
            }
            self.applied = Some(target);
            self.last_resize = Some(self.manager.now());
        }

        Ok(decision)
    }

    /// Run the reconcile loop until shutdown.
    pub async fn run(
        &mut self,
        interval: Duration,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        info!(
            interval_secs = interval.as_secs(),
            "warm pool reconciler started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.reconcile().await {
                        tracing::error!(error = %e, "warm pool reconcile failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("warm pool reconciler shutting down");
                    break;
                }
            }
        }
    }
}
