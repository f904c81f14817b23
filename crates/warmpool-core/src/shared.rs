//! Thread-safe handle around a [`WarmPoolManager`].
//!
//! Every call takes the internal lock for its whole read-modify-write, so
//! allocation reports from many threads and periodic target polls can
//! interleave freely.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::manager::{PoolSnapshot, WarmPoolManager};
use crate::policy::Decision;

/// Cloneable, `Send + Sync` manager handle. Clones share one manager.
#[derive(Debug, Clone)]
pub struct SharedWarmPoolManager {
    inner: Arc<Mutex<WarmPoolManager>>,
}

impl SharedWarmPoolManager {
    pub fn new(manager: WarmPoolManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WarmPoolManager> {
        // Manager state stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.lock().now()
    }

    pub fn in_use(&self) -> u64 {
        self.lock().in_use()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history().len()
    }

    pub fn record_allocation(&self, at: Option<DateTime<Utc>>) {
        self.lock().record_allocation(at);
    }

    pub fn record_deallocation(&self, at: Option<DateTime<Utc>>) {
        self.lock().record_deallocation(at);
    }

    pub fn garbage_collect(&self) -> usize {
        self.lock().garbage_collect()
    }

    pub fn check_for_bursts(&self) -> i64 {
        self.lock().check_for_bursts()
    }

    pub fn get_warm_target(&self, net: Option<&[i64]>) -> u32 {
        self.lock().get_warm_target(net)
    }

    pub fn evaluate(&self, net: Option<&[i64]>) -> Decision {
        self.lock().evaluate(net)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        self.lock().snapshot()
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut WarmPoolManager) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<WarmPoolManager> for SharedWarmPoolManager {
    fn from(manager: WarmPoolManager) -> Self {
        Self::new(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use std::thread;

    fn shared() -> SharedWarmPoolManager {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 8, 15, 0).unwrap());
        WarmPoolManager::with_clock(0, Arc::new(clock)).into()
    }

    #[test]
    fn concurrent_reports_are_serialized() {
        let pool = shared();
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        pool.record_allocation(None);
                    }
                    for _ in 0..20 {
                        pool.record_deallocation(None);
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        assert_eq!(pool.in_use(), 8 * 30);
        assert_eq!(pool.history_len(), 8 * 70);
    }

    #[test]
    fn with_gives_exclusive_access() {
        let pool = shared();
        pool.record_allocation(None);
        let len = pool.with(|m| {
            m.record_allocation(None);
            m.history().len()
        });
        assert_eq!(len, 2);
        assert_eq!(pool.get_warm_target(None), 2);
    }
}
