//! Cancellable timer tasks
//!
//! Both UI controllers follow the same pattern: schedule something to
//! run after (or every) N milliseconds, and cancel it when state
//! changes or the owner goes away. `Scheduled` is that one primitive,
//! a spawned task whose handle aborts on cancel or drop, so a dropped
//! controller can never fire a stale callback.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a scheduled task. Dropping it cancels the task.
#[derive(Debug)]
pub struct Scheduled {
    handle: JoinHandle<()>,
}

impl Scheduled {
    /// Run `task` once after `delay`.
    pub fn once<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self { handle }
    }

    /// Run `tick` every `period`, starting one period from now.
    /// Missed ticks are skipped rather than bursted.
    pub fn every<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Scheduled {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_once_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = fired.clone();
        let _task = Scheduled::once(Duration::from_millis(10), async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = fired.clone();
        let task = Scheduled::once(Duration::from_millis(20), async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        drop(task);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_every_repeats_and_skips_immediate_tick() {
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = fired.clone();
        let _task = Scheduled::every(Duration::from_millis(15), move || {
            let flag = flag.clone();
            async move {
                flag.fetch_add(1, Ordering::SeqCst);
            }
        });
        // Well under one period: nothing yet (no immediate first fire)
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(fired.load(Ordering::SeqCst) >= 2);
    }
}
