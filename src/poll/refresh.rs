//! One-off staggered refresh timers after mutating actions

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Offsets at which a view re-fetches after a mutating action, one early
/// and one late re-check
pub const MUTATION_REFRESH_DELAYS: [Duration; 2] = [Duration::from_secs(4), Duration::from_secs(12)];

/// Owned set of pending refresh timers for a single view.
///
/// Scheduling replaces whatever is already pending, and dropping the
/// schedule aborts anything that has not fired yet, so stale timers never
/// outlive the view that armed them.
#[derive(Debug, Default)]
pub struct RefreshSchedule {
    handles: Vec<JoinHandle<()>>,
}

impl RefreshSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm one refresh per delay, clearing any previously armed timers.
    pub fn schedule<F, Fut>(&mut self, delays: &[Duration], refresh: F)
    where
        F: Fn() -> Fut + Clone + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.clear();
        for &delay in delays {
            let refresh = refresh.clone();
            self.handles.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                debug!(delay_ms = delay.as_millis() as u64, "refresh timer fired");
                refresh().await;
            }));
        }
    }

    /// Abort every timer that has not fired yet.
    pub fn clear(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of armed timers that have not completed
    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|handle| !handle.is_finished()).count()
    }
}

impl Drop for RefreshSchedule {
    fn drop(&mut self) {
        self.clear();
    }
}
