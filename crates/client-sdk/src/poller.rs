use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::dashboard::Dashboard;
use crate::view::View;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to the periodic health check. The first check runs immediately.
/// Dropping the handle cancels the loop; [`HealthPoller::stop`] also waits
/// for the task to finish.
pub struct HealthPoller {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl HealthPoller {
    pub fn start<V: View>(dashboard: Dashboard<V>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let interval = interval.max(MIN_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(?interval, "health poller started");

            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    () = dashboard.check_health() => {}
                }
            }

            debug!("health poller stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
