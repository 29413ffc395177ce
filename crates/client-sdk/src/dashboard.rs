use std::sync::Arc;

use common::NewUser;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::log::{LogEntry, Severity};
use crate::poller::HealthPoller;
use crate::view::{HealthIndicator, UserPanel, View};

/// Divisor that makes the backend divide by zero.
pub const CRASH_VALUE: i64 = 0;
pub const SAFE_VALUE: i64 = 5;
const DIVIDEND: i64 = 100;

/// The dashboard operations. None of them return errors: every failure ends
/// up as a log line and a view change.
pub struct Dashboard<V: View> {
    api: ApiClient,
    view: Arc<V>,
    config: ClientConfig,
}

impl<V: View> Clone for Dashboard<V> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            view: Arc::clone(&self.view),
            config: self.config.clone(),
        }
    }
}

impl<V: View> Dashboard<V> {
    pub fn new(config: ClientConfig, view: Arc<V>) -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiClient::new(&config)?,
            view,
            config,
        })
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn log(&self, message: impl Into<String>, severity: Severity) {
        let entry = LogEntry::now(message, severity);
        match severity {
            Severity::Error => warn!(line = %entry.message, "dashboard"),
            Severity::Info | Severity::Success => {
                info!(line = %entry.message, severity = severity.as_str(), "dashboard")
            }
        }
        self.view.push_log(entry);
    }

    /// Logs the startup line, starts the health poller (its first tick is the
    /// startup check) and loads the user list.
    pub async fn start(&self) -> HealthPoller {
        self.log("Frontend application started", Severity::Info);
        let poller = HealthPoller::start(self.clone(), self.config.health_interval);
        self.load_users().await;
        poller
    }

    pub async fn check_health(&self) {
        match self.api.health().await {
            Ok(report) if report.is_healthy() => {
                self.view.set_health(HealthIndicator::Healthy);
                self.log("Backend health check: HEALTHY", Severity::Success);
            }
            Ok(_) => {
                self.view.set_health(HealthIndicator::Unhealthy);
                self.log("Backend health check: UNHEALTHY", Severity::Error);
            }
            Err(err) => {
                self.view.set_health(HealthIndicator::Offline);
                self.log(format!("Backend health check failed: {err}"), Severity::Error);
            }
        }
    }

    pub async fn load_users(&self) {
        match self.api.list_users().await {
            Ok(users) if users.is_empty() => self.view.set_users(UserPanel::Empty),
            Ok(users) => {
                let count = users.len();
                self.view.set_users(UserPanel::from_users(users));
                self.log(format!("Loaded {count} users successfully"), Severity::Success);
            }
            Err(err) => {
                self.view.set_users(UserPanel::Error);
                self.log(format!("Failed to load users: {err}"), Severity::Error);
            }
        }
    }

    /// Submits the view's user form. Blank fields are reported and nothing
    /// is sent; on success the form is cleared and the list reloaded.
    pub async fn add_user(&self) {
        let form = self.view.user_form();
        let name = form.name.trim();
        let email = form.email.trim();

        if name.is_empty() || email.is_empty() {
            self.log("Please enter both name and email", Severity::Error);
            return;
        }

        let request = NewUser {
            name: name.to_string(),
            email: email.to_string(),
        };

        match self.api.create_user(&request).await {
            Ok(user) => {
                self.log(
                    format!("✅ Added user: {} ({})", user.name, user.email),
                    Severity::Success,
                );
                self.view.clear_user_form();
                self.load_users().await;
            }
            Err(ApiError::Rejected { message, .. }) => {
                self.log(format!("❌ Failed to add user: {message}"), Severity::Error);
            }
            Err(err) => {
                self.log(format!("❌ Error adding user: {err}"), Severity::Error);
            }
        }
    }

    /// Asks the backend to divide by zero. When the connection drops, one
    /// health re-check is scheduled after `crash_recheck_delay`; its handle
    /// is returned.
    pub async fn trigger_crash(&self) -> Option<JoinHandle<()>> {
        self.log(
            format!("🚨 Sending crash request to /crash endpoint with value={CRASH_VALUE}..."),
            Severity::Info,
        );

        match self.api.calculate(CRASH_VALUE).await {
            Ok(_) => {
                self.log(
                    "🤔 Unexpected: Server returned a response (should have crashed)",
                    Severity::Info,
                );
                None
            }
            Err(err) if !err.is_network() => {
                let answer = err
                    .status()
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "an unreadable body".to_string());
                self.log(
                    format!("Backend answered the crash request with {answer}: {err}"),
                    Severity::Error,
                );
                None
            }
            Err(err) => {
                self.log(
                    format!("💥 CRASH TRIGGERED! Backend failed with: {err}"),
                    Severity::Error,
                );
                self.log(
                    "⚠️ The backend process may have crashed. Check its process status.",
                    Severity::Error,
                );
                Some(self.schedule_health_check())
            }
        }
    }

    pub async fn safe_calculation(&self) {
        self.log(
            format!("Sending safe request to /crash endpoint with value={SAFE_VALUE}..."),
            Severity::Info,
        );

        match self.api.calculate(SAFE_VALUE).await {
            Ok(calculation) => self.log(
                format!(
                    "✅ Safe calculation successful: {DIVIDEND} / {SAFE_VALUE} = {}",
                    calculation.result
                ),
                Severity::Success,
            ),
            Err(ApiError::Rejected { .. }) => self.log("❌ Request failed", Severity::Error),
            Err(err) => self.log(format!("❌ Error: {err}"), Severity::Error),
        }
    }

    fn schedule_health_check(&self) -> JoinHandle<()> {
        let dashboard = self.clone();
        let delay = self.config.crash_recheck_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dashboard.check_health().await;
        })
    }
}
