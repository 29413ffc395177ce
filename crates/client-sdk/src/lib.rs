//! Client side of the faultline demo: talks to the backend API and keeps a
//! [`View`] up to date with health, users and an activity log.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod poller;
pub mod view;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use dashboard::Dashboard;
pub use error::{ApiError, ConfigError};
pub use log::{ActivityLog, LogEntry, Severity};
pub use poller::HealthPoller;
pub use view::{DashboardSnapshot, HealthIndicator, MemoryView, UserForm, UserPanel, View};
