use std::sync::{Mutex, MutexGuard, PoisonError};

use common::User;
use serde::Serialize;

use crate::log::{ActivityLog, LogEntry};

pub const NO_USERS_PLACEHOLDER: &str = "No users found.";
pub const USERS_ERROR_PLACEHOLDER: &str = "Error loading users.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthIndicator {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
    Offline,
}

impl HealthIndicator {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Checking...",
            Self::Healthy => "✅ Healthy",
            Self::Unhealthy => "❌ Unhealthy",
            Self::Offline => "❌ Offline",
        }
    }

    /// Offline shares the unhealthy styling.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Unknown => "status-indicator unknown",
            Self::Healthy => "status-indicator healthy",
            Self::Unhealthy | Self::Offline => "status-indicator unhealthy",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "users", rename_all = "lowercase")]
pub enum UserPanel {
    #[default]
    Loading,
    Empty,
    Users(Vec<User>),
    Error,
}

impl UserPanel {
    pub fn from_users(users: Vec<User>) -> Self {
        if users.is_empty() {
            Self::Empty
        } else {
            Self::Users(users)
        }
    }

    pub fn cards(&self) -> &[User] {
        match self {
            Self::Users(users) => users,
            _ => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading users..."),
            Self::Empty => Some(NO_USERS_PLACEHOLDER),
            Self::Error => Some(USERS_ERROR_PLACEHOLDER),
            Self::Users(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

impl UserForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Everything the dashboard operations are allowed to touch on screen.
///
/// Implementations are shared between the poller task and user-triggered
/// operations, so every method takes `&self`.
pub trait View: Send + Sync + 'static {
    fn set_health(&self, indicator: HealthIndicator);

    fn set_users(&self, panel: UserPanel);

    fn push_log(&self, entry: LogEntry);

    fn user_form(&self) -> UserForm;

    fn clear_user_form(&self);
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub health: HealthIndicator,
    pub users: UserPanel,
    pub log: ActivityLog,
    pub form: UserForm,
}

/// In-memory [`View`]; backs the web dashboard and the tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<DashboardSnapshot>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state().clone()
    }

    pub fn set_user_form(&self, form: UserForm) {
        self.state().form = form;
    }

    fn state(&self) -> MutexGuard<'_, DashboardSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl View for MemoryView {
    fn set_health(&self, indicator: HealthIndicator) {
        self.state().health = indicator;
    }

    fn set_users(&self, panel: UserPanel) {
        self.state().users = panel;
    }

    fn push_log(&self, entry: LogEntry) {
        self.state().log.push(entry);
    }

    fn user_form(&self) -> UserForm {
        self.state().form.clone()
    }

    fn clear_user_form(&self) {
        self.state().form = UserForm::default();
    }
}
