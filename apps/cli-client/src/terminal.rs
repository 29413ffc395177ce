use std::sync::{Mutex, PoisonError};

use client_sdk::{HealthIndicator, LogEntry, Severity, UserForm, UserPanel, View};

/// Prints every view change to stdout as it happens.
#[derive(Debug, Default)]
pub struct TerminalView {
    form: Mutex<UserForm>,
}

impl TerminalView {
    pub fn with_form(form: UserForm) -> Self {
        Self {
            form: Mutex::new(form),
        }
    }
}

impl View for TerminalView {
    fn set_health(&self, indicator: HealthIndicator) {
        println!("backend status: {}", indicator.label());
    }

    fn set_users(&self, panel: UserPanel) {
        if let Some(placeholder) = panel.placeholder() {
            println!("{placeholder}");
            return;
        }

        for user in panel.cards() {
            println!("{}", user.name);
            println!("  📧 {}", user.email);
            println!("  🆔 ID: {}", user.id);
        }
    }

    fn push_log(&self, entry: LogEntry) {
        let tag = match entry.severity {
            Severity::Info => "info",
            Severity::Success => " ok ",
            Severity::Error => "FAIL",
        };
        println!("[{}] {tag} {}", entry.timestamp, entry.message);
    }

    fn user_form(&self) -> UserForm {
        self.form
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_user_form(&self) {
        *self.form.lock().unwrap_or_else(PoisonError::into_inner) = UserForm::default();
    }
}
