//! Admin gate and dashboard.
//!
//! The gate is a hard-coded string comparison for a single internal
//! operator; it is not a security boundary and does not pretend to be one.

use crate::config::AppConfig;
use crate::local::LocalWaitlistStore;
use crate::remote::RemoteWaitlistStore;
use crate::view::model::PageViewModel;
use std::sync::Arc;

const ADMIN_USER: &str = "dev_admin";
const ADMIN_PASS: &str = "A9x!zRq3";

/// Inline message for a failed login.
pub const LOGIN_ERROR: &str = "Invalid credentials";

/// Credential check for the `/admin` route.
#[derive(Debug, Default)]
pub struct AdminGate {
    authed: bool,
}

impl AdminGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), &'static str> {
        if username == ADMIN_USER && password == ADMIN_PASS {
            self.authed = true;
            Ok(())
        } else {
            Err(LOGIN_ERROR)
        }
    }

    pub fn is_authed(&self) -> bool {
        self.authed
    }
}

/// Dashboard listing the signup count and emails from the active store.
///
/// Subscriptions attach only after the gate is passed.
pub struct AdminDashboard {
    gate: AdminGate,
    view: PageViewModel,
}

impl AdminDashboard {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            gate: AdminGate::new(),
            view: PageViewModel::new(config),
        }
    }

    /// Check credentials and, on success, mount the store subscriptions.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        local: &LocalWaitlistStore,
        remote: Option<&RemoteWaitlistStore>,
    ) -> Result<(), &'static str> {
        self.gate.login(username, password)?;
        self.view.mount(local, remote);
        Ok(())
    }

    pub fn is_authed(&self) -> bool {
        self.gate.is_authed()
    }

    /// Pull pending store updates.
    pub fn refresh(&mut self) {
        self.view.refresh();
    }

    /// Total waitlist size from the active store.
    pub fn count(&self) -> usize {
        self.view.count()
    }

    /// Emails from the active store, in the order it returned them.
    pub fn emails(&self) -> Vec<String> {
        self.view
            .display()
            .entries
            .iter()
            .map(|e| e.email.clone())
            .collect()
    }

    /// Degraded-mode message, if any.
    pub fn advisory(&self) -> Option<&str> {
        self.view.advisory()
    }

    /// Release the dashboard's subscriptions.
    pub fn unmount(&mut self) {
        self.view.unmount();
    }
}
