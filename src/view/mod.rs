//! View-model glue: per-page subscription lifecycle, the submission flow,
//! and the admin gate. Markup and styling live with the host; this layer
//! owns the state the pages render from.

mod admin;
mod model;
mod submit;

pub use admin::{AdminDashboard, AdminGate, LOGIN_ERROR};
pub use model::{PageState, PageViewModel};
pub use submit::{
    is_valid_email, Submission, SubmissionFlow, SubmitState, RETRY_ADVISORY, STATUS_JOINED,
    STATUS_SAVED, VALIDATION_MESSAGE,
};

/// Pages exposed by the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Capture form.
    Landing,
    /// Confirmation after joining.
    Waitlist,
    /// Operator dashboard.
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Waitlist => "/waitlist",
            Route::Admin => "/admin",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Landing),
            "/waitlist" => Some(Route::Waitlist),
            "/admin" => Some(Route::Admin),
            _ => None,
        }
    }
}

/// Navigation target plus display-only state carried along.
///
/// The confirmation page shows the submitted email without re-validating or
/// re-fetching it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub email: Option<String>,
}

impl Navigation {
    /// Email to display, with the original's fallback wording.
    pub fn email_display(&self) -> &str {
        self.email.as_deref().unwrap_or("your email")
    }
}
