//! Submission flow: `Idle -> Validating -> Writing -> Done | Failed`.
//!
//! The write is two-phase. Phase 1 is the local store and must succeed;
//! phase 2 is the remote store and is best-effort, downgrading failure to an
//! advisory so the user still reaches the confirmation page on local
//! success.

use crate::config::AppConfig;
use crate::error::Result;
use crate::local::LocalWaitlistStore;
use crate::remote::RemoteWaitlistStore;
use crate::view::{Navigation, Route};
use tracing::warn;

/// Inline message for a rejected email.
pub const VALIDATION_MESSAGE: &str = "Enter a valid email";

/// Advisory shown when the best-effort remote write fails.
pub const RETRY_ADVISORY: &str = "Try again";

/// Status after a local-only submission.
pub const STATUS_SAVED: &str = "Saved";

/// Status after the remote write also landed.
pub const STATUS_JOINED: &str = "Joined";

/// Permissive email check: something, `@`, something, `.`, something.
///
/// Deliberately loose (the acceptance of the classic unanchored
/// `.+@.+\..+`), not an RFC validator.
pub fn is_valid_email(input: &str) -> bool {
    let Some(at) = input.find('@') else {
        return false;
    };
    if at == 0 {
        return false;
    }
    let rest = &input[at + 1..];
    rest.char_indices()
        .any(|(i, c)| c == '.' && i >= 1 && i + 1 < rest.len())
}

/// Where the submission state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Writing,
    Done,
    Failed,
}

/// Outcome of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Validation failed; no store was written. The flow is back at `Idle`.
    Rejected { message: &'static str },

    /// The local write landed; navigate to the confirmation page.
    Accepted {
        navigation: Navigation,
        status: &'static str,
        /// Present when the best-effort remote write failed.
        advisory: Option<&'static str>,
    },
}

/// One page's submission state machine.
#[derive(Debug)]
pub struct SubmissionFlow {
    state: SubmitState,
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self {
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Run the flow for one email.
    ///
    /// Returns `Err` only when the phase-1 local write fails; that is the
    /// single hard error of the flow. Remote failure is folded into the
    /// accepted outcome as an advisory.
    pub fn submit(
        &mut self,
        email: &str,
        config: &AppConfig,
        local: &LocalWaitlistStore,
        remote: Option<&RemoteWaitlistStore>,
    ) -> Result<Submission> {
        self.state = SubmitState::Validating;
        if !is_valid_email(email) {
            self.state = SubmitState::Idle;
            return Ok(Submission::Rejected {
                message: VALIDATION_MESSAGE,
            });
        }

        self.state = SubmitState::Writing;

        // Phase 1: local, unconditional.
        if let Err(e) = local.add_entry(email) {
            self.state = SubmitState::Failed;
            return Err(e);
        }

        // Phase 2: remote, best-effort.
        let mut status = STATUS_SAVED;
        let mut advisory = None;
        if config.remote_enabled() {
            if let Some(remote) = remote {
                match remote.add_entry(email) {
                    Ok(()) => status = STATUS_JOINED,
                    Err(e) => {
                        warn!(error = %e, email, "best-effort remote write failed");
                        advisory = Some(RETRY_ADVISORY);
                    }
                }
            }
        }

        self.state = SubmitState::Done;
        Ok(Submission::Accepted {
            navigation: Navigation {
                route: Route::Waitlist,
                email: Some(email.to_string()),
            },
            status,
            advisory,
        })
    }
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}
