//! Remote waitlist store over a document backend.

use crate::error::{Result, WaitlistError};
use crate::remote::backend::{CollectionSnapshot, DocumentBackend, WAITLIST_COLLECTION};
use crate::subscriptions::Unsubscribe;
use crate::types::{Timestamp, WaitlistEntry, WaitlistSnapshot};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Durable, multi-client-visible waitlist storage with push-based change
/// notification.
///
/// Every operation treats backend failure as a degraded condition, not a
/// fatal one; the local store is the guaranteed path.
pub struct RemoteWaitlistStore {
    backend: Arc<dyn DocumentBackend>,
}

impl RemoteWaitlistStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Establish an anonymous identity if none exists yet.
    ///
    /// Failure is logged, not surfaced: callers treat the absence of live
    /// updates as degraded operation.
    pub fn initialize(&self) {
        if self.backend.has_identity() {
            return;
        }
        if let Err(e) = self.backend.sign_in_anonymously() {
            warn!(error = %e, "remote backend unreachable, continuing local-only");
        }
    }

    /// Append an entry; the backend assigns the timestamp.
    ///
    /// Callers must not rely on this succeeding for local UX — the local
    /// store write is independent and unconditional.
    pub fn add_entry(&self, email: &str) -> Result<()> {
        if !self.backend.has_identity() {
            self.backend.sign_in_anonymously()?;
        }
        self.backend
            .add_document(WAITLIST_COLLECTION, json!({ "email": email }))
    }

    /// Register a live listener on the waitlist collection.
    ///
    /// `on_snapshot` fires with the current snapshot immediately and on
    /// every subsequent change. If the listener cannot attach, `on_error`
    /// fires once and the returned handle is inert. Releasing the handle
    /// more than once is a no-op.
    ///
    /// Entry order is whatever the backend returned at snapshot time.
    pub fn subscribe(
        &self,
        on_snapshot: impl Fn(&WaitlistSnapshot) + Send + Sync + 'static,
        on_error: impl FnOnce(&WaitlistError),
    ) -> Unsubscribe {
        let listener = Box::new(move |collection: &CollectionSnapshot| {
            on_snapshot(&to_waitlist_snapshot(collection));
        });

        match self.backend.listen(WAITLIST_COLLECTION, listener) {
            Ok(id) => {
                let backend = Arc::clone(&self.backend);
                Unsubscribe::new(move || backend.unlisten(id))
            }
            Err(e) => {
                warn!(error = %e, "remote listener failed to attach");
                on_error(&e);
                Unsubscribe::noop()
            }
        }
    }
}

/// Project backend documents into the waitlist view.
///
/// The collection size is authoritative for the count; documents without an
/// email field are skipped, so `entries` may be shorter than `count`.
fn to_waitlist_snapshot(collection: &CollectionSnapshot) -> WaitlistSnapshot {
    let entries = collection
        .documents
        .iter()
        .filter_map(|doc| {
            let email = doc.get("email")?.as_str()?;
            let joined_at = doc
                .get("createdAt")
                .and_then(|v| v.as_i64())
                .map(Timestamp)
                .unwrap_or_default();
            Some(WaitlistEntry {
                email: email.to_string(),
                joined_at,
            })
        })
        .collect();

    WaitlistSnapshot {
        count: collection.size,
        entries,
    }
}
