//! Local waitlist store: durable-within-device signup list with same-tab
//! and cross-tab change notification.

use crate::error::Result;
use crate::local::storage::LocalStorage;
use crate::subscriptions::{SubscriberRegistry, Unsubscribe};
use crate::types::{WaitlistEntry, WaitlistSnapshot};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Fixed storage key holding the JSON-encoded entry list.
pub const WAITLIST_KEY: &str = "waitlist_emails";

struct Inner {
    storage: LocalStorage,
    subscribers: Arc<SubscriberRegistry>,
}

impl Inner {
    /// Current state, degraded to empty on any read or parse failure.
    fn snapshot(&self) -> WaitlistSnapshot {
        let raw = match self.storage.get_item(WAITLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return WaitlistSnapshot::empty(),
            Err(e) => {
                debug!(error = %e, "local waitlist unreadable, treating as empty");
                return WaitlistSnapshot::empty();
            }
        };

        match serde_json::from_str::<Vec<WaitlistEntry>>(&raw) {
            Ok(entries) => WaitlistSnapshot::from_entries(entries),
            Err(e) => {
                debug!(error = %e, "local waitlist corrupted, treating as empty");
                WaitlistSnapshot::empty()
            }
        }
    }

    fn notify_current(&self) {
        let snapshot = self.snapshot();
        self.subscribers.notify(&snapshot);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some((bus, tab)) = self.storage.shared() {
            bus.detach(tab);
        }
    }
}

/// Single-device waitlist storage under [`WAITLIST_KEY`].
///
/// Writes broadcast to same-tab subscribers directly; writes from other tabs
/// arrive through the storage bus and feed the same subscriber registry, so
/// callers see one uniform change signal.
pub struct LocalWaitlistStore {
    inner: Arc<Inner>,
}

impl LocalWaitlistStore {
    /// Build a store over opened storage.
    ///
    /// If the storage shares an origin bus, changes written by other tabs
    /// under [`WAITLIST_KEY`] are bridged into this store's subscribers.
    pub fn open(storage: LocalStorage) -> Self {
        let inner = Arc::new(Inner {
            storage,
            subscribers: Arc::new(SubscriberRegistry::new()),
        });

        if let Some((bus, tab)) = inner.storage.shared() {
            let weak: Weak<Inner> = Arc::downgrade(&inner);
            bus.attach(
                tab,
                Box::new(move |event| {
                    if event.key == WAITLIST_KEY {
                        if let Some(inner) = weak.upgrade() {
                            inner.notify_current();
                        }
                    }
                }),
            );
        }

        Self { inner }
    }

    /// Append an entry and broadcast the change.
    ///
    /// Read-modify-write with no lock: concurrent writers race and the last
    /// write wins. Accepted consistency model for a single-operator,
    /// low-concurrency fallback.
    pub fn add_entry(&self, email: &str) -> Result<()> {
        let mut entries = self.inner.snapshot().entries;
        entries.push(WaitlistEntry::new(email));

        let blob = serde_json::to_string(&entries)?;
        self.inner.storage.set_item(WAITLIST_KEY, &blob)?;

        // Same-tab broadcast; the storage bus only reaches other tabs.
        self.inner
            .subscribers
            .notify(&WaitlistSnapshot::from_entries(entries));
        Ok(())
    }

    /// Current state. Corrupted or absent storage degrades to zero entries,
    /// never an error.
    pub fn get_snapshot(&self) -> WaitlistSnapshot {
        self.inner.snapshot()
    }

    /// Register a change handler.
    ///
    /// The handler is called immediately with the current snapshot, then on
    /// every same-tab write and every cross-tab change of the waitlist key.
    /// The returned handle is safe to release multiple times.
    pub fn subscribe(
        &self,
        handler: impl Fn(&WaitlistSnapshot) + Send + Sync + 'static,
    ) -> Unsubscribe {
        handler(&self.inner.snapshot());
        let id = self.inner.subscribers.insert(Box::new(handler));
        Unsubscribe::for_registry(&self.inner.subscribers, id)
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}
