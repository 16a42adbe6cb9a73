//! Subscriber registry shared by both stores.
//!
//! Each store keeps one registry of callbacks; `notify` invokes all of them
//! synchronously with the current snapshot. Cross-tab signals and remote
//! listener pushes are adapted into the same registry by their stores, so a
//! subscriber sees one uniform "changed" signal regardless of transport.

use crate::types::WaitlistSnapshot;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Unique identifier for a subscriber within one registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

type Callback = Box<dyn Fn(&WaitlistSnapshot) + Send + Sync>;

/// Set of registered snapshot callbacks.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, Callback>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a callback, returning its id.
    pub fn insert(&self, callback: Callback) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers.write().insert(id, callback);
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn remove(&self, id: SubscriberId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    /// Invoke every registered callback with the snapshot.
    pub fn notify(&self, snapshot: &WaitlistSnapshot) {
        let subscribers = self.subscribers.read();
        for callback in subscribers.values() {
            callback(snapshot);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that ends a subscription.
///
/// The release runs exactly once: the first call to [`unsubscribe`] wins,
/// further calls are no-ops, and dropping an unreleased handle releases it.
///
/// [`unsubscribe`]: Unsubscribe::unsubscribe
pub struct Unsubscribe {
    release: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Unsubscribe {
    /// Wrap an arbitrary release action.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// Handle for a subscription that never attached (degraded remote mode).
    pub fn noop() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Handle that removes `id` from `registry` (if the registry is still
    /// alive by then).
    pub fn for_registry(registry: &Arc<SubscriberRegistry>, id: SubscriberId) -> Self {
        let registry: Weak<SubscriberRegistry> = Arc::downgrade(registry);
        Self::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// End the subscription. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(release) = self.release.lock().take() {
            release();
        }
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let released = self.release.lock().is_none();
        write!(f, "Unsubscribe {{ released: {} }}", released)
    }
}
