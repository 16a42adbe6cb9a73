//! Document backend seam.
//!
//! The hosted collaborator is a document-oriented store supporting anonymous
//! identity, insertion with a server-assigned timestamp, and live collection
//! listeners. `DocumentBackend` is the trait boundary; `InMemoryBackend` is
//! an in-process implementation with failure injection, used in tests and
//! for offline development.

use crate::error::{Result, WaitlistError};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Fixed collection name for waitlist entries.
pub const WAITLIST_COLLECTION: &str = "waitlist";

/// Field the backend stamps with the server time on insert.
const CREATED_AT_FIELD: &str = "createdAt";

/// A collection at a point in time: its size plus the raw documents.
///
/// Size stands on its own so a backend can expose the count without the
/// documents.
#[derive(Clone, Debug, Default)]
pub struct CollectionSnapshot {
    pub size: usize,
    pub documents: Vec<Value>,
}

/// Identifier for an attached collection listener.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

pub type CollectionListener = Box<dyn Fn(&CollectionSnapshot) + Send + Sync>;

/// Network-reachable document store.
pub trait DocumentBackend: Send + Sync {
    /// Whether an identity has already been established.
    fn has_identity(&self) -> bool;

    /// Establish an anonymous identity.
    fn sign_in_anonymously(&self) -> Result<()>;

    /// Insert a document; the backend assigns the server timestamp.
    fn add_document(&self, collection: &str, fields: Value) -> Result<()>;

    /// Attach a live listener. The listener is invoked with the current
    /// snapshot immediately and again on every change to the collection.
    fn listen(&self, collection: &str, listener: CollectionListener) -> Result<ListenerId>;

    /// Detach a listener. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

/// In-process backend with failure injection.
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    listeners: RwLock<HashMap<ListenerId, (String, CollectionListener)>>,
    next_listener: AtomicU64,
    identity: AtomicBool,
    offline: AtomicBool,
    failing_writes: AtomicBool,
    denying_listen: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            listeners: RwLock::new(HashMap::new()),
            next_listener: AtomicU64::new(1),
            identity: AtomicBool::new(false),
            offline: AtomicBool::new(false),
            failing_writes: AtomicBool::new(false),
            denying_listen: AtomicBool::new(false),
        }
    }

    /// Make anonymous sign-in fail (backend unreachable).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make inserts fail with a network error.
    pub fn fail_writes(&self, fail: bool) {
        self.failing_writes.store(fail, Ordering::SeqCst);
    }

    /// Make listener attachment fail with a permission error.
    pub fn deny_listen(&self, deny: bool) {
        self.denying_listen.store(deny, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn snapshot_of(&self, collection: &str) -> CollectionSnapshot {
        let collections = self.collections.read();
        let documents = collections.get(collection).cloned().unwrap_or_default();
        CollectionSnapshot {
            size: documents.len(),
            documents,
        }
    }

    fn notify(&self, collection: &str) {
        let snapshot = self.snapshot_of(collection);
        let listeners = self.listeners.read();
        for (watched, listener) in listeners.values() {
            if watched == collection {
                listener(&snapshot);
            }
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBackend for InMemoryBackend {
    fn has_identity(&self) -> bool {
        self.identity.load(Ordering::SeqCst)
    }

    fn sign_in_anonymously(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(WaitlistError::Identity("backend unreachable".into()));
        }
        self.identity.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn add_document(&self, collection: &str, fields: Value) -> Result<()> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(WaitlistError::RemoteWrite("network error".into()));
        }

        let mut document = fields;
        if let Value::Object(map) = &mut document {
            map.insert(
                CREATED_AT_FIELD.to_string(),
                Value::from(crate::types::Timestamp::now().0),
            );
        }

        {
            let mut collections = self.collections.write();
            collections
                .entry(collection.to_string())
                .or_default()
                .push(document);
        }

        self.notify(collection);
        Ok(())
    }

    fn listen(&self, collection: &str, listener: CollectionListener) -> Result<ListenerId> {
        if self.denying_listen.load(Ordering::SeqCst) {
            return Err(WaitlistError::RemoteSubscribe("permission denied".into()));
        }

        // Initial call included, per the live-query contract.
        listener(&self.snapshot_of(collection));

        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .write()
            .insert(id, (collection.to_string(), listener));
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.write().remove(&id);
    }
}
