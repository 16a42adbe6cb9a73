//! Key-value durable storage plus the cross-tab change signal.
//!
//! `LocalStorage` models the origin-scoped string store: one value file per
//! key under a directory. `StorageBus` models the platform's storage-change
//! notification, which fires in every tab *except* the one that performed
//! the write. Stores layer their own same-tab broadcast on top, so the bus
//! deliberately never echoes back to the writer.

use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one tab (one `LocalStorage` handle) on a bus.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

impl fmt::Debug for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TabId({})", self.0)
    }
}

/// A storage change as seen from another tab.
#[derive(Clone, Debug)]
pub struct StorageEvent {
    /// Key that was written.
    pub key: String,
}

type BusListener = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// Fan-out for storage changes across tabs of the same origin.
///
/// One listener slot per tab; attaching again replaces the previous bridge.
pub struct StorageBus {
    listeners: RwLock<HashMap<TabId, BusListener>>,
    next_tab: AtomicU64,
}

impl StorageBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: RwLock::new(HashMap::new()),
            next_tab: AtomicU64::new(1),
        })
    }

    /// Allocate an identity for a new tab.
    pub fn register_tab(&self) -> TabId {
        TabId(self.next_tab.fetch_add(1, Ordering::SeqCst))
    }

    /// Attach the change listener for a tab.
    pub fn attach(&self, tab: TabId, listener: BusListener) {
        self.listeners.write().insert(tab, listener);
    }

    /// Detach a tab's listener, if any.
    pub fn detach(&self, tab: TabId) {
        self.listeners.write().remove(&tab);
    }

    /// Deliver a change to every tab except the writer.
    pub fn publish(&self, origin: TabId, event: &StorageEvent) {
        let listeners = self.listeners.read();
        for (tab, listener) in listeners.iter() {
            if *tab != origin {
                listener(event);
            }
        }
    }
}

/// Durable string storage under a directory, one file per key.
pub struct LocalStorage {
    dir: PathBuf,
    /// Bus plus this handle's tab identity, when sharing an origin.
    shared: Option<(Arc<StorageBus>, TabId)>,
}

impl LocalStorage {
    /// Open storage with no cross-tab signal (single tab).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, shared: None })
    }

    /// Open storage attached to a shared origin bus.
    pub fn open_shared(dir: impl AsRef<Path>, bus: Arc<StorageBus>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let tab = bus.register_tab();
        Ok(Self {
            dir,
            shared: Some((bus, tab)),
        })
    }

    /// Read the value for a key. Absent keys are `None`, not an error.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the value for a key, then signal the other tabs.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.item_path(key), value)?;
        if let Some((bus, tab)) = &self.shared {
            bus.publish(*tab, &StorageEvent { key: key.to_string() });
        }
        Ok(())
    }

    /// Bus and tab identity, for stores bridging cross-tab signals into
    /// their own registry.
    pub(crate) fn shared(&self) -> Option<(&Arc<StorageBus>, TabId)> {
        self.shared.as_ref().map(|(bus, tab)| (bus, *tab))
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
