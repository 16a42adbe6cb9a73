//! Local (single-device) waitlist persistence.

mod storage;
mod store;

pub use storage::{LocalStorage, StorageBus, StorageEvent, TabId};
pub use store::{LocalWaitlistStore, WAITLIST_KEY};
