//! Remote (hosted, multi-client) waitlist persistence.

mod backend;
mod store;

pub use backend::{
    CollectionListener, CollectionSnapshot, DocumentBackend, InMemoryBackend, ListenerId,
    WAITLIST_COLLECTION,
};
pub use store::RemoteWaitlistStore;
