//! # Waitlist Store
//!
//! Dual-mode waitlist capture: a hosted document backend when configured, a
//! device-local fallback always, with live snapshot subscriptions keeping
//! every page consistent with whichever store is authoritative.
//!
//! ## Core Concepts
//!
//! - **Entries**: one email plus its join instant, never mutated or deleted
//! - **Snapshots**: derived count + ordered entries, recomputed per change
//! - **Mode**: remote-enabled iff the minimal credentials are present,
//!   decided once at startup
//! - **Two-phase write**: local must succeed, remote is best-effort
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use waitlist_store::{
//!     AppConfig, LocalStorage, LocalWaitlistStore, SubmissionFlow,
//! };
//!
//! let config = Arc::new(AppConfig::from_env());
//! let local = LocalWaitlistStore::open(LocalStorage::open(&config.storage_dir)?);
//!
//! let mut flow = SubmissionFlow::new();
//! let outcome = flow.submit("someone@example.com", &config, &local, None)?;
//! ```

pub mod config;
pub mod countdown;
pub mod error;
pub mod local;
pub mod remote;
pub mod subscriptions;
pub mod types;
pub mod view;

// Re-exports
pub use config::{AppConfig, RemoteConfig};
pub use countdown::{launch_at, Countdown, LAUNCH_OFFSET_MS};
pub use error::{Result, WaitlistError};
pub use local::{LocalStorage, LocalWaitlistStore, StorageBus, StorageEvent, TabId, WAITLIST_KEY};
pub use remote::{
    CollectionSnapshot, DocumentBackend, InMemoryBackend, ListenerId, RemoteWaitlistStore,
    WAITLIST_COLLECTION,
};
pub use subscriptions::{SubscriberId, SubscriberRegistry, Unsubscribe};
pub use types::{Timestamp, WaitlistEntry, WaitlistSnapshot};
pub use view::{
    is_valid_email, AdminDashboard, AdminGate, Navigation, PageState, PageViewModel, Route,
    Submission, SubmissionFlow, SubmitState, LOGIN_ERROR, RETRY_ADVISORY, STATUS_JOINED,
    STATUS_SAVED, VALIDATION_MESSAGE,
};
