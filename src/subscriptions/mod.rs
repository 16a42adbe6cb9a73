//! Observer registries for live snapshot updates.

mod registry;

pub use registry::{SubscriberId, SubscriberRegistry, Unsubscribe};
