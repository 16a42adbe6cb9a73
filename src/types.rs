//! Core types for the waitlist stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since Unix epoch.
///
/// Millisecond precision because the persisted entry blob stores the join
/// instant as a JS-style epoch-millis number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_millis() as i64)
    }

    /// Milliseconds from `self` until `other` (negative when `other` is in
    /// the past).
    pub fn millis_until(self, other: Timestamp) -> i64 {
        other.0 - self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// One waitlist signup: an email and the instant it joined.
///
/// Entries are created on submission and never mutated or deleted. The serde
/// shape (`{"email": ..., "at": ...}`) is the persisted storage format, so
/// the field rename is load-bearing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub email: String,

    /// When the entry was created.
    #[serde(rename = "at")]
    pub joined_at: Timestamp,
}

impl WaitlistEntry {
    /// Create an entry joined now.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            joined_at: Timestamp::now(),
        }
    }
}

/// Derived view of a store at a point in time: a count plus the entries it
/// was derived from.
///
/// `count == entries.len()` whenever the list is available. A remote backend
/// may expose collection size without the documents, in which case `entries`
/// is empty and `count` alone is authoritative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistSnapshot {
    pub count: usize,
    pub entries: Vec<WaitlistEntry>,
}

impl WaitlistSnapshot {
    /// The zero-entries snapshot, also the degraded fallback for unreadable
    /// or corrupted storage.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot derived from a full entry list.
    pub fn from_entries(entries: Vec<WaitlistEntry>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }

    /// Count-only snapshot (no entry list available).
    pub fn count_only(count: usize) -> Self {
        Self {
            count,
            entries: Vec::new(),
        }
    }

    /// Emails in entry order.
    pub fn emails(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.email.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_shape() {
        let entry = WaitlistEntry {
            email: "a@b.co".into(),
            joined_at: Timestamp(1700000000000),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["at"], 1700000000000i64);

        let back: WaitlistEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_snapshot_from_entries() {
        let snap = WaitlistSnapshot::from_entries(vec![
            WaitlistEntry::new("a@b.co"),
            WaitlistEntry::new("c@d.org"),
        ]);
        assert_eq!(snap.count, 2);
        assert_eq!(snap.emails(), vec!["a@b.co", "c@d.org"]);
    }

    #[test]
    fn test_count_only_snapshot() {
        let snap = WaitlistSnapshot::count_only(7);
        assert_eq!(snap.count, 7);
        assert!(snap.entries.is_empty());
    }

    #[test]
    fn test_millis_until() {
        let a = Timestamp(1000);
        let b = Timestamp(4000);
        assert_eq!(a.millis_until(b), 3000);
        assert_eq!(b.millis_until(a), -3000);
    }
}
