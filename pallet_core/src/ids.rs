//! Identifier generation.
//!
//! Generators are owned by whoever creates records (usually a
//! [`QuoteSession`](crate::session::QuoteSession)) and passed in explicitly,
//! so two sessions never share a counter.

use uuid::Uuid;

/// Source of unique record identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;

    /// Note an id that already exists so it is never handed out again.
    fn observe(&mut self, _existing_id: &str) {}
}

/// Monotonic `prefix-N` identifiers, starting at 1.
///
/// ```rust
/// use pallet_core::ids::{IdGenerator, SequentialIds};
///
/// let mut ids = SequentialIds::new("pallet");
/// assert_eq!(ids.next_id(), "pallet-1");
/// assert_eq!(ids.next_id(), "pallet-2");
/// ```
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continue numbering after ids that already exist (e.g. a restored draft).
    pub fn resume_after<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        for id in existing {
            self.observe(id);
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    fn observe(&mut self, existing_id: &str) {
        let number = existing_id
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok());
        if let Some(number) = number {
            self.next = self.next.max(number + 1);
        }
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
