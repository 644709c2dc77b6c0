//! Logged-in identity tracking.
//!
//! Presence is independent of token validity: a token that still verifies is
//! refused by session-scoped operations once its identity has logged out.
//! Entries live for the process lifetime only, so a restart forces every
//! client to log in again.

use std::collections::HashSet;
use std::sync::RwLock;

/// Concurrent set of identities that are currently logged in.
///
/// All three operations are linearizable with respect to each other.
pub trait PresenceCache: Send + Sync {
    fn contains(&self, phone_number: &str) -> bool;

    /// Idempotent.
    fn add(&self, phone_number: &str);

    /// Idempotent; removing an absent identity is not an error.
    fn remove(&self, phone_number: &str);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process presence cache
#[derive(Debug, Default)]
pub struct InMemoryPresenceCache {
    logged_in: RwLock<HashSet<String>>,
}

impl InMemoryPresenceCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresenceCache for InMemoryPresenceCache {
    fn contains(&self, phone_number: &str) -> bool {
        self.logged_in
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(phone_number)
    }

    fn add(&self, phone_number: &str) {
        self.logged_in
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(phone_number.to_string());
    }

    fn remove(&self, phone_number: &str) {
        self.logged_in
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(phone_number);
    }

    fn len(&self) -> usize {
        self.logged_in
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
