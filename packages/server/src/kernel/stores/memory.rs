//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use crate::domains::auth::models::{IdentityEvent, IdentityEventKind, Profile};
use crate::kernel::{BaseEventStore, BaseProfileStore, StoreError};

/// In-memory profile storage keyed by phone number.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored profiles.
    pub fn profile_count(&self) -> usize {
        self.profiles.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl BaseProfileStore for MemoryProfileStore {
    async fn create(&self, phone_number: &str, name: &str) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        if profiles.contains_key(phone_number) {
            return Err(StoreError::Duplicate(phone_number.to_string()));
        }
        let profile = Profile::new(phone_number, name);
        profiles.insert(phone_number.to_string(), profile.clone());
        Ok(profile)
    }

    async fn get(&self, phone_number: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().unwrap_or_else(|e| e.into_inner()).get(phone_number).cloned())
    }

    async fn set_verified(&self, phone_number: &str) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        let profile = profiles
            .get_mut(phone_number)
            .ok_or_else(|| StoreError::NotFound(phone_number.to_string()))?;
        profile.is_verified = true;
        Ok(())
    }

    async fn update_pending_code(&self, phone_number: &str, otp: &str) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        let profile = profiles
            .get_mut(phone_number)
            .ok_or_else(|| StoreError::NotFound(phone_number.to_string()))?;
        profile.otp = Some(otp.to_string());
        Ok(())
    }
}

/// In-memory audit trail.
///
/// `set_fail_appends(true)` makes every append fail, for exercising the
/// best-effort paths.
#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<IdentityEvent>>,
    fail_appends: AtomicBool,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Get the number of stored events.
    pub fn event_count(&self) -> usize {
        self.events.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl BaseEventStore for MemoryEventStore {
    async fn append(
        &self,
        phone_number: &str,
        kind: IdentityEventKind,
    ) -> Result<Uuid, StoreError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        let event = IdentityEvent::new(phone_number, kind);
        let id = event.id;
        self.events.write().unwrap_or_else(|e| e.into_inner()).push(event);
        Ok(id)
    }

    async fn list(&self, phone_number: &str) -> Result<Vec<IdentityEvent>, StoreError> {
        Ok(self
            .events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.phone_number == phone_number)
            .cloned()
            .collect())
    }
}
