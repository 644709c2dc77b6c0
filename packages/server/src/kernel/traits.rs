// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Lifecycle rules (verify, login, logout) live in domains/auth/actions and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseProfileStore, BaseEventStore)

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::auth::models::{IdentityEvent, IdentityEventKind, Profile};

/// Errors surfaced by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("profile already exists for {0}")]
    Duplicate(String),

    #[error("profile not found for {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Profile Store Trait (Infrastructure - identity records + verification codes)
// =============================================================================

#[async_trait]
pub trait BaseProfileStore: Send + Sync {
    /// Create an unverified profile. Fails with `Duplicate` if the phone number is taken.
    async fn create(&self, phone_number: &str, name: &str) -> Result<Profile, StoreError>;

    async fn get(&self, phone_number: &str) -> Result<Option<Profile>, StoreError>;

    /// Flip the profile to verified. Fails with `NotFound` if absent.
    async fn set_verified(&self, phone_number: &str) -> Result<(), StoreError>;

    /// Overwrite the pending code. Fails with `NotFound` if absent.
    async fn update_pending_code(&self, phone_number: &str, otp: &str) -> Result<(), StoreError>;

    /// Cheap reachability probe for health checks
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// Event Store Trait (Infrastructure - login/logout audit trail)
// =============================================================================

#[async_trait]
pub trait BaseEventStore: Send + Sync {
    async fn append(
        &self,
        phone_number: &str,
        kind: IdentityEventKind,
    ) -> Result<Uuid, StoreError>;

    /// Events for one phone number, oldest first
    async fn list(&self, phone_number: &str) -> Result<Vec<IdentityEvent>, StoreError>;
}
