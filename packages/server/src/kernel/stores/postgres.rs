//! PostgreSQL-backed stores. Queries live on the models; these adapters
//! translate rows-affected and constraint violations into `StoreError`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::auth::models::{IdentityEvent, IdentityEventKind, Profile};
use crate::kernel::{BaseEventStore, BaseProfileStore, StoreError};

pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseProfileStore for PostgresProfileStore {
    async fn create(&self, phone_number: &str, name: &str) -> Result<Profile, StoreError> {
        Profile::new(phone_number, name)
            .insert(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::Duplicate(phone_number.to_string())
                }
                other => StoreError::Database(other),
            })
    }

    async fn get(&self, phone_number: &str) -> Result<Option<Profile>, StoreError> {
        Ok(Profile::find_by_phone_number(phone_number, &self.pool).await?)
    }

    async fn set_verified(&self, phone_number: &str) -> Result<(), StoreError> {
        match Profile::mark_verified(phone_number, &self.pool).await? {
            0 => Err(StoreError::NotFound(phone_number.to_string())),
            _ => Ok(()),
        }
    }

    async fn update_pending_code(&self, phone_number: &str, otp: &str) -> Result<(), StoreError> {
        match Profile::set_pending_otp(phone_number, otp, &self.pool).await? {
            0 => Err(StoreError::NotFound(phone_number.to_string())),
            _ => Ok(()),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseEventStore for PostgresEventStore {
    async fn append(
        &self,
        phone_number: &str,
        kind: IdentityEventKind,
    ) -> Result<Uuid, StoreError> {
        let event = IdentityEvent::new(phone_number, kind)
            .insert(&self.pool)
            .await?;
        Ok(event.id)
    }

    async fn list(&self, phone_number: &str) -> Result<Vec<IdentityEvent>, StoreError> {
        Ok(IdentityEvent::find_by_phone_number(phone_number, &self.pool).await?)
    }
}
