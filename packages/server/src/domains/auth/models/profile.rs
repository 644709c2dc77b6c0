use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Profile - one registered phone number and its verification state
///
/// `otp` holds the most recently issued code. It is `None` until the OTP
/// issuer has delivered one, and a missing code never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub otp: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// New unverified profile with no pending code
    pub fn new(phone_number: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            otp: None,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    /// True when `code` equals the pending code.
    pub fn otp_matches(&self, code: &str) -> bool {
        self.otp.as_deref() == Some(code)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Profile {
    /// Find profile by phone number
    pub async fn find_by_phone_number(
        phone_number: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(pool)
            .await
    }

    /// Insert new profile
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, name, phone_number, otp, is_verified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.phone_number)
        .bind(&self.otp)
        .bind(self.is_verified)
        .fetch_one(pool)
        .await
    }

    /// Mark a profile verified. Returns the number of rows touched.
    pub async fn mark_verified(phone_number: &str, pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET is_verified = true WHERE phone_number = $1")
            .bind(phone_number)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Overwrite the pending code. Returns the number of rows touched.
    pub async fn set_pending_otp(
        phone_number: &str,
        otp: &str,
        pool: &PgPool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET otp = $2 WHERE phone_number = $1")
            .bind(phone_number)
            .bind(otp)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
