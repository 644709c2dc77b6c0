use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "identity_event_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityEventKind {
    ProfileLogin,
    ProfileLogout,
}

impl IdentityEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityEventKind::ProfileLogin => "PROFILE_LOGIN",
            IdentityEventKind::ProfileLogout => "PROFILE_LOGOUT",
        }
    }
}

impl std::fmt::Display for IdentityEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit record of a login or logout
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IdentityEvent {
    pub id: Uuid,
    pub phone_number: String,
    pub event_type: IdentityEventKind,
    pub created_at: DateTime<Utc>,
}

impl IdentityEvent {
    pub fn new(phone_number: &str, event_type: IdentityEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.to_string(),
            event_type,
            created_at: Utc::now(),
        }
    }

    /// Insert event
    pub async fn insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, IdentityEvent>(
            r#"
            INSERT INTO identity_events (id, phone_number, event_type)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.phone_number)
        .bind(self.event_type)
        .fetch_one(pool)
        .await
    }

    /// All events for a phone number, oldest first
    pub async fn find_by_phone_number(
        phone_number: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, IdentityEvent>(
            "SELECT * FROM identity_events WHERE phone_number = $1 ORDER BY created_at ASC",
        )
        .bind(phone_number)
        .fetch_all(pool)
        .await
    }
}
