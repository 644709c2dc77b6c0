//! Logout action

use tracing::info;

use crate::domains::auth::actions::record_identity_event;
use crate::domains::auth::models::IdentityEventKind;
use crate::kernel::ServerDeps;

pub const ALREADY_LOGGED_OUT_MESSAGE: &str = "user is already logged out, invalid token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutResult {
    LoggedOut { phone_number: String },
    AlreadyLoggedOut,
}

impl LogoutResult {
    pub fn message(&self) -> String {
        match self {
            LogoutResult::LoggedOut { phone_number } => format!(
                "user with phone number: {} logged out successfully.",
                phone_number
            ),
            LogoutResult::AlreadyLoggedOut => ALREADY_LOGGED_OUT_MESSAGE.to_string(),
        }
    }
}

/// End the session for the gate-resolved identity. Never fails.
///
/// The gate only attaches an identity that is currently logged in, so `None`
/// covers both a stale token and a second logout.
pub async fn logout(session_identity: Option<&str>, deps: &ServerDeps) -> LogoutResult {
    let Some(phone_number) = session_identity else {
        return LogoutResult::AlreadyLoggedOut;
    };

    deps.presence.remove(phone_number);
    record_identity_event(phone_number, IdentityEventKind::ProfileLogout, deps).await;

    info!(phone_number = %phone_number, "logged out");
    LogoutResult::LoggedOut {
        phone_number: phone_number.to_string(),
    }
}
