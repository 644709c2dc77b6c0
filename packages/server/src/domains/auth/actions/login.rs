//! Login action

use tracing::info;

use crate::common::AuthError;
use crate::domains::auth::actions::record_identity_event;
use crate::domains::auth::models::IdentityEventKind;
use crate::kernel::ServerDeps;

/// Issue a session token for a verified profile.
///
/// Re-authentication reuses the most recently issued OTP; there is no
/// separate password.
pub async fn login(phone_number: &str, otp: &str, deps: &ServerDeps) -> Result<String, AuthError> {
    let profile = deps
        .profiles
        .get(phone_number)
        .await?
        .ok_or(AuthError::ProfileNotFound)?;

    if !profile.is_verified {
        return Err(AuthError::NotVerified);
    }

    if !profile.otp_matches(otp) {
        return Err(AuthError::IncorrectOtp);
    }

    let token = deps.jwt_service.create_token(phone_number)?;

    deps.presence.add(phone_number);
    record_identity_event(phone_number, IdentityEventKind::ProfileLogin, deps).await;

    info!(phone_number = %phone_number, "logged in");
    Ok(token)
}
