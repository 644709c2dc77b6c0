//! Signup action

use tracing::{error, info};

use crate::common::AuthError;
use crate::domains::auth::is_valid_phone_number;
use crate::domains::auth::models::Profile;
use crate::kernel::{ServerDeps, StoreError};

/// Register a phone number and ask the broker for an OTP.
///
/// The OTP request is best-effort: a publish failure is logged and signup
/// still succeeds, so success does not guarantee a code will arrive.
pub async fn signup(phone_number: &str, name: &str, deps: &ServerDeps) -> Result<Profile, AuthError> {
    if !is_valid_phone_number(phone_number) {
        return Err(AuthError::InvalidPhoneNumber);
    }

    let profile = deps
        .profiles
        .create(phone_number, name)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AuthError::ProfileCreationFailed,
            other => AuthError::Store(other),
        })?;

    info!(phone_number = %phone_number, profile_id = %profile.id, "profile created");

    if let Err(e) = deps.otp_requester.request(phone_number).await {
        error!(phone_number = %phone_number, error = %e, "failed to request OTP");
    }

    Ok(profile)
}
