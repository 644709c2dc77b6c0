//! Verify action

use tracing::info;

use crate::common::AuthError;
use crate::kernel::ServerDeps;

/// Match the supplied code against the pending one and mark the profile verified.
///
/// The read-compare-write is not locked here; concurrent verifies for the
/// same phone number rely on the store's own consistency.
pub async fn verify(phone_number: &str, otp: &str, deps: &ServerDeps) -> Result<bool, AuthError> {
    let profile = deps
        .profiles
        .get(phone_number)
        .await?
        .ok_or(AuthError::ProfileNotFound)?;

    if profile.is_verified {
        return Err(AuthError::AlreadyVerified);
    }

    if !profile.otp_matches(otp) {
        return Err(AuthError::IncorrectOtp);
    }

    deps.profiles.set_verified(phone_number).await?;

    info!(phone_number = %phone_number, "phone number verified");
    Ok(true)
}
