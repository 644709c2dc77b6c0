//! Get profile action

use crate::common::AuthError;
use crate::domains::auth::models::Profile;
use crate::kernel::ServerDeps;

/// Return the profile of the session's identity.
///
/// `session_identity` is what the session gate resolved from the token. A
/// token whose identity has since logged out is refused with `InvalidSession`.
pub async fn get_profile(
    session_identity: Option<&str>,
    deps: &ServerDeps,
) -> Result<Profile, AuthError> {
    let phone_number = session_identity
        .filter(|phone_number| deps.presence.contains(phone_number))
        .ok_or(AuthError::InvalidSession)?;

    deps.profiles
        .get(phone_number)
        .await?
        .ok_or(AuthError::ProfileNotFound)
}
