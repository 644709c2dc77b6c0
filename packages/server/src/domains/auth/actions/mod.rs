//! Identity lifecycle actions
//!
//! Each action is called directly from its RPC handler with the shared
//! `ServerDeps`. Per identity the record moves Unregistered → Unverified →
//! Verified (one-way), while presence independently toggles
//! LoggedOut ⇄ LoggedIn.

pub mod get_profile;
pub mod login;
pub mod logout;
pub mod signup;
pub mod verify;

pub use get_profile::get_profile;
pub use login::login;
pub use logout::{logout, LogoutResult};
pub use signup::signup;
pub use verify::verify;

use tracing::error;

use crate::domains::auth::models::IdentityEventKind;
use crate::kernel::ServerDeps;

/// Best-effort audit write. Failures are logged and never surface.
pub(crate) async fn record_identity_event(
    phone_number: &str,
    kind: IdentityEventKind,
    deps: &ServerDeps,
) {
    if let Err(e) = deps.events.append(phone_number, kind).await {
        error!(
            phone_number = %phone_number,
            event = %kind,
            error = %e,
            "failed to record identity event"
        );
    }
}
