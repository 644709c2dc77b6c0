//! Server dependencies for the identity lifecycle (using traits for testability)
//!
//! This module provides the central dependency container used by the auth actions,
//! the session gate and the RPC routes. External services sit behind traits.

use std::sync::Arc;

use crate::domains::auth::{JwtService, PresenceCache};
use crate::kernel::{BaseEventStore, BaseProfileStore, OtpRequester};

/// Server dependencies accessible to actions and handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub profiles: Arc<dyn BaseProfileStore>,
    /// Audit trail; writes are best-effort
    pub events: Arc<dyn BaseEventStore>,
    pub otp_requester: Arc<OtpRequester>,
    /// Session token codec
    pub jwt_service: Arc<JwtService>,
    /// Identities currently logged in. The only in-process mutable shared state.
    pub presence: Arc<dyn PresenceCache>,
}

impl ServerDeps {
    pub fn new(
        profiles: Arc<dyn BaseProfileStore>,
        events: Arc<dyn BaseEventStore>,
        otp_requester: Arc<OtpRequester>,
        jwt_service: Arc<JwtService>,
        presence: Arc<dyn PresenceCache>,
    ) -> Self {
        Self {
            profiles,
            events,
            otp_requester,
            jwt_service,
            presence,
        }
    }
}
