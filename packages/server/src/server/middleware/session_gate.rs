use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::common::AuthError;
use crate::domains::auth::{JwtService, PresenceCache};

/// Header a caller might use to smuggle an identity past the gate.
pub const IDENTITY_HEADER: HeaderName = HeaderName::from_static("x-phone-number");

/// Identity resolved by the gate for the current call.
///
/// Only the gate inserts this; any value arriving with the request is removed first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionIdentity(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityAttachment {
    /// Attach whenever the credential verifies.
    Always,
    /// Attach only while the identity is logged in.
    IfPresent,
}

#[derive(Clone, Copy, Debug)]
pub struct GatePolicy {
    pub rpc: &'static str,
    pub attach: IdentityAttachment,
}

pub const PROTECTED_RPCS: &[GatePolicy] = &[
    GatePolicy {
        rpc: "GetProfile",
        attach: IdentityAttachment::Always,
    },
    GatePolicy {
        rpc: "Logout",
        attach: IdentityAttachment::IfPresent,
    },
];

pub fn policy_for(rpc: &str) -> Option<&'static GatePolicy> {
    PROTECTED_RPCS.iter().find(|policy| policy.rpc == rpc)
}

/// Operation name of an RPC path, e.g. `/auth.v1.AuthService/Logout` → `Logout`.
pub fn rpc_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Pull the token out of a `"<scheme> <token>"` authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() < 2 {
        return Err(AuthError::InvalidToken);
    }
    if parts[1].is_empty() {
        return Err(AuthError::TokenMissing);
    }
    Ok(parts[1])
}

#[derive(Clone)]
pub struct SessionGate {
    jwt_service: Arc<JwtService>,
    presence: Arc<dyn PresenceCache>,
}

impl SessionGate {
    pub fn new(jwt_service: Arc<JwtService>, presence: Arc<dyn PresenceCache>) -> Self {
        Self {
            jwt_service,
            presence,
        }
    }

    /// Decide what identity, if any, travels with a call to `rpc`.
    ///
    /// Public operations pass with `Ok(None)` and their headers are never read.
    pub fn resolve(&self, rpc: &str, headers: &HeaderMap) -> Result<Option<String>, AuthError> {
        let Some(policy) = policy_for(rpc) else {
            return Ok(None);
        };

        let token = bearer_token(headers)?;
        let phone_number = self.jwt_service.verify(token)?;

        match policy.attach {
            IdentityAttachment::Always => Ok(Some(phone_number)),
            IdentityAttachment::IfPresent if self.presence.contains(&phone_number) => {
                Ok(Some(phone_number))
            }
            IdentityAttachment::IfPresent => {
                debug!(rpc = %rpc, "credential valid but identity not logged in");
                Ok(None)
            }
        }
    }
}

/// Session gate middleware
///
/// Runs before every RPC handler. Protected operations need a verifiable
/// bearer credential; the resolved identity is handed on as a
/// `SessionIdentity` extension.
pub async fn session_gate_middleware(
    gate: SessionGate,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    request.headers_mut().remove(&IDENTITY_HEADER);
    request.extensions_mut().remove::<SessionIdentity>();

    let rpc = rpc_name(request.uri().path()).to_string();
    match gate.resolve(&rpc, request.headers()) {
        Ok(Some(phone_number)) => {
            request
                .extensions_mut()
                .insert(SessionIdentity(phone_number));
        }
        Ok(None) => {}
        Err(e) => {
            debug!(rpc = %rpc, error = %e, "rejected at session gate");
            return e.into_response();
        }
    }

    next.run(request).await
}
