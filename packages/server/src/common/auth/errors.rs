use thiserror::Error;

use crate::kernel::StoreError;

/// Status classes surfaced on the RPC boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    Internal,
}

impl RpcCode {
    /// Wire name used in the Connect error envelope.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcCode::Unauthenticated => "unauthenticated",
            RpcCode::InvalidArgument => "invalid_argument",
            RpcCode::NotFound => "not_found",
            RpcCode::Internal => "internal",
        }
    }

    pub fn http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            RpcCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::NotFound => StatusCode::NOT_FOUND,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Authentication and identity lifecycle errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, malformed, expired or wrongly signed credential.
    #[error("invalid token provided")]
    InvalidToken,

    #[error("no token provided")]
    TokenMissing,

    /// Credential is valid but the identity is no longer logged in.
    #[error("token is invalid or user logged out")]
    InvalidSession,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("failed to create profile")]
    ProfileCreationFailed,

    #[error("failed to find profile")]
    ProfileNotFound,

    #[error("this phone number is already verified")]
    AlreadyVerified,

    #[error("this phone number is not verified yet")]
    NotVerified,

    #[error("otp provided is incorrect")]
    IncorrectOtp,

    #[error("failed to generate session token")]
    TokenGenerationFailed,

    /// Request body could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn code(&self) -> RpcCode {
        match self {
            AuthError::InvalidToken | AuthError::TokenMissing | AuthError::InvalidSession => {
                RpcCode::Unauthenticated
            }
            AuthError::InvalidPhoneNumber
            | AuthError::MalformedRequest(_)
            | AuthError::ProfileCreationFailed
            | AuthError::AlreadyVerified
            | AuthError::IncorrectOtp => RpcCode::InvalidArgument,
            AuthError::ProfileNotFound => RpcCode::NotFound,
            AuthError::NotVerified | AuthError::TokenGenerationFailed | AuthError::Store(_) => {
                RpcCode::Internal
            }
        }
    }

    /// Message safe to return to callers. Store failures are reported
    /// generically so backend details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Store(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}
