use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::common::{AuthError, Clock, SystemClock};

/// Only algorithm accepted when issuing and verifying session tokens.
const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,          // Subject (phone number)
    pub phone_number: String, // Identity the session is bound to
    pub exp: i64,             // Expiration timestamp
    pub iat: i64,             // Issued at timestamp
    pub iss: String,          // Issuer
}

/// JWT Service - creates and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// Create new JWT service with secret, issuer and default token lifetime
    pub fn new(secret: &str, issuer: String, token_ttl: Duration) -> Self {
        Self::with_clock(secret, issuer, token_ttl, Arc::new(SystemClock))
    }

    /// Same as [`JwtService::new`] but reading time from `clock`.
    pub fn with_clock(
        secret: &str,
        issuer: String,
        token_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_ttl,
            clock,
        }
    }

    /// Create a session token for a phone number using the configured lifetime
    pub fn create_token(&self, phone_number: &str) -> Result<String, AuthError> {
        self.create_token_with_ttl(phone_number, self.token_ttl)
    }

    /// Create a session token that expires `ttl` from now
    pub fn create_token_with_ttl(
        &self,
        phone_number: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = self.clock.now();
        let exp = now + ttl;

        let claims = Claims {
            sub: phone_number.to_string(),
            phone_number: phone_number.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(SESSION_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign session token");
            AuthError::TokenGenerationFailed
        })
    }

    /// Verify and decode a JWT token
    ///
    /// A token is accepted only when it is HS256-signed with our secret, carries
    /// our issuer, and the current time is strictly before `exp`. Every failure
    /// is reported as `InvalidToken`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is compared against the injected clock below.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "session token rejected");
                AuthError::InvalidToken
            })?;

        if self.clock.now().timestamp() >= claims.exp {
            debug!(phone_number = %claims.phone_number, "session token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Verify a token and return the identity it was issued for
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_token(token).map(|claims| claims.phone_number)
    }
}
