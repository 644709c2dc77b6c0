use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Token lifetime used when `TOKEN_EXPIRY_IN_MINUTES` is missing or unusable.
pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 2;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub nats_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_expiry_minutes: i64,
    pub otp_request_subject: String,
    pub otp_issued_subject: String,
    pub otp_issued_queue_group: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            nats_url: env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "auth-service".to_string()),
            token_expiry_minutes: parse_token_expiry(env::var("TOKEN_EXPIRY_IN_MINUTES").ok()),
            otp_request_subject: env::var("OTP_REQUEST_SUBJECT")
                .unwrap_or_else(|_| "verification.SendOTP.newaccount".to_string()),
            otp_issued_subject: env::var("OTP_ISSUED_SUBJECT")
                .unwrap_or_else(|_| "otps_created".to_string()),
            otp_issued_queue_group: env::var("OTP_ISSUED_QUEUE_GROUP")
                .unwrap_or_else(|_| "auth-service".to_string()),
        })
    }
}

/// Absent, non-numeric and non-positive values all fall back to the default.
fn parse_token_expiry(raw: Option<String>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_TOKEN_EXPIRY_MINUTES)
}
