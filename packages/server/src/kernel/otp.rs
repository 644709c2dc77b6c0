//! OTP handshake over the message broker.
//!
//! Two independent flows:
//!
//! ```text
//! signup ──► OtpRequester ──publish(phone)──► OTP_REQUEST_SUBJECT ──► OTP issuer
//!
//! OTP issuer ──{phone_number, otp}──► OTP_ISSUED_SUBJECT ──► OtpIssuedListener ──► profile store
//! ```
//!
//! Nothing orders the two: a client may try to verify before its code has
//! arrived, in which case verification fails with an incorrect-code error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::kernel::{BaseProfileStore, NatsPublisher};

/// Upper bound on handing one OTP request to the broker.
pub const OTP_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Request flow
// =============================================================================

/// Publishes "verification requested" messages for newly registered phone numbers.
pub struct OtpRequester {
    publisher: Arc<dyn NatsPublisher>,
    subject: String,
    timeout: Duration,
}

impl OtpRequester {
    pub fn new(publisher: Arc<dyn NatsPublisher>, subject: impl Into<String>) -> Self {
        Self::with_timeout(publisher, subject, OTP_PUBLISH_TIMEOUT)
    }

    pub fn with_timeout(
        publisher: Arc<dyn NatsPublisher>,
        subject: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            publisher,
            subject: subject.into(),
            timeout,
        }
    }

    /// Hand an OTP request to the broker.
    ///
    /// The payload is the raw phone number. Errors (including the publish
    /// timing out) are returned for the caller to log; they are never fatal.
    pub async fn request(&self, phone_number: &str) -> Result<()> {
        let payload = Bytes::copy_from_slice(phone_number.as_bytes());

        tokio::time::timeout(
            self.timeout,
            self.publisher.publish(self.subject.clone(), payload),
        )
        .await
        .with_context(|| format!("OTP request publish timed out after {:?}", self.timeout))?
        .context("failed to publish OTP request")?;

        debug!(phone_number = %phone_number, subject = %self.subject, "OTP requested");
        Ok(())
    }
}

// =============================================================================
// Fulfillment flow
// =============================================================================

/// "Code issued" payload delivered by the OTP issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpIssued {
    pub phone_number: String,
    pub otp: String,
}

#[derive(Error, Debug)]
pub enum OtpPayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload has an empty {0}")]
    EmptyField(&'static str),
}

impl OtpIssued {
    pub fn parse(payload: &[u8]) -> Result<Self, OtpPayloadError> {
        let issued: OtpIssued = serde_json::from_slice(payload)?;
        if issued.phone_number.trim().is_empty() {
            return Err(OtpPayloadError::EmptyField("phone_number"));
        }
        if issued.otp.trim().is_empty() {
            return Err(OtpPayloadError::EmptyField("otp"));
        }
        Ok(issued)
    }
}

/// Bytes of a rejected payload worth logging.
const LOGGED_PAYLOAD_PREFIX: usize = 16;

fn payload_prefix(payload: &[u8]) -> String {
    let end = payload.len().min(LOGGED_PAYLOAD_PREFIX);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

/// What happened to a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Applied,
    Malformed,
    StoreFailed,
}

/// Long-running consumer that writes issued codes into the profile store.
pub struct OtpIssuedListener {
    profiles: Arc<dyn BaseProfileStore>,
}

impl OtpIssuedListener {
    pub fn new(profiles: Arc<dyn BaseProfileStore>) -> Self {
        Self { profiles }
    }

    /// Queue-subscribe to the fulfillment subject on a live NATS connection.
    pub async fn subscribe(
        client: &async_nats::Client,
        subject: &str,
        queue_group: &str,
    ) -> Result<impl Stream<Item = Bytes> + Send + 'static> {
        let subscriber = client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .with_context(|| format!("failed to subscribe to {}", subject))?;

        info!(subject = %subject, queue_group = %queue_group, "subscribed to issued OTPs");
        Ok(subscriber.map(|message| message.payload))
    }

    /// Consume deliveries until `shutdown` fires or the stream ends.
    ///
    /// Cancellation is only observed between messages; a delivery that has
    /// started is always finished. Per-message failures are logged and
    /// never stop the loop.
    pub async fn run<S>(&self, messages: S, shutdown: CancellationToken)
    where
        S: Stream<Item = Bytes> + Send,
    {
        tokio::pin!(messages);
        info!("OTP fulfillment listener starting");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("OTP fulfillment listener shutting down");
                    break;
                }
                next = messages.next() => match next {
                    Some(payload) => {
                        self.handle(&payload).await;
                    }
                    None => {
                        warn!("OTP fulfillment subscription closed");
                        break;
                    }
                }
            }
        }

        info!("OTP fulfillment listener stopped");
    }

    /// Apply one delivery. Redelivery of the same code is a harmless overwrite.
    pub async fn handle(&self, payload: &[u8]) -> DeliveryOutcome {
        let issued = match OtpIssued::parse(payload) {
            Ok(issued) => issued,
            Err(e) => {
                warn!(
                    error = %e,
                    payload_len = payload.len(),
                    payload_prefix = %payload_prefix(payload),
                    "dropping malformed OTP issued message"
                );
                return DeliveryOutcome::Malformed;
            }
        };

        info!(phone_number = %issued.phone_number, "OTP issued event received");

        match self
            .profiles
            .update_pending_code(&issued.phone_number, &issued.otp)
            .await
        {
            Ok(()) => DeliveryOutcome::Applied,
            Err(e) => {
                error!(
                    phone_number = %issued.phone_number,
                    error = %e,
                    "failed to store issued OTP"
                );
                DeliveryOutcome::StoreFailed
            }
        }
    }
}
