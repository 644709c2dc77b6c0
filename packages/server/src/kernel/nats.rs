//! NATS client abstraction for production and testing.
//!
//! Provides a trait-based NATS publisher that allows swapping between
//! real NATS connections and test mocks.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::RwLock;
use std::time::Duration;

/// A published message.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub subject: String,
    pub payload: Bytes,
}

/// Trait for NATS publish operations.
///
/// This allows swapping between real NATS and test mocks.
#[async_trait]
pub trait NatsPublisher: Send + Sync {
    /// Publish a message to a subject.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()>;
}

/// Real NATS client publisher.
pub struct NatsClientPublisher {
    client: async_nats::Client,
}

impl NatsClientPublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NatsPublisher for NatsClientPublisher {
    /// Returns once the server has the message, not when it is buffered locally.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()> {
        self.client.publish(subject, payload).await?;
        self.client.flush().await?;
        Ok(())
    }
}

/// How [`TestNats`] reacts to a publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishBehavior {
    /// Record the message and succeed.
    #[default]
    Record,
    /// Return an error without recording.
    Fail,
    /// Never complete (until the caller gives up).
    Stall,
}

/// Mock NATS client that tracks published messages for testing.
///
/// This allows tests to inspect what messages would have been published
/// to NATS without requiring a real connection.
#[derive(Default)]
pub struct TestNats {
    /// Messages published to subjects.
    published: RwLock<Vec<PublishedMessage>>,
    behavior: RwLock<PublishBehavior>,
}

impl TestNats {
    /// Create a new test NATS client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change how subsequent publishes behave.
    pub fn set_behavior(&self, behavior: PublishBehavior) {
        *self.behavior.write().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    /// Record a published message.
    pub fn record_publish(&self, subject: String, payload: Bytes) {
        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(PublishedMessage { subject, payload });
    }

    /// Get all published messages.
    pub fn published_messages(&self) -> Vec<PublishedMessage> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Get published messages for a specific subject.
    pub fn messages_for_subject(&self, subject: &str) -> Vec<PublishedMessage> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| m.subject == subject)
            .cloned()
            .collect()
    }

    /// Get the count of published messages.
    pub fn publish_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Clear all recorded messages.
    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl NatsPublisher for TestNats {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()> {
        let behavior = *self.behavior.read().unwrap_or_else(|e| e.into_inner());
        match behavior {
            PublishBehavior::Record => {
                self.record_publish(subject, payload);
                Ok(())
            }
            PublishBehavior::Fail => Err(anyhow::anyhow!("nats connection refused")),
            PublishBehavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow::anyhow!("nats publish stalled"))
            }
        }
    }
}
