//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod nats;
pub mod otp;
pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use nats::{NatsClientPublisher, NatsPublisher, PublishBehavior, PublishedMessage, TestNats};
pub use otp::{DeliveryOutcome, OtpIssued, OtpIssuedListener, OtpRequester, OTP_PUBLISH_TIMEOUT};
pub use stores::{MemoryEventStore, MemoryProfileStore, PostgresEventStore, PostgresProfileStore};
pub use test_dependencies::{
    TestDependencies, TEST_JWT_ISSUER, TEST_JWT_SECRET, TEST_OTP_REQUEST_SUBJECT,
};
pub use traits::*;
