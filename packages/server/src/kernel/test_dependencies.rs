// TestDependencies - in-memory implementations for testing
//
// Bundles the memory stores, the recording NATS mock and a fixed clock, and
// turns them into a ServerDeps while keeping handles for assertions.

use chrono::Duration;
use std::sync::Arc;

use super::{
    MemoryEventStore, MemoryProfileStore, OtpIssuedListener, OtpRequester, ServerDeps, TestNats,
};
use crate::common::FixedClock;
use crate::domains::auth::{InMemoryPresenceCache, JwtService};

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";
pub const TEST_OTP_REQUEST_SUBJECT: &str = "verification.SendOTP.newaccount";

pub struct TestDependencies {
    pub profiles: Arc<MemoryProfileStore>,
    pub events: Arc<MemoryEventStore>,
    pub nats: Arc<TestNats>,
    pub clock: Arc<FixedClock>,
    pub presence: Arc<InMemoryPresenceCache>,
    pub token_ttl: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(MemoryProfileStore::new()),
            events: Arc::new(MemoryEventStore::new()),
            nats: Arc::new(TestNats::new()),
            clock: Arc::new(FixedClock::default()),
            presence: Arc::new(InMemoryPresenceCache::new()),
            token_ttl: Duration::minutes(2),
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn jwt_service(&self) -> JwtService {
        JwtService::with_clock(
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER.to_string(),
            self.token_ttl,
            self.clock.clone(),
        )
    }

    /// Listener wired to the same profile store the deps use
    pub fn otp_listener(&self) -> OtpIssuedListener {
        OtpIssuedListener::new(self.profiles.clone())
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.profiles.clone(),
            self.events.clone(),
            Arc::new(OtpRequester::new(
                self.nats.clone(),
                TEST_OTP_REQUEST_SUBJECT,
            )),
            Arc::new(self.jwt_service()),
            self.presence.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
