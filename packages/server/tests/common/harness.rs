//! In-memory test harness.
//!
//! Every test gets fresh stores, a recording NATS mock, a fixed clock and its
//! own presence cache, wired into the real router.

use auth_core::domains::auth::PresenceCache;
use auth_core::kernel::{BaseProfileStore, ServerDeps, TestDependencies};
use auth_core::server::build_app;
use serde_json::json;
use test_context::AsyncTestContext;

use super::{init_tracing, RpcClient};

pub const TEST_PHONE: &str = "+15551230000";
pub const TEST_NAME: &str = "Al";
pub const TEST_OTP: &str = "482913";

pub struct TestHarness {
    pub deps: TestDependencies,
    pub server_deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_deps(TestDependencies::new())
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        init_tracing();
        let server_deps = deps.server_deps();
        Self { deps, server_deps }
    }

    pub fn rpc(&self) -> RpcClient {
        RpcClient::new(build_app(self.server_deps.clone()))
    }

    pub fn is_logged_in(&self, phone_number: &str) -> bool {
        self.deps.presence.contains(phone_number)
    }

    /// Simulate the OTP service delivering `otp` for `phone_number`.
    pub async fn deliver_otp(&self, phone_number: &str, otp: &str) {
        let payload = json!({ "phone_number": phone_number, "otp": otp }).to_string();
        self.deps.otp_listener().handle(payload.as_bytes()).await;
    }

    pub async fn pending_otp(&self, phone_number: &str) -> Option<String> {
        self.deps
            .profiles
            .get(phone_number)
            .await
            .expect("memory store never fails")
            .and_then(|profile| profile.otp)
    }

    /// Signup, deliver a code and verify, leaving the identity ready to log in.
    pub async fn verified_identity(&self, rpc: &RpcClient, phone_number: &str) {
        let signup = rpc
            .call(
                "SignupWithPhoneNumber",
                json!({ "phoneNumber": phone_number, "name": TEST_NAME }),
            )
            .await;
        assert!(signup.status.is_success(), "signup failed: {}", signup.body);

        self.deliver_otp(phone_number, TEST_OTP).await;

        let verify = rpc
            .call(
                "VerifyPhoneNumber",
                json!({ "phoneNumber": phone_number, "otp": TEST_OTP }),
            )
            .await;
        assert!(verify.status.is_success(), "verify failed: {}", verify.body);
    }

    /// Log in and return the session token.
    pub async fn login(&self, rpc: &RpcClient, phone_number: &str) -> String {
        let login = rpc
            .call(
                "LoginWithPhoneNumber",
                json!({ "phoneNumber": phone_number, "otp": TEST_OTP }),
            )
            .await;
        assert!(login.status.is_success(), "login failed: {}", login.body);
        login.body["sessionToken"]
            .as_str()
            .expect("session token")
            .to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
