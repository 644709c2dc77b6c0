//! End-to-end identity lifecycle through the RPC router.
//!
//! - Signup and verification
//! - Login, profile fetch and logout
//! - Audit trail of session transitions

mod common;

use auth_core::domains::auth::models::IdentityEventKind;
use auth_core::kernel::{BaseEventStore, PublishBehavior, TEST_OTP_REQUEST_SUBJECT};
use common::{TestHarness, TEST_NAME, TEST_OTP, TEST_PHONE};
use serde_json::json;
use test_context::test_context;

// ============================================================================
// Signup and verification
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn signup_then_verify_lifecycle(ctx: &TestHarness) {
    let rpc = ctx.rpc();

    let signup = rpc
        .call(
            "SignupWithPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
        )
        .await;
    assert!(signup.status.is_success());
    assert_eq!(signup.body["phoneNumber"], TEST_PHONE);
    assert_eq!(signup.body["isVerified"], false);
    assert!(!signup.body["id"].as_str().unwrap().is_empty());

    ctx.deliver_otp(TEST_PHONE, TEST_OTP).await;

    let wrong = rpc
        .call(
            "VerifyPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "otp": "000000" }),
        )
        .await;
    assert_eq!(wrong.status, 400);
    assert_eq!(wrong.error_code(), Some("invalid_argument"));
    assert_eq!(wrong.error_message(), Some("otp provided is incorrect"));

    let verified = rpc
        .call(
            "VerifyPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "otp": TEST_OTP }),
        )
        .await;
    assert!(verified.status.is_success());
    assert_eq!(verified.body["verified"], true);

    let again = rpc
        .call(
            "VerifyPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "otp": TEST_OTP }),
        )
        .await;
    assert_eq!(again.status, 400);
    assert_eq!(
        again.error_message(),
        Some("this phone number is already verified")
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn signup_requests_an_otp_for_the_phone_number(ctx: &TestHarness) {
    let rpc = ctx.rpc();

    rpc.call(
        "SignupWithPhoneNumber",
        json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
    )
    .await;

    let published = ctx.deps.nats.messages_for_subject(TEST_OTP_REQUEST_SUBJECT);
    assert_eq!(published.len(), 1);
    assert_eq!(&published[0].payload[..], TEST_PHONE.as_bytes());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn signup_succeeds_when_broker_is_down(ctx: &TestHarness) {
    ctx.deps.nats.set_behavior(PublishBehavior::Fail);
    let rpc = ctx.rpc();

    let signup = rpc
        .call(
            "SignupWithPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
        )
        .await;
    assert!(signup.status.is_success());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn signup_rejects_invalid_and_duplicate_numbers(ctx: &TestHarness) {
    let rpc = ctx.rpc();

    let invalid = rpc
        .call(
            "SignupWithPhoneNumber",
            json!({ "phoneNumber": "555-1234", "name": TEST_NAME }),
        )
        .await;
    assert_eq!(invalid.status, 400);
    assert_eq!(invalid.error_message(), Some("invalid phone number"));

    let non_ascii = rpc
        .call(
            "SignupWithPhoneNumber",
            json!({ "phoneNumber": "+١٥٥٥١٢٣٠٠٠٠", "name": TEST_NAME }),
        )
        .await;
    assert_eq!(non_ascii.status, 400);
    assert_eq!(non_ascii.error_code(), Some("invalid_argument"));
    assert_eq!(ctx.deps.profiles.profile_count(), 0);

    rpc.call(
        "SignupWithPhoneNumber",
        json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
    )
    .await;
    let duplicate = rpc
        .call(
            "SignupWithPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
        )
        .await;
    assert_eq!(duplicate.status, 400);
    assert_eq!(duplicate.error_message(), Some("failed to create profile"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn verify_unknown_number_is_not_found(ctx: &TestHarness) {
    let rpc = ctx.rpc();

    let response = rpc
        .call(
            "VerifyPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "otp": TEST_OTP }),
        )
        .await;
    assert_eq!(response.status, 404);
    assert_eq!(response.error_code(), Some("not_found"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn undecodable_bodies_use_error_envelope(ctx: &TestHarness) {
    let rpc = ctx.rpc();

    let bad_json = rpc
        .call_raw("SignupWithPhoneNumber", "{not json", Some("application/json"))
        .await;
    assert_eq!(bad_json.status, 400);
    assert_eq!(bad_json.error_code(), Some("invalid_argument"));
    assert!(bad_json
        .error_message()
        .unwrap()
        .starts_with("malformed request"));

    let no_content_type = rpc
        .call_raw("LoginWithPhoneNumber", r#"{"phoneNumber":"+15551230000"}"#, None)
        .await;
    assert_eq!(no_content_type.status, 400);
    assert_eq!(no_content_type.error_code(), Some("invalid_argument"));

    let wrong_types = rpc
        .call_raw(
            "VerifyPhoneNumber",
            r#"{"phoneNumber":5551230000,"otp":1}"#,
            Some("application/json"),
        )
        .await;
    assert_eq!(wrong_types.status, 400);
    assert_eq!(wrong_types.error_code(), Some("invalid_argument"));
    assert_eq!(ctx.deps.profiles.profile_count(), 0);
}

// ============================================================================
// Sessions
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn login_profile_logout_lifecycle(ctx: &TestHarness) {
    let rpc = ctx.rpc();
    ctx.verified_identity(&rpc, TEST_PHONE).await;

    let token = ctx.login(&rpc, TEST_PHONE).await;
    assert!(!token.is_empty());
    assert!(ctx.is_logged_in(TEST_PHONE));

    let profile = rpc.call_authorized("GetProfile", &token).await;
    assert!(profile.status.is_success());
    assert_eq!(profile.body["phoneNumber"], TEST_PHONE);
    assert_eq!(profile.body["name"], TEST_NAME);
    assert_eq!(profile.body["isVerified"], true);

    let logout = rpc.call_authorized("Logout", &token).await;
    assert!(logout.status.is_success());
    assert_eq!(
        logout.body["message"],
        format!("user with phone number: {} logged out successfully.", TEST_PHONE)
    );
    assert!(!ctx.is_logged_in(TEST_PHONE));

    let stale = rpc.call_authorized("GetProfile", &token).await;
    assert_eq!(stale.status, 401);
    assert_eq!(stale.error_code(), Some("unauthenticated"));
    assert_eq!(
        stale.error_message(),
        Some("token is invalid or user logged out")
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn login_before_verification_fails(ctx: &TestHarness) {
    let rpc = ctx.rpc();
    rpc.call(
        "SignupWithPhoneNumber",
        json!({ "phoneNumber": TEST_PHONE, "name": TEST_NAME }),
    )
    .await;
    ctx.deliver_otp(TEST_PHONE, TEST_OTP).await;

    let login = rpc
        .call(
            "LoginWithPhoneNumber",
            json!({ "phoneNumber": TEST_PHONE, "otp": TEST_OTP }),
        )
        .await;
    assert_eq!(login.status, 500);
    assert_eq!(
        login.error_message(),
        Some("this phone number is not verified yet")
    );
    assert!(!ctx.is_logged_in(TEST_PHONE));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn session_transitions_are_audited(ctx: &TestHarness) {
    let rpc = ctx.rpc();
    ctx.verified_identity(&rpc, TEST_PHONE).await;

    let token = ctx.login(&rpc, TEST_PHONE).await;
    rpc.call_authorized("Logout", &token).await;
    // Second logout is a no-op and writes nothing.
    rpc.call_authorized("Logout", &token).await;

    let kinds: Vec<IdentityEventKind> = ctx
        .deps
        .events
        .list(TEST_PHONE)
        .await
        .unwrap()
        .into_iter()
        .map(|event| event.event_type)
        .collect();
    assert_eq!(
        kinds,
        vec![IdentityEventKind::ProfileLogin, IdentityEventKind::ProfileLogout]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn audit_failures_never_fail_sessions(ctx: &TestHarness) {
    ctx.deps.events.set_fail_appends(true);
    let rpc = ctx.rpc();
    ctx.verified_identity(&rpc, TEST_PHONE).await;

    let token = ctx.login(&rpc, TEST_PHONE).await;
    let logout = rpc.call_authorized("Logout", &token).await;
    assert!(logout.status.is_success());
    assert!(!ctx.is_logged_in(TEST_PHONE));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_logged_in_identities(ctx: &TestHarness) {
    let rpc = ctx.rpc();
    ctx.verified_identity(&rpc, TEST_PHONE).await;
    ctx.login(&rpc, TEST_PHONE).await;

    let health = rpc.get("/health").await;
    assert_eq!(health.status, 200);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["logged_in_identities"], 1);
}
