//! Connect-style JSON handlers for `auth.v1.AuthService`.

use axum::{
    extract::{rejection::JsonRejection, Extension, FromRequest},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::AuthError;
use crate::domains::auth::actions;
use crate::domains::auth::models::Profile;
use crate::server::app::AppState;
use crate::server::middleware::SessionIdentity;

pub const SERVICE_PATH: &str = "/auth.v1.AuthService";

/// Error body returned for every failed call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = self.code();
        if let AuthError::Store(ref e) = self {
            tracing::error!(error = %e, "store failure");
        }
        (
            code.http_status(),
            Json(ErrorEnvelope {
                code: code.as_str().to_string(),
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::MalformedRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct RpcJson<T>(pub T);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupWithPhoneNumberRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupWithPhoneNumberResponse {
    pub id: String,
    pub phone_number: String,
    pub is_verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPhoneNumberRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPhoneNumberResponse {
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginWithPhoneNumberRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginWithPhoneNumberResponse {
    pub session_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProfileResponse {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<Profile> for GetProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name,
            phone_number: profile.phone_number,
            is_verified: profile.is_verified,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

pub async fn signup_handler(
    Extension(state): Extension<AppState>,
    RpcJson(req): RpcJson<SignupWithPhoneNumberRequest>,
) -> Result<Json<SignupWithPhoneNumberResponse>, AuthError> {
    let profile = actions::signup(&req.phone_number, &req.name, &state.deps).await?;

    Ok(Json(SignupWithPhoneNumberResponse {
        id: profile.id.to_string(),
        phone_number: profile.phone_number,
        is_verified: false,
    }))
}

pub async fn verify_handler(
    Extension(state): Extension<AppState>,
    RpcJson(req): RpcJson<VerifyPhoneNumberRequest>,
) -> Result<Json<VerifyPhoneNumberResponse>, AuthError> {
    let verified = actions::verify(&req.phone_number, &req.otp, &state.deps).await?;
    Ok(Json(VerifyPhoneNumberResponse { verified }))
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    RpcJson(req): RpcJson<LoginWithPhoneNumberRequest>,
) -> Result<Json<LoginWithPhoneNumberResponse>, AuthError> {
    let session_token = actions::login(&req.phone_number, &req.otp, &state.deps).await?;
    Ok(Json(LoginWithPhoneNumberResponse { session_token }))
}

pub async fn get_profile_handler(
    Extension(state): Extension<AppState>,
    identity: Option<Extension<SessionIdentity>>,
) -> Result<Json<GetProfileResponse>, AuthError> {
    let phone_number = identity.as_ref().map(|Extension(id)| id.0.as_str());
    let profile = actions::get_profile(phone_number, &state.deps).await?;
    Ok(Json(profile.into()))
}

pub async fn logout_handler(
    Extension(state): Extension<AppState>,
    identity: Option<Extension<SessionIdentity>>,
) -> Json<LogoutResponse> {
    let phone_number = identity.as_ref().map(|Extension(id)| id.0.as_str());
    let result = actions::logout(phone_number, &state.deps).await;
    Json(LogoutResponse {
        message: result.message(),
    })
}
