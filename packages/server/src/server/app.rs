//! Application setup and server configuration.

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{session_gate_middleware, SessionGate};
use crate::server::routes::{
    get_profile_handler, health_handler, login_handler, logout_handler, signup_handler,
    verify_handler, SERVICE_PATH,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// RPC routes for `auth.v1.AuthService`, all behind the session gate.
fn rpc_router(gate: SessionGate) -> Router {
    let route = |method: &str| format!("{}/{}", SERVICE_PATH, method);

    Router::new()
        .route(&route("SignupWithPhoneNumber"), post(signup_handler))
        .route(&route("VerifyPhoneNumber"), post(verify_handler))
        .route(&route("LoginWithPhoneNumber"), post(login_handler))
        .route(&route("GetProfile"), post(get_profile_handler))
        .route(&route("Logout"), post(logout_handler))
        .layer(middleware::from_fn(move |req, next| {
            session_gate_middleware(gate.clone(), req, next)
        }))
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let gate = SessionGate::new(deps.jwt_service.clone(), deps.presence.clone());
    let app_state = AppState { deps };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", rpc_router(gate))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
