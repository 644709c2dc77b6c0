//! Client that drives the real router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub struct RpcResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RpcResponse {
    /// Connect error class, e.g. `unauthenticated`.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

pub struct RpcClient {
    app: Router,
}

impl RpcClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn call(&self, method: &str, body: Value) -> RpcResponse {
        self.call_with_headers(method, body, &[]).await
    }

    pub async fn call_authorized(&self, method: &str, token: &str) -> RpcResponse {
        let auth = format!("Bearer {}", token);
        self.call_with_headers(
            method,
            serde_json::json!({}),
            &[(header::AUTHORIZATION.as_str(), auth.as_str())],
        )
        .await
    }

    pub async fn call_with_headers(
        &self,
        method: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> RpcResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/api/auth.v1.AuthService/{}", method))
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");

        self.send(request).await
    }

    /// Post an arbitrary body, optionally without a content type.
    pub async fn call_raw(
        &self,
        method: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> RpcResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/api/auth.v1.AuthService/{}", method));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");

        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> RpcResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> RpcResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        RpcResponse { status, body }
    }
}
