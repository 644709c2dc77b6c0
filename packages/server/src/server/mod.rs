// HTTP server setup (Axum + Connect-style JSON RPC)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
