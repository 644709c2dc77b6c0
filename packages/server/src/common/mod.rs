// Common types and utilities shared across the application

pub mod auth;
pub mod clock;

pub use auth::{AuthError, RpcCode};
pub use clock::{Clock, FixedClock, SystemClock};
