// Phone-number auth service - API Core
//
// Issues short-lived session tokens after out-of-band OTP verification, gates
// protected RPCs behind a live session and keeps an audit trail of logins.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
