//! Auth domain - phone number identities, OTP verification and sessions
//!
//! Responsibilities:
//! - Session token issue/verify (JWT)
//! - Tracking which identities are currently logged in
//! - Signup / verify / login / profile / logout lifecycle

pub mod actions;
pub mod jwt;
pub mod models;
pub mod phone;
pub mod presence;

pub use jwt::{Claims, JwtService};
pub use phone::is_valid_phone_number;
pub use presence::{InMemoryPresenceCache, PresenceCache};
