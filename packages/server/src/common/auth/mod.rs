//! Error taxonomy shared by the gateway, the lifecycle actions and the RPC layer.

mod errors;

pub use errors::{AuthError, RpcCode};
