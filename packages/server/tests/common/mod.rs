// Common test utilities

pub mod harness;
pub mod postgres;
pub mod rpc;

pub use harness::*;
pub use postgres::*;
pub use rpc::*;

pub fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
