pub mod memory;
pub mod postgres;

pub use memory::{MemoryEventStore, MemoryProfileStore};
pub use postgres::{PostgresEventStore, PostgresProfileStore};
