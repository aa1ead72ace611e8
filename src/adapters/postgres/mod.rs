//! PostgreSQL adapters.

mod state_store;

pub use state_store::PostgresStateStore;
