//! In-memory adapters for tests and development.

mod state_store;

pub use state_store::InMemoryStateStore;
