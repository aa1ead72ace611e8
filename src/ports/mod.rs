//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `CompletionClient` - the abstract text-completion service
//! - `StateStore` - durable, thread-keyed conversation state persistence

mod completion;
mod state_store;

pub use completion::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResponse, RequestMetadata,
};
pub use state_store::{StateStore, StateStoreError};
