//! HTTP adapters - REST API implementations.

mod chat;

pub use chat::{chat_router, ChatAppState};
