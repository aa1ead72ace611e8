//! Application layer - the turn dispatcher and the chat service facade.

mod dispatcher;
mod service;

pub use dispatcher::{Dispatcher, TurnError, TurnInput, TurnOutcome};
pub use service::{ChatError, ChatReply, ChatService, HistoryMessage};
