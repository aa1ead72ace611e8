//! Conversation types - messages, envelopes, categories, durable state,
//! context filtering and defensive JSON extraction.

mod category;
mod envelope;
mod extractor;
mod filter;
mod message;
mod state;

pub use category::{Category, Classification, UnknownCategory};
pub use envelope::Envelope;
pub use extractor::{extract_json, parse_structured, ExtractError};
pub use filter::filter_messages;
pub use message::{Message, Role};
pub use state::{ConversationState, SharedInputs};
