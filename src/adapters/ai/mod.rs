//! Completion client adapters.

mod gemini;
mod mock;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::{MockCompletionClient, MockReply};
