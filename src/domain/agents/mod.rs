//! LLM-backed agents: the responder capability, its concrete roles, the
//! intent classifier and the category routing table.

mod classifier;
mod cognitive_support;
mod operator_support;
mod prompts;
mod responder;
mod scoring;
mod table;

pub use classifier::IntentClassifier;
pub use cognitive_support::CognitiveSupportResponder;
pub use operator_support::OperatorSupportResponder;
pub use responder::{AgentReply, Responder, FALLBACK_REPLY};
pub use scoring::ScoringResponder;
pub use table::ResponderTable;
