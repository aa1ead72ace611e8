//! Domain layer - pure conversation orchestration logic.
//!
//! No I/O happens here; everything external (the completion service, the
//! state store) is reached through the ports layer.

pub mod agents;
pub mod conversation;
pub mod foundation;
