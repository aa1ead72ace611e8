//! Foundation value objects shared across the domain.

mod ids;
mod timestamp;

pub use ids::{ThreadId, TraceId, ValidationError};
pub use timestamp::Timestamp;
