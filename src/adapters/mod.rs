//! Adapters - implementations of the ports against real infrastructure
//! (Gemini, Postgres, HTTP) plus in-memory test doubles.

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
