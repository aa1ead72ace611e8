//! Mindtutor - Conversational Tutoring Backend
//!
//! This crate implements a conversation orchestration engine that routes
//! student turns to specialized LLM-backed agents (operator support,
//! cognitive support, scoring) and persists per-thread conversation state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
