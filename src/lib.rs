//! Thin HTTP gateway in front of two hosted LLM backends.
//!
//! One route (`POST /generate`), a two-way dispatch table keyed by model
//! name, two outbound chat-completion calls (one buffered, one
//! streamed), and an append-only CSV log of successful generations.

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logstore;
