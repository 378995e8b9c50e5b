//! llm
//!
//! Language-model access and the changelog request/response protocol.
//!
//! # Architecture
//!
//! - `traits`: the `LanguageModel` trait and `LlmError`
//! - [`openai`]: OpenAI-compatible chat completions over reqwest
//! - [`mock`]: queued canned responses for tests
//! - [`prompt`]: prompt building and response parsing (pure)
//! - [`client`]: `ChangelogClient`, one model call per request
//!
//! The engine is generic over `LanguageModel`, mirroring how it is generic
//! over `Forge`.

pub mod client;
pub mod mock;
pub mod openai;
pub mod prompt;
mod traits;

pub use client::ChangelogClient;
pub use traits::*;
