//! llm::traits
//!
//! The language-model seam.
//!
//! # Design
//!
//! A model is anything that turns one prompt into one text completion.
//! Prompt construction and response parsing live in [`super::prompt`], so
//! implementations only move bytes. The trait is object-safe and `Send +
//! Sync` like the `Forge` trait.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from language-model calls and response parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// The request could not be sent or the body could not be read.
    #[error("create chat completion: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API answered without any choices or content.
    #[error("no response from model")]
    EmptyResponse,

    /// The completion was not the expected JSON.
    #[error("parse JSON response: {0}")]
    Parse(String),
}

/// A text-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logs.
    fn name(&self) -> &str;

    /// Complete a single user prompt, returning the first choice's content.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
