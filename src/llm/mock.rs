//! llm::mock
//!
//! Canned-response language model for deterministic testing.
//!
//! Responses are queued and served in order; every prompt is recorded.
//! An exhausted queue answers `LlmError::EmptyResponse`.
//!
//! # Example
//!
//! ```
//! use relnotes::llm::mock::MockModel;
//! use relnotes::llm::LanguageModel;
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new().with_response("{}");
//! assert_eq!(model.complete("hello").await.unwrap(), "{}");
//! assert_eq!(model.prompts(), vec!["hello".to_string()]);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{LanguageModel, LlmError};

/// Mock model. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    inner: Arc<Mutex<MockModelInner>>,
}

#[derive(Debug, Default)]
struct MockModelInner {
    responses: VecDeque<Result<String, LlmError>>,
    prompts: Vec<String>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockModelInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a successful completion.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.lock().responses.push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, err: LlmError) -> Self {
        self.lock().responses.push_back(Err(err));
        self
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// Number of `complete` calls made.
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut inner = self.lock();
        inner.prompts.push(prompt.to_string());
        inner
            .responses
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_responses_in_order() {
        let model = MockModel::new()
            .with_response("first")
            .with_error(LlmError::Api {
                status: 500,
                message: "boom".into(),
            })
            .with_response("third");

        assert_eq!(model.complete("a").await.unwrap(), "first");
        assert!(matches!(
            model.complete("b").await,
            Err(LlmError::Api { status: 500, .. })
        ));
        assert_eq!(model.complete("c").await.unwrap(), "third");
        assert!(matches!(
            model.complete("d").await,
            Err(LlmError::EmptyResponse)
        ));
        assert_eq!(model.call_count(), 4);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let model = MockModel::new().with_response("x");
        let clone = model.clone();
        clone.complete("p").await.unwrap();
        assert_eq!(model.prompts(), vec!["p".to_string()]);
    }
}
