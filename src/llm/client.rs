//! llm::client
//!
//! Typed changelog requests over any [`LanguageModel`].
//!
//! Each request is exactly one `complete` call: build the prompt, send it,
//! parse the answer. No retries, no caching.

use tracing::{debug, info};

use super::prompt::{
    build_changelog_prompt, build_pr_prompt, parse_changelog_response, parse_pr_response,
    ChangelogRequest, ChangelogResult, PrChangelogRequest, PrSummary, Vocabulary,
};
use super::traits::{LanguageModel, LlmError};

/// Changelog client wrapping a model.
#[derive(Debug, Clone)]
pub struct ChangelogClient<M: LanguageModel> {
    model: M,
}

impl<M: LanguageModel> ChangelogClient<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Ask the model for a categorized changelog of `request`'s commits.
    pub async fn generate_changelog(
        &self,
        request: &ChangelogRequest,
        vocabulary: Vocabulary,
    ) -> Result<ChangelogResult, LlmError> {
        let prompt = build_changelog_prompt(request, vocabulary);
        info!(
            model = self.model.name(),
            range = %format!("{}..{}", request.from, request.to),
            commits = request.commits.len(),
            "requesting changelog"
        );
        let raw = self.model.complete(&prompt).await?;
        let result = parse_changelog_response(&raw)?;
        debug!(
            categories = result.categories.len(),
            highlights = result.highlights.len(),
            "parsed changelog"
        );
        Ok(result)
    }

    /// Ask the model for one sentence per pull request.
    pub async fn generate_pr_summaries(
        &self,
        request: &PrChangelogRequest,
    ) -> Result<Vec<PrSummary>, LlmError> {
        let prompt = build_pr_prompt(request);
        info!(
            model = self.model.name(),
            pull_requests = request.pull_requests.len(),
            "requesting pull request summaries"
        );
        let raw = self.model.complete(&prompt).await?;
        parse_pr_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;

    fn request() -> ChangelogRequest {
        ChangelogRequest {
            repository: "o/r".into(),
            from: "v1".into(),
            to: "v2".into(),
            commits: vec![],
        }
    }

    #[tokio::test]
    async fn one_call_per_changelog() {
        let model = MockModel::new().with_response(
            "```json\n{\"summary\": \"s\", \"categories\": {\"Features\": [{\"sha\": \"a\", \"title\": \"t\"}]}}\n```",
        );
        let client = ChangelogClient::new(model.clone());

        let result = client
            .generate_changelog(&request(), Vocabulary::Standard)
            .await
            .unwrap();
        assert_eq!(result.summary, "s");
        assert_eq!(model.call_count(), 1);
        assert!(model.prompts()[0].contains("Range: v1 → v2"));
    }

    #[tokio::test]
    async fn parse_failures_surface() {
        let model = MockModel::new().with_response("not json");
        let client = ChangelogClient::new(model);
        let err = client
            .generate_changelog(&request(), Vocabulary::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn model_errors_surface() {
        let model = MockModel::new().with_error(LlmError::EmptyResponse);
        let client = ChangelogClient::new(model);
        let err = client
            .generate_changelog(&request(), Vocabulary::Extended)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn pr_summaries_round_trip_through_model() {
        let model =
            MockModel::new().with_response("{\"entries\": [{\"number\": 3, \"summary\": \"x\"}]}");
        let client = ChangelogClient::new(model.clone());
        let request = PrChangelogRequest {
            repository: "o/r".into(),
            from: "v1".into(),
            to: "v2".into(),
            pull_requests: vec![],
        };
        let summaries = client.generate_pr_summaries(&request).await.unwrap();
        assert_eq!(summaries[0].number, 3);
        assert_eq!(model.call_count(), 1);
    }
}
