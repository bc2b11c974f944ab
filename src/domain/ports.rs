use crate::domain::model::{
    AnalysisSummary, PartnerCandidate, PartnerRecommendation, Project, ProjectInput,
};
use crate::utils::error::{BackendError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// One chat-style completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub json_output: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Returns the raw text of the first completion choice.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, BackendError>;
}

#[async_trait]
impl<T: GenerativeBackend + ?Sized> GenerativeBackend for std::sync::Arc<T> {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, BackendError> {
        (**self).complete(request).await
    }
}

pub trait ProjectStore: Send + Sync {
    fn create_project(
        &self,
        input: &ProjectInput,
    ) -> impl std::future::Future<Output = Result<Project>> + Send;

    fn get_project(
        &self,
        id: u64,
    ) -> impl std::future::Future<Output = Result<Option<Project>>> + Send;

    /// Returns `None` when no project has this id.
    fn update_project(
        &self,
        id: u64,
        analysis: AnalysisSummary,
    ) -> impl std::future::Future<Output = Result<Option<Project>>> + Send;

    fn create_recommendations(
        &self,
        project_id: u64,
        partners: &[PartnerCandidate],
    ) -> impl std::future::Future<Output = Result<Vec<PartnerRecommendation>>> + Send;

    fn recommendations_for_project(
        &self,
        project_id: u64,
    ) -> impl std::future::Future<Output = Result<Vec<PartnerRecommendation>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn max_tokens(&self) -> u32;
    fn request_timeout(&self) -> Duration;
    fn fallback_on_unknown(&self) -> bool;
}
