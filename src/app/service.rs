use crate::core::engine::{AnalysisEngine, AnalysisMode};
use crate::domain::model::{
    AnalysisResult, AnalysisSummary, PartnerRecommendation, Project, ProjectInput,
};
use crate::domain::ports::{GenerativeBackend, ProjectStore};
use crate::utils::error::{EcosyncError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub project_id: u64,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project: Project,
    pub recommendations: Vec<PartnerRecommendation>,
}

/// Validates submissions, runs the analysis and records the outcome in `S`.
pub struct ProjectService<S: ProjectStore, B: GenerativeBackend> {
    store: S,
    engine: AnalysisEngine<B>,
}

impl<S: ProjectStore, B: GenerativeBackend> ProjectService<S, B> {
    pub fn new(store: S, engine: AnalysisEngine<B>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn submit(&self, input: ProjectInput, mode: AnalysisMode) -> Result<Submission> {
        input.validate()?;

        let project = self.store.create_project(&input).await?;
        tracing::debug!("Created project {} for '{}'", project.id, project.name);

        let result = self.engine.run(&input, mode).await?;

        let recommendations = self
            .store
            .create_recommendations(project.id, &result.partners)
            .await?;

        self.store
            .update_project(project.id, AnalysisSummary::from(&result))
            .await?
            .ok_or_else(|| EcosyncError::NotFound {
                what: format!("project {}", project.id),
            })?;

        tracing::info!(
            "Project {} analyzed: {} recommendations{}",
            project.id,
            recommendations.len(),
            if result.is_demo { " (demo)" } else { "" }
        );

        Ok(Submission {
            project_id: project.id,
            result,
        })
    }

    pub async fn project_details(&self, id: u64) -> Result<ProjectDetails> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or_else(|| EcosyncError::NotFound {
                what: format!("project {}", id),
            })?;
        let recommendations = self.store.recommendations_for_project(id).await?;

        Ok(ProjectDetails {
            project,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::core::analyzer::PrimaryAnalyzer;
    use crate::domain::ports::CompletionRequest;
    use crate::utils::error::{BackendError, BackendErrorKind};
    use async_trait::async_trait;
    use serde_json::json;

    struct CannedBackend(std::result::Result<String, BackendError>);

    #[async_trait]
    impl GenerativeBackend for CannedBackend {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> std::result::Result<String, BackendError> {
            self.0.clone()
        }
    }

    fn service(
        reply: std::result::Result<String, BackendError>,
    ) -> ProjectService<MemoryStore, CannedBackend> {
        let engine = AnalysisEngine::new(PrimaryAnalyzer::new(CannedBackend(reply)));
        ProjectService::new(MemoryStore::new(), engine)
    }

    fn input() -> ProjectInput {
        ProjectInput {
            name: "Open Ledger Lab".to_string(),
            description: "Transparent accounting dashboards for DAO treasuries and grant programs."
                .to_string(),
            stage: "MVP".to_string(),
            funding_stage: "Grant-funded".to_string(),
            categories: vec!["DAO/Governance".to_string()],
        }
    }

    fn generated_reply() -> String {
        let partners: Vec<_> = ["Safe", "Tally", "Coordinape", "Llama", "Karma"]
            .iter()
            .map(|name| json!({ "name": name, "type": "DAO Tooling", "matchScore": 81 }))
            .collect();
        json!({ "summary": "Governance tooling is the clearest fit.", "partners": partners })
            .to_string()
    }

    #[tokio::test]
    async fn test_submit_records_project_and_recommendations() {
        let service = service(Ok(generated_reply()));

        let submission = service.submit(input(), AnalysisMode::Auto).await.unwrap();
        assert_eq!(submission.project_id, 1);
        assert!(!submission.result.is_demo);
        assert_eq!(submission.result.partners[0].name, "Safe");

        let details = service.project_details(1).await.unwrap();
        assert_eq!(details.recommendations.len(), 5);
        let summary = details.project.analysis_results.unwrap();
        assert_eq!(summary.partners_count, 5);
        assert_eq!(summary.summary, "Governance tooling is the clearest fit.");
        assert!(!summary.is_demo);
    }

    #[tokio::test]
    async fn test_submit_demo_mode_marks_summary() {
        let service = service(Err(BackendError::auth_invalid("no key")));

        let submission = service.submit(input(), AnalysisMode::Demo).await.unwrap();
        assert!(submission.result.is_demo);

        let details = service.project_details(submission.project_id).await.unwrap();
        assert!(details.project.analysis_results.unwrap().is_demo);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_storing() {
        let service = service(Ok(generated_reply()));
        let mut bad = input();
        bad.description = "too short".to_string();

        let err = service.submit(bad, AnalysisMode::Auto).await.unwrap_err();
        assert!(matches!(
            err,
            EcosyncError::ValidationError { ref field, .. } if field == "description"
        ));
        assert_eq!(service.store().project_count().await, 0);
    }

    #[tokio::test]
    async fn test_auth_failure_keeps_project_without_analysis() {
        let service = service(Err(BackendError::auth_invalid("Incorrect API key provided")));

        let err = service.submit(input(), AnalysisMode::Auto).await.unwrap_err();
        match err {
            EcosyncError::Backend(e) => assert_eq!(e.kind, BackendErrorKind::AuthInvalid),
            other => panic!("unexpected error: {:?}", other),
        }

        let details = service.project_details(1).await.unwrap();
        assert!(details.project.analysis_results.is_none());
        assert!(details.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project_is_not_found() {
        let service = service(Ok(generated_reply()));
        let err = service.project_details(42).await.unwrap_err();
        assert!(matches!(err, EcosyncError::NotFound { .. }));
    }

    #[test]
    fn test_submission_wire_shape() {
        let submission = Submission {
            project_id: 7,
            result: crate::core::fallback::analyze_offline(&input()),
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["projectId"], 7);
        assert_eq!(value["isDemo"], true);
        assert_eq!(value["partners"].as_array().unwrap().len(), 5);
    }
}
