use crate::domain::model::{
    AnalysisSummary, PartnerCandidate, PartnerRecommendation, Project, ProjectInput,
};
use crate::domain::ports::ProjectStore;
use crate::utils::error::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    projects: BTreeMap<u64, Project>,
    recommendations: BTreeMap<u64, PartnerRecommendation>,
    next_project_id: u64,
    next_recommendation_id: u64,
}

impl Tables {
    fn allocate_project_id(&mut self) -> u64 {
        self.next_project_id += 1;
        self.next_project_id
    }

    fn allocate_recommendation_id(&mut self) -> u64 {
        self.next_recommendation_id += 1;
        self.next_recommendation_id
    }
}

/// Ephemeral, process-local project store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn project_count(&self) -> usize {
        self.tables.read().await.projects.len()
    }
}

impl ProjectStore for MemoryStore {
    async fn create_project(&self, input: &ProjectInput) -> Result<Project> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_project_id();
        let project = Project {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            stage: input.stage.clone(),
            funding_stage: input.funding_stage.clone(),
            categories: input.categories.clone(),
            analysis_results: None,
            created_at: Utc::now(),
        };
        tables.projects.insert(id, project.clone());
        tracing::debug!("Stored project {} ('{}')", id, project.name);
        Ok(project)
    }

    async fn get_project(&self, id: u64) -> Result<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn update_project(&self, id: u64, analysis: AnalysisSummary) -> Result<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.get_mut(&id).map(|project| {
            project.analysis_results = Some(analysis);
            project.clone()
        }))
    }

    async fn create_recommendations(
        &self,
        project_id: u64,
        partners: &[PartnerCandidate],
    ) -> Result<Vec<PartnerRecommendation>> {
        let mut tables = self.tables.write().await;
        let created_at = Utc::now();
        let mut created = Vec::with_capacity(partners.len());

        for partner in partners {
            let id = tables.allocate_recommendation_id();
            let recommendation = PartnerRecommendation {
                id,
                project_id,
                partner: partner.clone(),
                created_at,
            };
            tables.recommendations.insert(id, recommendation.clone());
            created.push(recommendation);
        }

        Ok(created)
    }

    async fn recommendations_for_project(
        &self,
        project_id: u64,
    ) -> Result<Vec<PartnerRecommendation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .recommendations
            .values()
            .filter(|rec| rec.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::analyze_offline;

    fn input(name: &str) -> ProjectInput {
        ProjectInput {
            name: name.to_string(),
            description: "A wallet that bundles onboarding, identity and payments for new users."
                .to_string(),
            stage: "Idea".to_string(),
            funding_stage: "Bootstrapped".to_string(),
            categories: vec!["Social/Creator".to_string()],
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let store = MemoryStore::new();
        let first = store.create_project(&input("One")).await.unwrap();
        let second = store.create_project(&input("Two")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.analysis_results.is_none());
        assert_eq!(store.project_count().await, 2);
    }

    #[tokio::test]
    async fn test_get_and_update_project() {
        let store = MemoryStore::new();
        let project = store.create_project(&input("Updatable")).await.unwrap();
        let result = analyze_offline(&input("Updatable"));

        let updated = store
            .update_project(project.id, AnalysisSummary::from(&result))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.analysis_results.as_ref().unwrap().partners_count, 5);
        assert!(updated.analysis_results.as_ref().unwrap().is_demo);

        let fetched = store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);

        assert!(store.get_project(99).await.unwrap().is_none());
        assert!(store
            .update_project(99, AnalysisSummary::from(&result))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_recommendations_are_scoped_to_project() {
        let store = MemoryStore::new();
        let a = store.create_project(&input("A")).await.unwrap();
        let b = store.create_project(&input("B")).await.unwrap();
        let partners = analyze_offline(&input("A")).partners;

        let created_a = store.create_recommendations(a.id, &partners).await.unwrap();
        store.create_recommendations(b.id, &partners[..2]).await.unwrap();

        assert_eq!(created_a.len(), 5);
        assert_eq!(created_a[0].id, 1);
        assert_eq!(created_a[4].id, 5);

        let for_a = store.recommendations_for_project(a.id).await.unwrap();
        let for_b = store.recommendations_for_project(b.id).await.unwrap();
        assert_eq!(for_a.len(), 5);
        assert_eq!(for_b.len(), 2);
        assert_eq!(for_b[0].id, 6);
        assert_eq!(for_a[0].partner, partners[0]);
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = MemoryStore::new();
        let handle = store.clone();
        handle.create_project(&input("Shared")).await.unwrap();
        assert_eq!(store.project_count().await, 1);
    }
}
