use crate::utils::error::Result;
use crate::utils::validation::{
    validate_min_chars, validate_non_empty_list, validate_non_empty_string, Validate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const PARTNERS_PER_RESULT: usize = 5;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 100;

/// A submitted project, as the analysis core sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub stage: String,
    #[serde(alias = "funding_stage")]
    pub funding_stage: String,
    pub categories: Vec<String>,
}

impl ProjectInput {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl Validate for ProjectInput {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_min_chars("description", &self.description, MIN_DESCRIPTION_CHARS)?;
        validate_non_empty_string("stage", &self.stage)?;
        validate_non_empty_string("fundingStage", &self.funding_stage)?;
        validate_non_empty_list("categories", &self.categories)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerCandidate {
    pub name: String,
    #[serde(rename = "type")]
    pub partner_type: String,
    pub description: String,
    pub reasoning: String,
    pub match_score: u8,
    pub mission_score: u8,
    pub technical_score: u8,
    pub strategic_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl: Option<String>,
}

impl PartnerCandidate {
    pub fn scores(&self) -> [u8; 4] {
        [
            self.match_score,
            self.mission_score,
            self.technical_score,
            self.strategic_score,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub partners: Vec<PartnerCandidate>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_demo: bool,
}

impl AnalysisResult {
    pub fn average_match_score(&self) -> u8 {
        average_match_score(&self.partners)
    }
}

/// Mean `match_score`, rounded to the nearest integer. Zero for an empty slice.
pub fn average_match_score(partners: &[PartnerCandidate]) -> u8 {
    if partners.is_empty() {
        return 0;
    }
    let total: u32 = partners.iter().map(|p| u32::from(p.match_score)).sum();
    (f64::from(total) / partners.len() as f64).round() as u8
}

/// What is kept on a project once its analysis has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub summary: String,
    pub partners_count: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_demo: bool,
}

impl From<&AnalysisResult> for AnalysisSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            summary: result.summary.clone(),
            partners_count: result.partners.len(),
            is_demo: result.is_demo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub stage: String,
    pub funding_stage: String,
    pub categories: Vec<String>,
    pub analysis_results: Option<AnalysisSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecommendation {
    pub id: u64,
    pub project_id: u64,
    #[serde(flatten)]
    pub partner: PartnerCandidate,
    pub created_at: DateTime<Utc>,
}
