use crate::core::prompt::{build_user_prompt, SYSTEM_INSTRUCTION};
use crate::domain::model::{
    AnalysisResult, PartnerCandidate, ProjectInput, MAX_SCORE, MIN_SCORE, PARTNERS_PER_RESULT,
};
use crate::domain::ports::{CompletionRequest, GenerativeBackend};
use crate::utils::error::BackendError;
use serde_json::{Map, Value};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 3000;
pub const DEFAULT_SCORE: u8 = 50;
pub const UNKNOWN_PARTNER_NAME: &str = "Unknown Partner";
pub const UNKNOWN_PARTNER_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Asks the generative backend for partners and turns its reply into a checked result.
pub struct PrimaryAnalyzer<B: GenerativeBackend> {
    backend: B,
    sampling: SamplingSettings,
}

impl<B: GenerativeBackend> PrimaryAnalyzer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_sampling(backend, SamplingSettings::default())
    }

    pub fn with_sampling(backend: B, sampling: SamplingSettings) -> Self {
        Self { backend, sampling }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn request_for(&self, input: &ProjectInput) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: build_user_prompt(input),
            json_output: true,
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
        }
    }

    pub async fn analyze(&self, input: &ProjectInput) -> Result<AnalysisResult, BackendError> {
        let request = self.request_for(input);

        tracing::debug!(
            "Requesting partner analysis for '{}' (temperature {}, max_tokens {})",
            input.name,
            request.temperature,
            request.max_tokens
        );
        let raw = self.backend.complete(&request).await?;
        tracing::debug!("Backend returned {} bytes", raw.len());

        parse_response(&raw)
    }
}

/// Validates and normalizes raw backend text into an `AnalysisResult`.
pub fn parse_response(raw: &str) -> Result<AnalysisResult, BackendError> {
    let json_text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| BackendError::malformed(format!("response is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| BackendError::malformed("response is not a JSON object"))?;

    let summary = match object.get("summary") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return Err(BackendError::malformed("response has no 'summary' string")),
    };

    let entries = object
        .get("partners")
        .and_then(Value::as_array)
        .ok_or_else(|| BackendError::malformed("response has no 'partners' array"))?;

    if entries.len() < PARTNERS_PER_RESULT {
        return Err(BackendError::malformed(format!(
            "expected {} partners, got {}",
            PARTNERS_PER_RESULT,
            entries.len()
        )));
    }
    if entries.len() > PARTNERS_PER_RESULT {
        tracing::debug!(
            "Backend returned {} partners, keeping the first {}",
            entries.len(),
            PARTNERS_PER_RESULT
        );
    }

    let empty = Map::new();
    let partners = entries
        .iter()
        .take(PARTNERS_PER_RESULT)
        .map(|entry| normalize_partner(entry.as_object().unwrap_or(&empty)))
        .collect();

    Ok(AnalysisResult {
        summary,
        partners,
        is_demo: false,
    })
}

pub fn normalize_partner(entry: &Map<String, Value>) -> PartnerCandidate {
    PartnerCandidate {
        name: text_field(entry, "name").unwrap_or_else(|| UNKNOWN_PARTNER_NAME.to_string()),
        partner_type: text_field(entry, "type").unwrap_or_else(|| UNKNOWN_PARTNER_TYPE.to_string()),
        description: text_field(entry, "description").unwrap_or_default(),
        reasoning: text_field(entry, "reasoning").unwrap_or_default(),
        match_score: score_field(entry, "matchScore"),
        mission_score: score_field(entry, "missionScore"),
        technical_score: score_field(entry, "technicalScore"),
        strategic_score: score_field(entry, "strategicScore"),
        community: text_field(entry, "community"),
        tvl: text_field(entry, "tvl"),
    }
}

fn text_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    match entry.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Missing, null, non-numeric or non-finite values score `DEFAULT_SCORE`.
fn score_field(entry: &Map<String, Value>, key: &str) -> u8 {
    let raw = match entry.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw.filter(|v| v.is_finite()) {
        Some(v) => v
            .round()
            .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8,
        None => DEFAULT_SCORE,
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line, or up to the
    // object when the whole fence sits on one line
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest.find('{').map(|i| &rest[i..]).unwrap_or(rest),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
