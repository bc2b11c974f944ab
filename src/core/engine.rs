use crate::core::analyzer::PrimaryAnalyzer;
use crate::core::fallback::analyze_offline;
use crate::domain::model::{AnalysisResult, ProjectInput};
use crate::domain::ports::GenerativeBackend;
use crate::utils::error::{BackendError, BackendErrorKind};
use std::time::Duration;

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Generative backend first, catalog on recoverable failures.
    #[default]
    Auto,
    /// Catalog only.
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub timeout: Duration,
    pub fallback_on_unknown: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
            fallback_on_unknown: false,
        }
    }
}

/// Runs the primary analyzer and degrades to the offline catalog.
///
/// Holds no mutable state, so a shared engine can serve overlapping calls.
pub struct AnalysisEngine<B: GenerativeBackend> {
    analyzer: PrimaryAnalyzer<B>,
    settings: EngineSettings,
}

impl<B: GenerativeBackend> AnalysisEngine<B> {
    pub fn new(analyzer: PrimaryAnalyzer<B>) -> Self {
        Self::with_settings(analyzer, EngineSettings::default())
    }

    pub fn with_settings(analyzer: PrimaryAnalyzer<B>, settings: EngineSettings) -> Self {
        Self { analyzer, settings }
    }

    pub async fn run(
        &self,
        input: &ProjectInput,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, BackendError> {
        if mode == AnalysisMode::Demo {
            tracing::info!("Demo mode requested for '{}', using partner catalog", input.name);
            return Ok(analyze_offline(input));
        }

        tracing::info!("Analyzing '{}' with the generative backend", input.name);
        let pending = self.analyzer.analyze(input);
        let attempt = match tokio::time::timeout(self.settings.timeout, pending).await {
            Ok(outcome) => outcome,
            Err(_) => Err(BackendError::timeout(format!(
                "no response within {:?}",
                self.settings.timeout
            ))),
        };

        match attempt {
            Ok(result) => {
                tracing::info!(
                    "Backend analysis complete for '{}' (average match {}%)",
                    input.name,
                    result.average_match_score()
                );
                Ok(result)
            }
            Err(err) => self.recover(input, err.reclassified()),
        }
    }

    fn recover(
        &self,
        input: &ProjectInput,
        err: BackendError,
    ) -> Result<AnalysisResult, BackendError> {
        let use_catalog = err.is_recoverable()
            || (err.kind == BackendErrorKind::Unknown && self.settings.fallback_on_unknown);

        if use_catalog {
            tracing::warn!(
                "Backend analysis failed ({}), falling back to partner catalog: {}",
                err.kind,
                err.message
            );
            return Ok(analyze_offline(input));
        }

        match err.kind {
            BackendErrorKind::AuthInvalid => {
                tracing::error!("Backend rejected the credential: {}", err.message)
            }
            _ => tracing::error!("Backend analysis failed ({}): {}", err.kind, err.message),
        }
        Err(err)
    }
}
