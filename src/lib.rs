pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{MemoryStore, OpenAiBackend};
pub use crate::app::{ProjectDetails, ProjectService, Submission};
pub use crate::core::analyzer::PrimaryAnalyzer;
pub use crate::core::engine::{AnalysisEngine, AnalysisMode, EngineSettings};
pub use crate::core::fallback::analyze_offline;
pub use crate::domain::model::{AnalysisResult, PartnerCandidate, ProjectInput};
pub use crate::utils::error::{BackendError, BackendErrorKind, EcosyncError, Result};
