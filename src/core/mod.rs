pub mod analyzer;
pub mod engine;
pub mod fallback;
pub mod prompt;

pub use crate::domain::model::{AnalysisResult, PartnerCandidate, ProjectInput};
pub use crate::domain::ports::{CompletionRequest, ConfigProvider, GenerativeBackend, ProjectStore};
pub use crate::utils::error::{BackendError, BackendErrorKind, Result};
