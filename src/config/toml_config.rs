use crate::adapters::openai::{DEFAULT_MODEL, OPENAI_API_BASE};
use crate::core::analyzer::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::core::engine::DEFAULT_ANALYSIS_TIMEOUT;
use crate::core::ConfigProvider;
use crate::utils::error::{EcosyncError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

// keeps the key out of debug logs
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub fallback_on_unknown: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay literal.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EcosyncError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// The configured key, unless it is blank or an unresolved placeholder.
    pub fn configured_api_key(&self) -> Option<&str> {
        self.backend
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("backend.base_url", self.base_url())?;
        validate_range("backend.temperature", self.temperature(), 0.0, 2.0)?;
        validate_positive_number("backend.max_tokens", u64::from(self.max_tokens()), 1)?;
        validate_positive_number("backend.timeout_seconds", self.request_timeout().as_secs(), 1)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_key(&self) -> Option<&str> {
        self.configured_api_key()
    }

    fn base_url(&self) -> &str {
        self.backend.base_url.as_deref().unwrap_or(OPENAI_API_BASE)
    }

    fn model(&self) -> &str {
        self.backend.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn temperature(&self) -> f32 {
        self.backend.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    fn max_tokens(&self) -> u32 {
        self.backend.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    fn request_timeout(&self) -> Duration {
        self.backend
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT)
    }

    fn fallback_on_unknown(&self) -> bool {
        self.analysis.fallback_on_unknown
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
