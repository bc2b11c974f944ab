use super::toml_config::TomlConfig;
use crate::adapters::openai::api_key_from_env;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, Validate};
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "ecosync")]
#[command(about = "Rank candidate ecosystem partners for a Web3 project")]
pub struct CliConfig {
    /// Project description file (.toml or .json)
    #[arg(short, long)]
    pub project: PathBuf,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the generative backend and use the partner catalog
    #[arg(long)]
    pub demo: bool,

    #[arg(long, help = "API key (defaults to OPENAI_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fall back to the catalog on unclassified backend errors too
    #[arg(long)]
    pub fallback_on_unknown: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(skip)]
    file: TomlConfig,

    #[arg(skip)]
    resolved_api_key: Option<String>,
}

impl CliConfig {
    /// Layers flags over the settings file and resolves the API key.
    pub fn load(mut self) -> Result<Self> {
        if let Some(path) = &self.config {
            tracing::debug!("Loading settings from {}", path.display());
            self.file = TomlConfig::from_file(path)?;
        }

        self.resolved_api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.file.configured_api_key().map(str::to_string))
            .or_else(api_key_from_env);

        Ok(self)
    }
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("project", &self.project)
            .field("config", &self.config)
            .field("demo", &self.demo)
            .field("api_key", &self.resolved_api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url())
            .field("model", &self.model())
            .field("timeout", &self.request_timeout())
            .field("fallback_on_unknown", &self.fallback_on_unknown())
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn api_key(&self) -> Option<&str> {
        self.resolved_api_key.as_deref()
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.file.base_url())
    }

    fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.file.model())
    }

    fn temperature(&self) -> f32 {
        self.file.temperature()
    }

    fn max_tokens(&self) -> u32 {
        self.file.max_tokens()
    }

    fn request_timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.file.request_timeout())
    }

    fn fallback_on_unknown(&self) -> bool {
        self.fallback_on_unknown || self.file.fallback_on_unknown()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.file.validate()?;
        crate::utils::validation::validate_url("base_url", self.base_url())?;
        validate_positive_number("timeout_secs", self.request_timeout().as_secs(), 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_settings_file() {
        let mut settings = NamedTempFile::new().unwrap();
        settings
            .write_all(
                b"[backend]\napi_key = \"sk-file\"\nmodel = \"gpt-4o-mini\"\ntimeout_seconds = 30\n",
            )
            .unwrap();

        let config = CliConfig::parse_from([
            "ecosync",
            "--project",
            "project.toml",
            "--config",
            settings.path().to_str().unwrap(),
            "--api-key",
            "sk-flag",
            "--timeout-secs",
            "5",
        ])
        .load()
        .unwrap();

        assert_eq!(config.api_key(), Some("sk-flag"));
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = CliConfig::parse_from([
            "ecosync",
            "--project",
            "p.json",
            "--api-key",
            "sk-very-secret",
        ])
        .load()
        .unwrap();

        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn test_demo_flag() {
        let config = CliConfig::parse_from(["ecosync", "-p", "p.json", "--demo"]);
        assert!(config.demo);
        assert!(!config.fallback_on_unknown());
    }
}
