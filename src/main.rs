use clap::Parser;
use ecosync::config::project_file::load_project_input;
use ecosync::core::analyzer::SamplingSettings;
use ecosync::core::ConfigProvider;
use ecosync::utils::error::ErrorSeverity;
use ecosync::utils::{logger, validation::Validate};
use ecosync::{
    AnalysisEngine, AnalysisMode, CliConfig, EcosyncError, EngineSettings, MemoryStore,
    OpenAiBackend, PrimaryAnalyzer, ProjectService, Submission,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting ecosync CLI");

    match run(config).await {
        Ok(submission) => {
            println!("{}", serde_json::to_string_pretty(&submission)?);
        }
        Err(e) => {
            tracing::error!(
                "Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // exit code follows severity
            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: CliConfig) -> Result<Submission, EcosyncError> {
    let config = config.load()?;
    tracing::debug!("CLI config: {:?}", config);

    config.validate()?;

    let input = load_project_input(&config.project)?;
    let mode = if config.demo {
        AnalysisMode::Demo
    } else {
        AnalysisMode::Auto
    };

    let backend = OpenAiBackend::from_config(&config)?;
    if mode == AnalysisMode::Auto && !backend.has_api_key() {
        tracing::warn!("No API key configured; the backend call will be rejected");
    }

    let analyzer = PrimaryAnalyzer::with_sampling(
        backend,
        SamplingSettings {
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        },
    );
    let engine = AnalysisEngine::with_settings(
        analyzer,
        EngineSettings {
            timeout: config.request_timeout(),
            fallback_on_unknown: config.fallback_on_unknown(),
        },
    );

    let service = ProjectService::new(MemoryStore::new(), engine);
    service.submit(input, mode).await
}
