use clap::Parser;
use std::sync::Arc;
use wordwolf::adapters::http::{self, AppState};
use wordwolf::utils::error::ErrorSeverity;
use wordwolf::utils::{logger, validation::Validate};
use wordwolf::{build_engine, CliConfig, GeminiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.logging.verbose, config.logging.json);

    tracing::info!("Starting wordwolf server");
    tracing::debug!("Service config: {:?}", config.server);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let generator = GeminiClient::from_config(&config.model)?;
    let engine = build_engine(generator, config.model.clone(), &config)?;
    tracing::info!(
        "Model {} (temperature {}, thinking budget {}), history capacity {}, policy {:?}",
        config.model.name,
        config.model.temperature,
        config.model.thinking_budget,
        config.history.capacity,
        engine.policy()
    );

    let state = Arc::new(AppState { engine, config });
    if let Err(e) = http::serve(state).await {
        tracing::error!(
            "❌ Server stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
