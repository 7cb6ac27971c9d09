use clap::Parser;
use wordwolf::utils::{logger, validation::Validate};
use wordwolf::{build_engine, GeminiClient, GenerateArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = GenerateArgs::parse();
    let config = args.common.load()?;

    logger::init_logger(config.logging.verbose, config.logging.json);
    config.validate()?;

    let generation = config.resolve_request(args.min_level, args.max_level, args.domains())?;
    tracing::debug!("Generation config: {:?}", generation);

    let generator = GeminiClient::from_config(&config.model)?;
    let engine = build_engine(generator, config.model.clone(), &config)?;

    match engine.generate_pair(&generation).await {
        Ok(pair) => {
            println!("{}", serde_json::to_string_pretty(&pair)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Generation failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }
}
