pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, GenerateArgs};
pub use config::ServiceConfig;

pub use adapters::gemini::GeminiClient;
pub use crate::core::engine::{HistoryPolicy, PairEngine};
pub use crate::core::history::{HistoryBuffer, SharedHistory};
pub use domain::model::{CandidateCount, CandidateSet, Difficulty, GenerationConfig, WordPair};
pub use domain::ports::TextGenerator;
pub use utils::error::{Result, WordWolfError};

use crate::core::prompt::PromptBuilder;
use crate::domain::ports::ModelSettingsProvider;

/// Wires an engine from service configuration: history, prompt options, rng
/// seed and history policy.
pub fn build_engine<G, C>(generator: G, settings: C, config: &ServiceConfig) -> Result<PairEngine<G, C>>
where
    G: TextGenerator,
    C: ModelSettingsProvider,
{
    let history = HistoryBuffer::shared(config.history.capacity)?;
    let mut prompts = PromptBuilder::new();
    if let Some(language) = &config.generation.gloss_language {
        prompts = prompts.with_gloss_language(language.clone());
    }
    let mut engine = PairEngine::new(generator, settings, history)
        .with_prompt_builder(prompts)
        .with_policy(config.generation.history_policy);
    if let Some(seed) = config.generation.seed {
        engine = engine.with_seed(seed);
    }
    Ok(engine)
}
