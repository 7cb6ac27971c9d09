use crate::core::history::{HistoryBuffer, SharedHistory};
use crate::core::parser::{self, ParseFailure};
use crate::core::prompt::{Prompt, PromptBuilder};
use crate::core::selector::{self, SelectedPair};
use crate::domain::model::{
    CandidateSet, GenerationConfig, ModelRequest, ResponseFormat, WordPair,
};
use crate::domain::ports::{ModelSettingsProvider, TextGenerator};
use crate::utils::error::{Result, WordWolfError};
use crate::utils::validation::Validate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// How concurrent generations share the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// History lock held from snapshot to commit; generations run one at a time.
    #[default]
    Serialized,
    /// Snapshot and commit take the lock separately; overlapping calls may
    /// not exclude each other's terms.
    BestEffort,
}

/// Drives one generation: prompt, model call, parse, select, commit.
pub struct PairEngine<G: TextGenerator, C: ModelSettingsProvider> {
    generator: G,
    settings: C,
    history: SharedHistory,
    prompts: PromptBuilder,
    rng: Mutex<StdRng>,
    policy: HistoryPolicy,
}

impl<G: TextGenerator, C: ModelSettingsProvider> PairEngine<G, C> {
    pub fn new(generator: G, settings: C, history: SharedHistory) -> Self {
        Self {
            generator,
            settings,
            history,
            prompts: PromptBuilder::new(),
            rng: Mutex::new(StdRng::from_entropy()),
            policy: HistoryPolicy::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_policy(mut self, policy: HistoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    pub async fn generate_pair(&self, config: &GenerationConfig) -> Result<WordPair> {
        config.validate()?;

        match self.policy {
            HistoryPolicy::Serialized => {
                let mut history = self.history.lock().await;
                let exclusions = history.recent(config.exclusion_history_size);
                let (prompt, candidates, selected) = self.produce(config, &exclusions).await?;
                commit(&mut history, &selected);
                Ok(assemble(&prompt, &candidates, selected))
            }
            HistoryPolicy::BestEffort => {
                let exclusions = self
                    .history
                    .lock()
                    .await
                    .recent(config.exclusion_history_size);
                let (prompt, candidates, selected) = self.produce(config, &exclusions).await?;
                commit(&mut *self.history.lock().await, &selected);
                Ok(assemble(&prompt, &candidates, selected))
            }
        }
    }

    /// Steps up to selection. Touches no shared state except the rng.
    async fn produce(
        &self,
        config: &GenerationConfig,
        exclusions: &[String],
    ) -> Result<(Prompt, CandidateSet, SelectedPair)> {
        let prompt = self.with_rng(|rng| self.prompts.build(config, exclusions, rng));
        tracing::debug!(
            "Built prompt: level={}, domain={:?}, exclusions={}",
            prompt.level,
            prompt.domain,
            exclusions.len()
        );

        let request = ModelRequest {
            model: self.settings.model_name().to_string(),
            prompt: prompt.text.clone(),
            response_format: ResponseFormat::Json,
            temperature: self.settings.temperature(),
            reasoning_budget: self.settings.reasoning_budget(),
        };

        tracing::debug!("Invoking model {}", request.model);
        let response = self.generator.generate(&request).await.map_err(|e| {
            tracing::error!("Text generation failed: {}", e);
            e
        })?;

        let candidates = parser::parse(&response.text, config.candidate_count).map_err(
            |failure: ParseFailure| {
                tracing::warn!("Rejected model response ({}): {}", failure, response.text);
                WordWolfError::InvalidResponse(failure)
            },
        )?;
        tracing::debug!(
            "Parsed {} candidates in domain {} / {:?}",
            candidates.len(),
            candidates.domain,
            candidates.sub_domain
        );

        let selected = self.with_rng(|rng| selector::select(&candidates, rng))?;
        if selected.first_word.trim() == selected.second_word.trim() {
            tracing::warn!(
                "Model repeated term {:?} at positions {} and {}",
                selected.first_word,
                selected.first_index,
                selected.second_index
            );
            return Err(WordWolfError::DuplicatePair {
                term: selected.first_word,
            });
        }

        Ok((prompt, candidates, selected))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

fn commit(history: &mut HistoryBuffer, selected: &SelectedPair) {
    history.append(selected.first_word.clone());
    history.append(selected.second_word.clone());
}

fn assemble(prompt: &Prompt, candidates: &CandidateSet, selected: SelectedPair) -> WordPair {
    tracing::info!(
        "Generated pair: citizen={:?}, werewolf={:?}, domain={}, level={}",
        selected.first_word,
        selected.second_word,
        candidates.domain,
        prompt.level
    );
    WordPair {
        citizen_term: selected.first_word,
        citizen_explanation: selected.first_explanation,
        wolf_term: selected.second_word,
        wolf_explanation: selected.second_explanation,
        domain: candidates.domain.clone(),
        level: prompt.level,
    }
}
