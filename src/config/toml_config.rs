use crate::core::engine::HistoryPolicy;
use crate::domain::model::{
    normalize_domains, CandidateCount, Difficulty, GenerationConfig, DEFAULT_HISTORY_SIZE,
    MAX_HISTORY_SIZE, MAX_LEVEL, MIN_LEVEL,
};
use crate::domain::ports::ModelSettingsProvider;
use crate::utils::error::{Result, WordWolfError};
use crate::utils::validation::{
    validate_non_empty_string, validate_ordered, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub generation: GenerationSettings,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8012,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub thinking_budget: u32,
    /// Transport-level timeout for one model call; unset means none.
    pub request_timeout_seconds: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            name: "gemini-2.5-flash".to_string(),
            api_key: None,
            temperature: 2.0,
            thinking_budget: 500,
            request_timeout_seconds: None,
        }
    }
}

impl ModelConfig {
    pub fn api_key(&self) -> Result<&str> {
        validate_required_field("model.api_key", &self.api_key).map(String::as_str)
    }
}

impl ModelSettingsProvider for ModelConfig {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn reasoning_budget(&self) -> u32 {
        self.thinking_budget
    }
}

/// Defaults applied to requests that leave parameters out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub min_level: u8,
    pub max_level: u8,
    pub domains: Vec<String>,
    /// Reject requests that end up with no domain at all.
    pub require_domain: bool,
    pub candidate_count: CandidateCount,
    pub gloss_language: Option<String>,
    pub history_policy: HistoryPolicy,
    /// Fixed rng seed, for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            min_level: MIN_LEVEL,
            max_level: MAX_LEVEL,
            domains: Vec::new(),
            require_domain: false,
            candidate_count: CandidateCount::Eight,
            gloss_language: Some("Japanese".to_string()),
            history_policy: HistoryPolicy::Serialized,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// How many of the newest terms go into the exclusion clause.
    pub exclusion_size: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_SIZE,
            exclusion_size: None,
        }
    }
}

impl HistoryConfig {
    pub fn exclusion_size(&self) -> usize {
        self.exclusion_size.unwrap_or(self.capacity)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl ServiceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WordWolfError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text, then fills the API key from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| WordWolfError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.apply_env();
        Ok(config)
    }

    /// Config file when given, built-in defaults plus environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Self::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Replaces `${VAR}` references with environment values; unknown ones stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WordWolfError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn apply_env(&mut self) {
        let unresolved = self
            .model
            .api_key
            .as_deref()
            .map(|key| key.trim().is_empty() || key.starts_with("${"))
            .unwrap_or(true);
        if unresolved {
            self.model.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    /// Per-request config: request values win, settings fill the gaps.
    pub fn resolve_request(
        &self,
        min_level: Option<u8>,
        max_level: Option<u8>,
        domains: Option<Vec<String>>,
    ) -> Result<GenerationConfig> {
        let settings = &self.generation;
        let min = min_level.unwrap_or(settings.min_level);
        let max = max_level.unwrap_or(settings.max_level);
        let domains = normalize_domains(domains.unwrap_or_else(|| settings.domains.clone()));

        if settings.require_domain && domains.is_empty() {
            return Err(WordWolfError::InvalidConfigValueError {
                field: "domain".to_string(),
                value: "[]".to_string(),
                reason: "At least one domain is required".to_string(),
            });
        }

        let config = GenerationConfig::new(Difficulty::from_bounds(min, max), domains)
            .with_candidate_count(settings.candidate_count)
            .with_exclusion_history_size(self.history.exclusion_size());
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;

        validate_url("model.base_url", &self.model.base_url)?;
        validate_non_empty_string("model.name", &self.model.name)?;
        self.model.api_key()?;
        validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;

        let generation = &self.generation;
        validate_range("generation.min_level", generation.min_level, MIN_LEVEL, MAX_LEVEL)?;
        validate_range("generation.max_level", generation.max_level, MIN_LEVEL, MAX_LEVEL)?;
        validate_ordered("generation.min_level/max_level", generation.min_level, generation.max_level)?;
        if generation.require_domain && normalize_domains(generation.domains.clone()).is_empty() {
            tracing::warn!("require_domain is set but no default domains are configured");
        }

        validate_range("history.capacity", self.history.capacity, 1, MAX_HISTORY_SIZE)?;
        validate_positive_number("history.exclusion_size", self.history.exclusion_size(), 1)?;

        tracing::debug!("Service configuration validation passed");
        Ok(())
    }
}
