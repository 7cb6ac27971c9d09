use crate::utils::error::Result;
use crate::utils::validation::{validate_ordered, validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;
pub const DEFAULT_HISTORY_SIZE: usize = 10;
pub const MAX_HISTORY_SIZE: usize = 1000;
/// Exclusion window that covers whatever the history holds.
pub const WHOLE_HISTORY: usize = usize::MAX;

/// How the difficulty level of one generation is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Fixed(u8),
    Range { min: u8, max: u8 },
}

impl Difficulty {
    /// Equal bounds collapse to `Fixed`.
    pub fn from_bounds(min: u8, max: u8) -> Self {
        if min == max {
            Difficulty::Fixed(min)
        } else {
            Difficulty::Range { min, max }
        }
    }

    pub fn bounds(&self) -> (u8, u8) {
        match *self {
            Difficulty::Fixed(level) => (level, level),
            Difficulty::Range { min, max } => (min, max),
        }
    }
}

impl Validate for Difficulty {
    fn validate(&self) -> Result<()> {
        let (min, max) = self.bounds();
        validate_range("minLevel", min, MIN_LEVEL, MAX_LEVEL)?;
        validate_range("maxLevel", max, MIN_LEVEL, MAX_LEVEL)?;
        validate_ordered("minLevel/maxLevel", min, max)
    }
}

/// Number of candidate terms requested from the model per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CandidateCount {
    Four,
    #[default]
    Eight,
}

impl CandidateCount {
    pub fn size(self) -> usize {
        match self {
            CandidateCount::Four => 4,
            CandidateCount::Eight => 8,
        }
    }
}

impl TryFrom<u8> for CandidateCount {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            4 => Ok(CandidateCount::Four),
            8 => Ok(CandidateCount::Eight),
            other => Err(format!("candidate count must be 4 or 8, got {}", other)),
        }
    }
}

impl From<CandidateCount> for u8 {
    fn from(count: CandidateCount) -> u8 {
        count.size() as u8
    }
}

/// Per-request generation parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub difficulty: Difficulty,
    pub domains: Vec<String>,
    /// How many of the newest buffered terms go into the exclusion clause.
    pub exclusion_history_size: usize,
    pub candidate_count: CandidateCount,
}

impl GenerationConfig {
    /// Excludes the whole history by default.
    pub fn new<I, S>(difficulty: Difficulty, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            difficulty,
            domains: normalize_domains(domains),
            exclusion_history_size: WHOLE_HISTORY,
            candidate_count: CandidateCount::default(),
        }
    }

    pub fn with_candidate_count(mut self, candidate_count: CandidateCount) -> Self {
        self.candidate_count = candidate_count;
        self
    }

    /// Narrows the exclusion clause to the newest `size` terms. Sizes above
    /// the buffer capacity list the whole buffer.
    pub fn with_exclusion_history_size(mut self, size: usize) -> Self {
        self.exclusion_history_size = size;
        self
    }
}

impl Validate for GenerationConfig {
    fn validate(&self) -> Result<()> {
        self.difficulty.validate()?;
        validate_positive_number("exclusion_history_size", self.exclusion_history_size, 1)?;
        Ok(())
    }
}

/// Trims entries, drops blanks and repeats, keeps first-seen order.
pub fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for domain in domains {
        let domain = domain.into();
        let trimmed = domain.trim();
        if !trimmed.is_empty() && !out.iter().any(|d| d == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Parsed and shape-checked model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSet {
    pub domain: String,
    pub sub_domain: Option<String>,
    pub difficulty_level: Option<u8>,
    pub words: Vec<String>,
    pub explanations: Vec<String>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// One emitted citizen/wolf pair, in the wire shape game clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    #[serde(rename = "citizen")]
    pub citizen_term: String,
    #[serde(rename = "citizen-explanation")]
    pub citizen_explanation: String,
    #[serde(rename = "werewolf")]
    pub wolf_term: String,
    #[serde(rename = "werewolf-explanation")]
    pub wolf_explanation: String,
    pub domain: String,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseFormat {
    Json,
}

impl ResponseFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
        }
    }
}

/// Everything the text generation service needs for one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRequest {
    pub model: String,
    pub prompt: String,
    pub response_format: ResponseFormat,
    pub temperature: f32,
    pub reasoning_budget: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
}
