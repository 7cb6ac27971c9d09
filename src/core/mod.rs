pub mod engine;
pub mod history;
pub mod parser;
pub mod prompt;
pub mod selector;

pub use crate::domain::model::{CandidateSet, GenerationConfig, WordPair};
pub use crate::domain::ports::{ModelSettingsProvider, TextGenerator};
pub use crate::utils::error::Result;
