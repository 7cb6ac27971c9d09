#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, CommonArgs, GenerateArgs};
pub use toml_config::{
    GenerationSettings, HistoryConfig, LoggingConfig, ModelConfig, ServerConfig, ServiceConfig,
};
