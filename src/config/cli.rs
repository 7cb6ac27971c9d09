use crate::config::toml_config::ServiceConfig;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Options shared by every binary.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    #[arg(long, short, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CommonArgs {
    /// Loads the config file and lays the command-line overrides on top.
    pub fn load(&self) -> crate::Result<ServiceConfig> {
        let mut config = ServiceConfig::load(self.config.as_deref())?;
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            config.model.api_key = Some(key.clone());
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;
        Ok(config)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wordwolf")]
#[command(about = "Serves citizen/werewolf word pairs generated by an LLM")]
pub struct CliConfig {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Listen host (overrides [server].host)")]
    pub host: Option<String>,

    #[arg(long, help = "Listen port (overrides [server].port)")]
    pub port: Option<u16>,
}

impl CliConfig {
    pub fn load(&self) -> crate::Result<ServiceConfig> {
        let mut config = self.common.load()?;
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "generate_pair")]
#[command(about = "Generates one word pair and prints it as JSON")]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub min_level: Option<u8>,

    #[arg(long)]
    pub max_level: Option<u8>,

    #[arg(long, value_delimiter = ',', help = "Comma-separated domains to pick from")]
    pub domain: Vec<String>,
}

impl GenerateArgs {
    pub fn domains(&self) -> Option<Vec<String>> {
        if self.domain.is_empty() {
            None
        } else {
            Some(self.domain.clone())
        }
    }
}
