pub mod cli;
pub mod toml_config;

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "landing-forecaster")]
#[command(about = "Falcon 9 booster landing forecast service")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "forecaster.toml")]
    pub config: String,

    /// Override `server.bind` from the config file
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the TOML file named by `--config` and applies command-line overrides.
    pub fn resolve(&self) -> crate::Result<(toml_config::TomlConfig, toml_config::ConfigSource)> {
        let (mut config, source) = toml_config::TomlConfig::load_or_default(&self.config)?;
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        Ok((config, source))
    }
}
