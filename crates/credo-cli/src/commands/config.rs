//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use credo_engine::EngineConfig;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let engine = match args.preset.as_deref() {
        Some(name) => EngineConfig::preset(name)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown preset: {}", name)))?,
        None => config.engine.clone(),
    };
    if let Some(path) = &config.source {
        eprintln!("{}", formatter.info(&format!("Loaded from {}", path.display())));
    }
    print!("{}", engine.to_toml()?);
    Ok(())
}
