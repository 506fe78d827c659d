use std::io::Write;

use crate::config::ConfigResolved;
use crate::error::CliError;

/// Prints every resolved setting with the layer it came from.
pub fn handle_cfg_command(resolved: &ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let config = &resolved.config;
    let sources = &resolved.sources;
    let tables = serde_json::to_value(&config.tables)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let display = serde_json::json!({
        "starting_credits": { "value": config.starting_credits, "source": sources.starting_credits },
        "log_capacity": { "value": config.log_capacity, "source": sources.log_capacity },
        "seed": { "value": config.seed, "source": sources.seed },
        "data_dir": { "value": config.data_dir.display().to_string(), "source": sources.data_dir },
        "log_format": { "value": config.log_format, "source": sources.log_format },
        "tables": { "value": tables, "source": sources.tables },
    });
    let text = serde_json::to_string_pretty(&display)
        .map_err(|e| CliError::Config(e.to_string()))?;
    writeln!(out, "{}", text)?;
    Ok(())
}
