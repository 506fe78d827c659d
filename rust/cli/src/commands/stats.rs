use std::io::Write;

use arcade_floor::Floor;

use crate::error::CliError;
use crate::formatters::format_stats;

pub fn handle_stats_command(floor: &Floor, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let stats = floor.stats()?;
    if json {
        let text = serde_json::to_string_pretty(&stats)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }
    for line in format_stats(&stats) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
