use std::io::Write;

use arcade_floor::Floor;

use crate::error::CliError;
use crate::formatters::format_settlement;

pub fn handle_history_command(
    floor: &Floor,
    limit: Option<usize>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if limit == Some(0) {
        return Err(CliError::InvalidInput("limit must be >= 1".into()));
    }
    let entries = floor.recent(limit)?;
    if json {
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }
    if entries.is_empty() {
        writeln!(out, "No settlements yet.")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(out, "{}", format_settlement(entry))?;
    }
    Ok(())
}
