use std::io::Write;

use arcade_floor::Floor;

use crate::error::CliError;

/// Shows the alias, or sets it when `name` is given. An empty name clears it.
pub fn handle_alias_command(
    floor: &Floor,
    name: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let alias = match name {
        Some(raw) => floor.set_alias(&raw)?,
        None => floor.alias()?,
    };
    match alias {
        Some(alias) => writeln!(out, "Alias: {}", alias)?,
        None => writeln!(out, "No alias set.")?,
    }
    Ok(())
}
