use std::io::Write;

use arcade_floor::Floor;

use crate::error::CliError;

pub fn handle_balance_command(floor: &Floor, out: &mut dyn Write) -> Result<(), CliError> {
    let balance = floor.balance()?;
    match floor.alias()? {
        Some(alias) => writeln!(out, "{}: {} credits", alias, balance)?,
        None => writeln!(out, "Balance: {} credits", balance)?,
    }
    Ok(())
}
