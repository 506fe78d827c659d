use std::io::{BufRead, Write};
use std::time::Instant;

use arcade_floor::{Confirm, ConfirmGate, Floor};

use crate::error::CliError;

/// Restores the starting credits. Without `--yes` the reset must be
/// requested a second time, by typing `reset`, inside the confirm window.
pub fn handle_reset_command(
    floor: &Floor,
    yes: bool,
    stats: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if !yes {
        let mut gate = ConfirmGate::default();
        gate.request(Instant::now());
        writeln!(
            out,
            "This resets your bankroll{}. Type 'reset' to confirm:",
            if stats { " and stats" } else { "" }
        )?;
        out.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let confirmed = line.trim().eq_ignore_ascii_case("reset")
            && gate.request(Instant::now()) == Confirm::Confirmed;
        if !confirmed {
            gate.disarm();
            writeln!(out, "Reset cancelled.")?;
            return Ok(());
        }
    }

    let balance = floor.reset_bankroll()?;
    writeln!(out, "Bankroll reset to {} credits.", balance)?;
    if stats {
        floor.reset_stats()?;
        writeln!(out, "Stats cleared.")?;
    }
    Ok(())
}
