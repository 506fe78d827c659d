use std::io::Write;

use arcade_floor::{GameId, GameTables};

use crate::error::CliError;

pub fn handle_games_command(tables: &GameTables, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "{:<10} {:<18} {:>9} {:>5}", "GAME", "TITLE", "MIN STAKE", "STEP")?;
    for game in GameId::ALL {
        let limits = tables.limits(game);
        writeln!(
            out,
            "{:<10} {:<18} {:>9} {:>5}",
            game.slug(),
            game.title(),
            limits.min_stake,
            limits.step
        )?;
    }
    Ok(())
}
