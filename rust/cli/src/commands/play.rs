//! # Play Command
//!
//! Runs one round of any floor game in the terminal. The stake is debited
//! when the round opens; action lines are then read from stdin until the
//! round settles.
//!
//! Timed inputs (crash and derby ticks, the reflex signal, countdowns, the
//! memory pattern finishing) are not fired on a schedule here: an empty
//! line fires whichever one the round is waiting on. Elapsed time itself
//! is always measured by the floor's clock, so a reflex tap scores the real
//! delay since the signal and a late quiz answer counts as a timeout. A
//! round abandoned with `q` or end of input is voided and its stake
//! returned.

use std::io::{BufRead, Write};

use arcade_floor::{Floor, GameId, RoundOptions, RoundState, Stage, present};

use crate::error::CliError;
use crate::formatters::tone_marker;
use crate::ui::{self, TerminalPresenter};
use crate::validation::{ParseResult, parse_play_input};

#[derive(Debug, Clone, Copy)]
pub struct PlayRequest {
    pub game: GameId,
    pub stake: f64,
    pub options: RoundOptions,
}

pub fn handle_play_command(
    floor: &Floor,
    request: PlayRequest,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let game = request.game;
    writeln!(
        out,
        "play: game={} stake={} balance={}",
        game,
        request.stake,
        floor.balance()?
    )?;

    let presenter = TerminalPresenter::new();
    let mut state = floor.open_round(game, request.stake, request.options, None)?;
    writeln!(out, "{} | bet {} credits", game.title(), state.bet)?;
    show(floor, &state, &presenter, out)?;

    let handle = state
        .handle()
        .ok_or_else(|| CliError::InvalidInput("round did not open".into()))?;

    while state.stage == Stage::Committed {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };

        let actions = match parse_play_input(&line) {
            ParseResult::Quit => break,
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
            ParseResult::Fire => match state.timer {
                Some(timer) => vec![timer.input],
                None => {
                    ui::display_warning(err, "Nothing is pending. Enter an action.")?;
                    continue;
                }
            },
            ParseResult::Actions(actions) => actions,
        };

        for action in actions {
            match floor.act(&handle, action) {
                Ok(next) => state = next,
                Err(e) => {
                    ui::write_error(err, &e.to_string())?;
                    break;
                }
            }
            if state.stage != Stage::Committed {
                break;
            }
        }
        show(floor, &state, &presenter, out)?;
    }

    if state.stage == Stage::Committed {
        tracing::debug!(%game, round_id = %handle.round_id, "round abandoned, voiding");
        for entry in floor.void_active()? {
            writeln!(out, "{}", entry.message)?;
        }
    }
    writeln!(out, "Balance: {} credits", floor.balance()?)?;
    Ok(())
}

fn show(
    floor: &Floor,
    state: &RoundState,
    presenter: &TerminalPresenter,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    present(state, presenter);
    presenter.flush_to(out)?;
    if let Some(tone) = presenter.take_flash() {
        writeln!(out, "({}) {} credits", tone_marker(tone), floor.balance()?)?;
    }
    if state.stage == Stage::Committed
        && let Some(timer) = state.timer
    {
        writeln!(out, "  [Enter] {} after {}ms", timer.input.name(), timer.after_ms)?;
    }
    Ok(())
}

fn read_line(input: &mut dyn BufRead) -> Result<Option<String>, CliError> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}
