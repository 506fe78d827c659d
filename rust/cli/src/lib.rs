//! # Arcade CLI Library
//!
//! Terminal front-end for the arcade floor. Every subcommand opens the
//! floor on the configured data directory, so the bankroll, stats, alias
//! and settlement log carry over between invocations.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["arcade", "play", "slots", "--stake", "10"];
//! let code = arcade_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play one round of a game, reading actions from stdin
//! - `balance`: Show the bankroll
//! - `reset`: Restore the starting credits (asks for confirmation)
//! - `stats`: Aggregate results
//! - `history`: Recent settlements
//! - `alias`: Show or set the display alias
//! - `cfg`: Display configuration settings and their sources
//! - `games`: List games and stake limits

use clap::Parser;
use std::io::{BufRead, Write};
use std::sync::Arc;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod ui;
pub mod validation;

use cli::{ArcadeCli, Commands};
use commands::{
    PlayRequest, handle_alias_command, handle_balance_command, handle_cfg_command,
    handle_games_command, handle_history_command, handle_play_command, handle_reset_command,
    handle_stats_command, open_floor,
};

use arcade_floor::{Clock, RoundOptions, TokioClock};
pub use error::CliError;

const COMMANDS: &[&str] = &[
    "play", "balance", "reset", "stats", "history", "alias", "cfg", "games",
];

/// Main entry point, reading interactive input from stdin.
///
/// Returns `0` on success and `2` on any error.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, &mut stdin_lock, out, err)
}

/// Same as [`run`] with an explicit input stream for `play` and `reset`.
pub fn run_with_input<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    run_with_clock(args, input, out, err, Arc::new(TokioClock::new()))
}

/// Same as [`run_with_input`], timing rounds with `clock`.
pub fn run_with_clock<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
    clock: Arc<dyn Clock>,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ArcadeCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    match dispatch(cli.cmd, &clock, input, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            if ui::write_error(err, &e.to_string()).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    if writeln!(err, "{}", e).is_err()
        || writeln!(err).is_err()
        || writeln!(err, "Arcade floor CLI").is_err()
        || writeln!(err, "Usage: arcade <command> [options]\n").is_err()
        || writeln!(err, "Commands:").is_err()
    {
        return exit_code::ERROR;
    }
    for c in COMMANDS {
        if writeln!(err, "  {}", c).is_err() {
            return exit_code::ERROR;
        }
    }
    let _ = writeln!(err, "\nFor full help, run: arcade --help");
    exit_code::ERROR
}

fn dispatch(
    cmd: Commands,
    clock: &Arc<dyn Clock>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    match cmd {
        Commands::Cfg => handle_cfg_command(&resolved, out),
        Commands::Games => handle_games_command(&resolved.config.tables, out),
        Commands::Play {
            game,
            stake,
            pick,
            target,
            bombs,
            lane,
        } => {
            let floor = open_floor(&resolved.config, clock, err)?;
            let request = PlayRequest {
                game,
                stake,
                options: RoundOptions {
                    pick,
                    target,
                    bombs,
                    lane,
                },
            };
            handle_play_command(&floor, request, input, out, err)
        }
        Commands::Balance => {
            let floor = open_floor(&resolved.config, clock, err)?;
            handle_balance_command(&floor, out)
        }
        Commands::Reset { yes, stats } => {
            let floor = open_floor(&resolved.config, clock, err)?;
            handle_reset_command(&floor, yes, stats, input, out)
        }
        Commands::Stats { json } => {
            let floor = open_floor(&resolved.config, clock, err)?;
            handle_stats_command(&floor, json, out)
        }
        Commands::History { limit, json } => {
            let floor = open_floor(&resolved.config, clock, err)?;
            handle_history_command(&floor, limit, json, out)
        }
        Commands::Alias { name } => {
            let floor = open_floor(&resolved.config, clock, err)?;
            handle_alias_command(&floor, name, out)
        }
    }
}
