//! Command handler modules for the arcade CLI.
//!
//! Each command lives in its own file and exposes
//! `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`, taking its
//! output streams as `&mut dyn Write`.

mod alias;
mod balance;
mod cfg;
mod games;
mod history;
mod play;
mod reset;
mod stats;

pub use alias::handle_alias_command;
pub use balance::handle_balance_command;
pub use cfg::handle_cfg_command;
pub use games::handle_games_command;
pub use history::handle_history_command;
pub use play::{PlayRequest, handle_play_command};
pub use reset::handle_reset_command;
pub use stats::handle_stats_command;

use std::io::Write;
use std::sync::Arc;

use arcade_floor::{Clock, FileStore, Floor, KeyValueStore, MemoryStore};

use crate::config::Config;
use crate::error::CliError;
use crate::ui;

/// Opens the floor on the configured data directory. An unusable directory
/// degrades to an in-memory session with a warning.
pub fn open_floor(
    config: &Config,
    clock: &Arc<dyn Clock>,
    err: &mut dyn Write,
) -> Result<Floor, CliError> {
    let store: Arc<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(dir = %config.data_dir.display(), error = %e, "data directory unavailable");
            ui::display_warning(
                err,
                &format!("{}; progress will not be saved this session", e),
            )?;
            Arc::new(MemoryStore::new())
        }
    };
    Floor::open_with_clock(config.floor_settings(), store, Arc::clone(clock))
        .map_err(|e| CliError::Config(e.to_string()))
}
