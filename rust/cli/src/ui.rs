//! Terminal output: error and warning lines, and the buffered presenter the
//! play loop drains after every step.

use std::cell::{Cell, RefCell};
use std::io::Write;

use arcade_floor::{GameId, Presenter, RoundView, SettlementEntry, Tone};

use crate::formatters::{render_view, tone_marker};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Collects presenter calls as text lines. The floor calls back through
/// `&self`, so lines are buffered and written out by the caller.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    lines: RefCell<Vec<String>>,
    flashed: Cell<Option<Tone>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes and clears the buffered lines.
    pub fn flush_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for line in self.lines.borrow_mut().drain(..) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Tone of the last balance flash, cleared on read.
    pub fn take_flash(&self) -> Option<Tone> {
        self.flashed.take()
    }

    fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }
}

impl Presenter for TerminalPresenter {
    fn render_hand(&self, _game: GameId, view: &RoundView) {
        for line in render_view(view) {
            self.push(format!("  {}", line));
        }
    }

    fn set_status(&self, _game: GameId, message: &str, tone: Tone) {
        self.push(format!("[{}] {}", tone_marker(tone), message));
    }

    fn log_settlement(&self, entry: &SettlementEntry) {
        self.push(format!(
            "Settled {}: bet {}, payout {}, net {}",
            entry.game.title(),
            entry.bet,
            entry.payout,
            entry.net_label()
        ));
    }

    fn flash_balance(&self, tone: Tone) {
        self.flashed.set(Some(tone));
    }
}
