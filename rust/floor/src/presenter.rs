//! What a front-end has to provide to show the floor, and the two-step
//! confirmation used for destructive commands.

use std::time::{Duration, Instant};

use crate::history::SettlementEntry;
use crate::round::{GameId, RoundState, RoundView, Stage, Tone};

pub const DEFAULT_CONFIRM_WINDOW: Duration = Duration::from_secs(4);

pub trait Presenter {
    fn render_hand(&self, game: GameId, view: &RoundView);

    fn set_status(&self, game: GameId, message: &str, tone: Tone);

    fn log_settlement(&self, entry: &SettlementEntry);

    fn flash_balance(&self, tone: Tone);
}

/// Pushes one round state through `presenter`.
pub fn present(state: &RoundState, presenter: &dyn Presenter) {
    presenter.render_hand(state.game, &state.view);
    presenter.set_status(state.game, &state.status, state.tone);
    if state.stage != Stage::Settled {
        return;
    }
    if let Some(entry) = &state.settlement {
        presenter.log_settlement(entry);
        if entry.payout > 0 {
            let tone = match entry.tone {
                Tone::Positive => Tone::Positive,
                _ => Tone::Neutral,
            };
            presenter.flash_balance(tone);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    /// First request; ask again within the window.
    Armed,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct ConfirmGate {
    window: Duration,
    armed_at: Option<Instant>,
}

impl Default for ConfirmGate {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_WINDOW)
    }
}

impl ConfirmGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    pub fn request(&mut self, now: Instant) -> Confirm {
        if self.is_armed(now) {
            self.armed_at = None;
            Confirm::Confirmed
        } else {
            self.armed_at = Some(now);
            Confirm::Armed
        }
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        self.armed_at
            .is_some_and(|at| now.saturating_duration_since(at) <= self.window)
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use uuid::Uuid;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl Presenter for Recorder {
        fn render_hand(&self, game: GameId, _view: &RoundView) {
            self.calls.borrow_mut().push(format!("render {game}"));
        }

        fn set_status(&self, _game: GameId, message: &str, tone: Tone) {
            self.calls.borrow_mut().push(format!("status {tone:?} {message}"));
        }

        fn log_settlement(&self, entry: &SettlementEntry) {
            self.calls.borrow_mut().push(format!("log {}", entry.net_label()));
        }

        fn flash_balance(&self, tone: Tone) {
            self.calls.borrow_mut().push(format!("flash {tone:?}"));
        }
    }

    fn settled(bet: u64, payout: u64) -> RoundState {
        let entry = SettlementEntry::new(Uuid::new_v4(), GameId::Duel, bet, payout, "done".into());
        RoundState {
            game: GameId::Duel,
            round_id: Some(entry.round_id),
            stage: Stage::Settled,
            bet,
            view: RoundView::Idle,
            status: entry.message.clone(),
            tone: entry.tone,
            timer: None,
            settlement: Some(entry),
        }
    }

    #[test]
    fn settled_win_logs_and_flashes() {
        let recorder = Recorder::default();
        present(&settled(25, 50), &recorder);
        assert_eq!(
            *recorder.calls.borrow(),
            vec!["render duel", "status Positive done", "log +25", "flash Positive"]
        );
    }

    #[test]
    fn push_flashes_neutral_and_loss_does_not_flash() {
        let recorder = Recorder::default();
        present(&settled(25, 25), &recorder);
        assert_eq!(recorder.calls.borrow().last().unwrap(), "flash Neutral");

        let recorder = Recorder::default();
        present(&settled(25, 0), &recorder);
        assert_eq!(recorder.calls.borrow().last().unwrap(), "log -25");
    }

    #[test]
    fn idle_state_only_renders() {
        let recorder = Recorder::default();
        present(&RoundState::idle(GameId::Mines, None), &recorder);
        assert_eq!(recorder.calls.borrow().len(), 2);
    }

    #[test]
    fn gate_confirms_inside_window_only() {
        let start = Instant::now();
        let mut gate = ConfirmGate::default();
        assert_eq!(gate.request(start), Confirm::Armed);
        assert_eq!(gate.request(start + Duration::from_secs(3)), Confirm::Confirmed);
        assert!(!gate.is_armed(start + Duration::from_secs(3)));

        assert_eq!(gate.request(start), Confirm::Armed);
        assert_eq!(gate.request(start + Duration::from_secs(5)), Confirm::Armed);
        gate.disarm();
        assert!(!gate.is_armed(start + Duration::from_secs(5)));
    }
}
