//! Drives timer-based inputs (crash and derby ticks, reflex windows, memory
//! replay, quiz and drone countdowns) on the tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::errors::FloorError;
use crate::floor::Floor;
use crate::round::{GameId, RoundHandle, RoundState, Stage, TimerRequest};

/// One pending timer per game. Arming a timer for a game aborts the one
/// already pending for it; a timer that fires for a round that has since
/// settled is refused by the floor's round-id check.
#[derive(Debug)]
pub struct Pacer {
    floor: Arc<Floor>,
    timers: Mutex<HashMap<GameId, JoinHandle<()>>>,
}

impl Pacer {
    pub fn new(floor: Arc<Floor>) -> Self {
        Self {
            floor,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Arms the timer `state` asks for, or cancels the game's timer when the
    /// round is no longer waiting on one. Must be called inside a runtime.
    pub fn follow(&self, handle: RoundHandle, state: &RoundState) -> Result<(), FloorError> {
        match state.timer {
            Some(request) if state.stage == Stage::Committed => self.schedule(handle, request),
            _ => self.cancel(handle.game),
        }
    }

    pub fn schedule(&self, handle: RoundHandle, request: TimerRequest) -> Result<(), FloorError> {
        // no task may run unless it is tracked and can be aborted
        let mut timers = self
            .timers
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        let task = tokio::spawn(run_timers(Arc::clone(&self.floor), handle, request));
        if let Some(previous) = timers.insert(handle.game, task) {
            previous.abort();
        }
        tracing::trace!(game = %handle.game, after_ms = request.after_ms, input = request.input.name(), "timer armed");
        Ok(())
    }

    pub fn cancel(&self, game: GameId) -> Result<(), FloorError> {
        let mut timers = self
            .timers
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        if let Some(task) = timers.remove(&game) {
            task.abort();
        }
        Ok(())
    }

    /// Games whose timer has not yet run to completion.
    pub fn pending(&self) -> Vec<GameId> {
        let Ok(timers) = self.timers.lock() else {
            return Vec::new();
        };
        let mut games: Vec<GameId> = timers
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .map(|(game, _)| *game)
            .collect();
        games.sort();
        games
    }
}

impl Drop for Pacer {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.lock() {
            for (_, task) in timers.drain() {
                task.abort();
            }
        }
    }
}

/// Fires `request`, then keeps firing whatever the resulting state asks
/// for until the round settles or refuses the input.
async fn run_timers(floor: Arc<Floor>, handle: RoundHandle, mut request: TimerRequest) {
    loop {
        tokio::time::sleep(Duration::from_millis(request.after_ms)).await;
        match floor.act(&handle, request.input) {
            Ok(state) => match state.timer {
                Some(next) if state.stage == Stage::Committed => request = next,
                _ => break,
            },
            Err(err) => {
                tracing::debug!(game = %handle.game, error = %err, "timer input refused");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::{Action, RoundOptions, RoundView};
    use crate::settings::FloorSettings;
    use crate::store::MemoryStore;

    fn floor() -> Arc<Floor> {
        Arc::new(Floor::open(FloorSettings::seeded(8), Arc::new(MemoryStore::new())).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn crash_runs_to_settlement_on_ticks() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Crash, 20.0, RoundOptions::default())
            .unwrap();
        pacer
            .follow(handle, &floor.snapshot(GameId::Crash).unwrap())
            .unwrap();
        assert_eq!(pacer.pending(), vec![GameId::Crash]);

        tokio::time::sleep(Duration::from_secs(30)).await;

        let state = floor.snapshot(GameId::Crash).unwrap();
        assert_eq!(state.stage, Stage::Idle);
        let entry = state.settlement.unwrap();
        assert_eq!(entry.round_id, handle.round_id);
        assert!(pacer.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn crash_auto_target_cashes_out() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Crash, 100.0, RoundOptions::target(1.1))
            .unwrap();
        pacer
            .follow(handle, &floor.snapshot(GameId::Crash).unwrap())
            .unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        // every crash point is at least 1.6x, so 1.1x always banks first
        let entry = floor.recent(Some(1)).unwrap().remove(0);
        assert_eq!(entry.payout, 110);
        assert_eq!(floor.balance().unwrap(), 1010);
    }

    #[tokio::test(start_paused = true)]
    async fn reflex_times_out_without_a_tap() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Reflex, 20.0, RoundOptions::default())
            .unwrap();
        pacer
            .follow(handle, &floor.snapshot(GameId::Reflex).unwrap())
            .unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let entry = floor.recent(Some(1)).unwrap().remove(0);
        assert_eq!(entry.message, "Too slow! The reactor vented your wager.");
        assert_eq!(floor.balance().unwrap(), 980);
    }

    #[tokio::test(start_paused = true)]
    async fn reflex_tap_is_timed_from_the_signal() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Reflex, 20.0, RoundOptions::default())
            .unwrap();
        let opened = floor.snapshot(GameId::Reflex).unwrap();
        let delay = opened.timer.unwrap().after_ms;
        pacer.follow(handle, &opened).unwrap();

        tokio::time::sleep(Duration::from_millis(delay + 1)).await;
        let lit = floor.snapshot(GameId::Reflex).unwrap();
        assert!(matches!(lit.view, RoundView::Reflex { lit: true, .. }));

        tokio::time::sleep(Duration::from_millis(199)).await;
        let state = floor.act(&handle, Action::Tap).unwrap();
        let entry = state.settlement.unwrap();
        assert_eq!(entry.message, "Lightning fast! 200ms locks in a 3x payout.");
        assert_eq!(floor.balance().unwrap(), 1040);
    }

    #[tokio::test(start_paused = true)]
    async fn poisoned_timer_map_spawns_nothing() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Reflex, 20.0, RoundOptions::default())
            .unwrap();
        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _timers = pacer.timers.lock().unwrap();
                panic!("poison the timer map");
            });
            assert!(poisoner.join().is_err());
        });

        let request = TimerRequest {
            after_ms: 10,
            input: Action::Signal,
        };
        assert!(matches!(
            pacer.schedule(handle, request),
            Err(FloorError::StoragePoisoned)
        ));
        tokio::time::sleep(Duration::from_secs(5)).await;

        // the signal never fired, so the reactor is still dark
        let state = floor.snapshot(GameId::Reflex).unwrap();
        assert_eq!(state.stage, Stage::Committed);
        assert!(matches!(state.view, RoundView::Reflex { lit: false, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_settlement_stops_pending_timer() {
        let floor = floor();
        let pacer = Pacer::new(Arc::clone(&floor));
        let handle = floor
            .start_round(GameId::Crash, 20.0, RoundOptions::default())
            .unwrap();
        pacer
            .follow(handle, &floor.snapshot(GameId::Crash).unwrap())
            .unwrap();
        let state = floor.act(&handle, Action::CashOut).unwrap();
        pacer.follow(handle, &state).unwrap();
        assert!(pacer.pending().is_empty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(floor.recent(None).unwrap().len(), 1);
        assert_eq!(floor.balance().unwrap(), 1000);
    }
}
