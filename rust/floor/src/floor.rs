//! The floor session: one bankroll shared by every game, the active round
//! per game, and the bookkeeping that runs once when a round settles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arcade_engine::deck::Deck;
use arcade_engine::rng::GameRng;
use uuid::Uuid;

use crate::clock::{Clock, TokioClock};
use crate::errors::FloorError;
use crate::events::{EventBus, EventSubscription, FloorEvent, Topic};
use crate::games;
use crate::history::{SettlementEntry, SettlementLog};
use crate::ledger::Bankroll;
use crate::profile::Profile;
use crate::round::{
    normalize_stake, Action, GameId, Outcome, RoundController, RoundHandle, RoundOptions,
    RoundState, Stage, Step, Tone,
};
use crate::settings::{FloorSettings, SettingsError};
use crate::stats::{StatsSnapshot, StatsTracker};
use crate::store::{KeyValueStore, Slot, ALIAS_KEY, BANKROLL_KEY, HISTORY_KEY, STATS_KEY};

#[derive(Debug)]
struct ActiveRound {
    round_id: Uuid,
    controller: Box<dyn RoundController>,
    status: String,
    tone: Tone,
}

impl ActiveRound {
    fn state(&self, game: GameId) -> RoundState {
        RoundState {
            game,
            round_id: Some(self.round_id),
            stage: Stage::Committed,
            bet: self.controller.bet(),
            view: self.controller.view(),
            status: self.status.clone(),
            tone: self.tone,
            timer: self.controller.timer(),
            settlement: None,
        }
    }
}

/// How a round left the active map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Played,
    Voided,
}

#[derive(Debug)]
pub struct Floor {
    settings: FloorSettings,
    bus: EventBus,
    bankroll: Bankroll,
    stats: StatsTracker,
    profile: Profile,
    log: SettlementLog,
    rounds: Mutex<HashMap<GameId, ActiveRound>>,
    rng: Mutex<GameRng>,
    clock: Arc<dyn Clock>,
}

impl Floor {
    /// Restores bankroll, stats, alias and the settlement log from `store`
    /// and opens the floor.
    pub fn open(
        settings: FloorSettings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SettingsError> {
        Self::open_with_clock(settings, store, Arc::new(TokioClock::new()))
    }

    /// Like [`Floor::open`], timing reaction windows and countdowns with `clock`.
    pub fn open_with_clock(
        settings: FloorSettings,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let bus = EventBus::new();
        let bankroll = Bankroll::open(
            settings.starting_credits,
            Slot::new(Arc::clone(&store), BANKROLL_KEY),
            bus.clone(),
        );
        let stats = StatsTracker::open(Slot::new(Arc::clone(&store), STATS_KEY), bus.clone());
        let profile = Profile::open(Slot::new(Arc::clone(&store), ALIAS_KEY));
        let rng = match settings.seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        tracing::info!(
            starting_credits = settings.starting_credits,
            seeded = settings.seed.is_some(),
            "floor opened"
        );
        Ok(Self {
            log: SettlementLog::open(settings.log_capacity, Slot::new(store, HISTORY_KEY)),
            settings,
            bus,
            bankroll,
            stats,
            profile,
            rounds: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            clock,
        })
    }

    pub fn settings(&self) -> &FloorSettings {
        &self.settings
    }

    pub fn start_round(
        &self,
        game: GameId,
        stake: f64,
        options: RoundOptions,
    ) -> Result<RoundHandle, FloorError> {
        self.start_round_with_deck(game, stake, options, None)
    }

    /// Like [`Floor::start_round`], with a prearranged deck for card games.
    pub fn start_round_with_deck(
        &self,
        game: GameId,
        stake: f64,
        options: RoundOptions,
        deck: Option<Deck>,
    ) -> Result<RoundHandle, FloorError> {
        self.open_round(game, stake, options, deck)?
            .handle()
            .ok_or_else(|| FloorError::illegal(game, "round did not open"))
    }

    /// Starts a round and returns its opening state: committed and awaiting
    /// input, or already settled for games that resolve on the deal.
    pub fn open_round(
        &self,
        game: GameId,
        stake: f64,
        options: RoundOptions,
        deck: Option<Deck>,
    ) -> Result<RoundState, FloorError> {
        let bet = normalize_stake(stake, self.settings.tables.limits(game)).inspect_err(|err| {
            tracing::debug!(%game, stake, error = %err, "stake rejected");
        })?;
        let mut controller = games::build(
            game,
            bet,
            &options,
            &self.settings.tables,
            deck,
            &self.clock,
        )?;

        let mut rounds = self
            .rounds
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        if rounds.contains_key(&game) {
            return Err(FloorError::illegal(
                game,
                format!("a {} round is already in progress", game.title()),
            ));
        }
        if !self.bankroll.debit(bet)? {
            let balance = self.bankroll.balance()?;
            tracing::debug!(%game, bet, balance, "stake rejected, balance too low");
            return Err(FloorError::InsufficientBalance {
                stake: bet,
                balance,
            });
        }

        let round_id = Uuid::new_v4();
        tracing::info!(%game, %round_id, bet, "round started");
        let opened = {
            let mut rng = self.rng.lock().map_err(|_| FloorError::StoragePoisoned)?;
            controller.open(&mut rng)
        };
        let step = match opened {
            Ok(step) => step,
            Err(err) => {
                tracing::warn!(%game, %round_id, error = %err, "round failed to open, refunding");
                self.bankroll.credit(bet as i64)?;
                return Err(err);
            }
        };

        match step {
            Step::Continue { status } => {
                self.publish_round(game, round_id, Stage::Committed, &status, Tone::Neutral);
                let active = ActiveRound {
                    round_id,
                    controller,
                    status,
                    tone: Tone::Neutral,
                };
                let state = active.state(game);
                rounds.insert(game, active);
                Ok(state)
            }
            Step::Settle(outcome) => {
                drop(rounds);
                self.close(game, round_id, controller, outcome, Closing::Played)
            }
        }
    }

    /// Feeds one action to the round `handle` names.
    pub fn act(&self, handle: &RoundHandle, action: Action) -> Result<RoundState, FloorError> {
        let game = handle.game;
        let mut rounds = self
            .rounds
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        let active = match rounds.get_mut(&game) {
            Some(active) if active.round_id == handle.round_id => active,
            _ => {
                tracing::debug!(%game, round_id = %handle.round_id, action = action.name(), "stale round handle");
                return Err(FloorError::illegal(game, "that round is no longer active"));
            }
        };

        let step = {
            let mut rng = self.rng.lock().map_err(|_| FloorError::StoragePoisoned)?;
            active.controller.act(action, &mut rng)
        }
        .inspect_err(|err| {
            tracing::debug!(%game, action = action.name(), error = %err, "action refused");
        })?;
        tracing::debug!(%game, round_id = %handle.round_id, action = action.name(), "action applied");

        match step {
            Step::Continue { status } => {
                active.status = status;
                active.tone = Tone::Neutral;
                let state = active.state(game);
                drop(rounds);
                self.publish_round(game, handle.round_id, Stage::Committed, &state.status, state.tone);
                Ok(state)
            }
            Step::Settle(outcome) => {
                let Some(closed) = rounds.remove(&game) else {
                    return Err(FloorError::illegal(game, "that round is no longer active"));
                };
                drop(rounds);
                self.close(game, closed.round_id, closed.controller, outcome, Closing::Played)
            }
        }
    }

    /// Current state of `game`: the active round, or an idle state carrying
    /// the game's latest settlement.
    pub fn snapshot(&self, game: GameId) -> Result<RoundState, FloorError> {
        {
            let rounds = self
                .rounds
                .lock()
                .map_err(|_| FloorError::StoragePoisoned)?;
            if let Some(active) = rounds.get(&game) {
                return Ok(active.state(game));
            }
        }
        let last = self
            .log
            .last_for(game)
            .map_err(|_| FloorError::StoragePoisoned)?;
        Ok(RoundState::idle(game, last))
    }

    pub fn active_games(&self) -> Result<Vec<GameId>, FloorError> {
        let rounds = self
            .rounds
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        let mut games: Vec<GameId> = rounds.keys().copied().collect();
        games.sort();
        Ok(games)
    }

    /// Settles every active round with a refund of its bet.
    pub fn void_active(&self) -> Result<Vec<SettlementEntry>, FloorError> {
        let drained: Vec<(GameId, ActiveRound)> = {
            let mut rounds = self
                .rounds
                .lock()
                .map_err(|_| FloorError::StoragePoisoned)?;
            rounds.drain().collect()
        };
        let mut entries = Vec::with_capacity(drained.len());
        for (game, active) in drained {
            let bet = active.controller.bet();
            let outcome = Outcome {
                payout: bet,
                message: format!("Round voided. Stake of {bet} credits returned."),
            };
            let state = self.close(game, active.round_id, active.controller, outcome, Closing::Voided)?;
            entries.extend(state.settlement);
        }
        Ok(entries)
    }

    /// Voids active rounds, then restores the starting credits.
    pub fn reset_bankroll(&self) -> Result<u64, FloorError> {
        let voided = self.void_active()?;
        if !voided.is_empty() {
            tracing::info!(voided = voided.len(), "voided active rounds before reset");
        }
        self.bankroll.reset()
    }

    pub fn reset_stats(&self) -> Result<StatsSnapshot, FloorError> {
        self.stats.reset()
    }

    pub fn sync_from_storage(&self) -> Result<Option<u64>, FloorError> {
        self.bankroll.sync_from_storage()
    }

    pub fn subscribe(&self, topic: Topic) -> EventSubscription {
        self.bus.subscribe(topic)
    }

    pub fn balance(&self) -> Result<u64, FloorError> {
        self.bankroll.balance()
    }

    pub fn stats(&self) -> Result<StatsSnapshot, FloorError> {
        self.stats.snapshot()
    }

    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<SettlementEntry>, FloorError> {
        self.log
            .recent(limit)
            .map_err(|_| FloorError::StoragePoisoned)
    }

    pub fn alias(&self) -> Result<Option<String>, FloorError> {
        self.profile.alias()
    }

    pub fn set_alias(&self, raw: &str) -> Result<Option<String>, FloorError> {
        self.profile.set_alias(raw)
    }

    /// Runs exactly once per round, after the controller has left the
    /// active map.
    fn close(
        &self,
        game: GameId,
        round_id: Uuid,
        controller: Box<dyn RoundController>,
        outcome: Outcome,
        closing: Closing,
    ) -> Result<RoundState, FloorError> {
        let bet = controller.bet();
        let voided = closing == Closing::Voided;
        if outcome.payout > 0 {
            self.bankroll
                .credit(i64::try_from(outcome.payout).unwrap_or(i64::MAX))?;
        }
        let entry = SettlementEntry::new(round_id, game, bet, outcome.payout, outcome.message);
        self.log
            .record(entry.clone())
            .map_err(|_| FloorError::StoragePoisoned)?;
        if !voided {
            self.stats.record(game, entry.net)?;
        }
        tracing::info!(
            %game,
            %round_id,
            bet,
            payout = entry.payout,
            net = entry.net,
            voided,
            "round settled"
        );
        self.bus.publish(FloorEvent::Settlement {
            entry: entry.clone(),
        });
        self.publish_round(game, round_id, Stage::Settled, &entry.message, entry.tone);

        Ok(RoundState {
            game,
            round_id: Some(round_id),
            stage: Stage::Settled,
            bet,
            view: controller.view(),
            status: entry.message.clone(),
            tone: entry.tone,
            timer: None,
            settlement: Some(entry),
        })
    }

    fn publish_round(&self, game: GameId, round_id: Uuid, stage: Stage, status: &str, tone: Tone) {
        self.bus.publish(FloorEvent::Round {
            game,
            round_id,
            stage,
            status: status.to_string(),
            tone,
        });
    }
}
