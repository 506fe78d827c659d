//! Per-game round controllers, grouped by archetype, and the factory that
//! builds one from a game id and the player's pre-round options.

pub mod blackjack;
pub mod cashout;
pub mod chance;
pub mod comparison;
pub mod craps;
pub mod race;
pub mod showdown;
pub mod skill;

use std::sync::Arc;

use arcade_engine::deck::Deck;

use crate::clock::Clock;
use crate::errors::FloorError;
use crate::round::{GameId, Pick, RoundController, RoundOptions};
use crate::tables::GameTables;

use self::blackjack::BlackjackRound;
use self::cashout::{CrashRound, CrossyRound, MinesRound};
use self::chance::{InstantRound, Limbo, Plinko, Roulette, Skee, Slots};
use self::comparison::{Baccarat, CeeLo, Duel, Triad};
use self::craps::CrapsRound;
use self::race::DerbyRound;
use self::showdown::PokerRound;
use self::skill::{MemoryRound, QuizRound, ReflexRound, TargetRound};

/// Limbo target used when the player does not name one.
pub const DEFAULT_LIMBO_TARGET: f64 = 2.0;

/// Checks the options a game needs before any credits move.
pub fn check_options(
    game: GameId,
    options: &RoundOptions,
    tables: &GameTables,
) -> Result<(), FloorError> {
    match game {
        GameId::Roulette => match options.pick {
            Some(Pick::Red | Pick::Black | Pick::Green) => Ok(()),
            _ => Err(FloorError::option(game, "pick red, black or green")),
        },
        GameId::Baccarat => match options.pick {
            Some(Pick::Player | Pick::Banker | Pick::Tie) => Ok(()),
            _ => Err(FloorError::option(game, "pick player, banker or tie")),
        },
        GameId::Derby => match options.pick {
            None | Some(Pick::Nova | Pick::Comet | Pick::Eclipse) => Ok(()),
            _ => Err(FloorError::option(game, "pick nova, comet or eclipse")),
        },
        GameId::Limbo => {
            let target = options.target.unwrap_or(DEFAULT_LIMBO_TARGET);
            let min = tables.limbo.min_target;
            if !target.is_finite() || target < min {
                return Err(FloorError::option(
                    game,
                    format!("target must be at least {min:.2}x"),
                ));
            }
            Ok(())
        }
        GameId::Crash => check_auto_target(game, options.target, tables.crash.min_auto_target),
        GameId::Mines => {
            if let Some(bombs) = options.bombs {
                let (lo, hi) = (tables.mines.min_bombs, tables.mines.max_bombs);
                if !(lo..=hi).contains(&bombs) {
                    return Err(FloorError::option(
                        game,
                        format!("pick a bomb count between {lo} and {hi}"),
                    ));
                }
            }
            check_auto_target(game, options.target, 1.0)
        }
        _ => Ok(()),
    }
}

fn check_auto_target(game: GameId, target: Option<f64>, min: f64) -> Result<(), FloorError> {
    match target {
        Some(t) if !t.is_finite() || t < min => Err(FloorError::option(
            game,
            format!("auto cash-out target must be at least {min:.2}x"),
        )),
        _ => Ok(()),
    }
}

/// Builds the controller for one round. `deck` replaces the shuffled deck
/// for card games and is ignored elsewhere; timed games read `clock`.
pub fn build(
    game: GameId,
    bet: u64,
    options: &RoundOptions,
    tables: &GameTables,
    deck: Option<Deck>,
    clock: &Arc<dyn Clock>,
) -> Result<Box<dyn RoundController>, FloorError> {
    check_options(game, options, tables)?;
    let pick = options.pick;
    let picked = |pick: Option<Pick>| pick.ok_or_else(|| FloorError::option(game, "a pick is required"));

    Ok(match game {
        GameId::Slots => Box::new(InstantRound::new(bet, Slots::new(tables.slots.clone()))),
        GameId::Duel => Box::new(InstantRound::new(bet, Duel::new(tables.duel.clone(), deck))),
        GameId::Roulette => Box::new(InstantRound::new(
            bet,
            Roulette::new(tables.roulette.clone(), picked(pick)?),
        )),
        GameId::Limbo => Box::new(InstantRound::new(
            bet,
            Limbo::new(
                tables.limbo.clone(),
                options.target.unwrap_or(DEFAULT_LIMBO_TARGET),
            ),
        )),
        GameId::Plinko => Box::new(InstantRound::new(
            bet,
            Plinko::new(tables.plinko.clone(), options.lane),
        )),
        GameId::Skee => Box::new(InstantRound::new(bet, Skee::new(tables.skee.clone()))),
        GameId::Baccarat => Box::new(InstantRound::new(
            bet,
            Baccarat::new(tables.baccarat.clone(), picked(pick)?, deck),
        )),
        GameId::Triad => Box::new(InstantRound::new(bet, Triad::new(tables.triad.clone(), deck))),
        GameId::CeeLo => Box::new(InstantRound::new(bet, CeeLo::new(tables.cee_lo.clone()))),
        GameId::Blackjack => Box::new(BlackjackRound::new(tables.blackjack.clone(), bet, deck)),
        GameId::Poker => Box::new(PokerRound::new(tables.poker.clone(), bet, deck)),
        GameId::Craps => Box::new(CrapsRound::new(tables.craps.clone(), bet)),
        GameId::Crash => Box::new(CrashRound::new(tables.crash.clone(), bet, options.target)),
        GameId::Mines => Box::new(MinesRound::new(
            tables.mines.clone(),
            bet,
            options.bombs.unwrap_or(tables.mines.default_bombs),
            options.target,
        )),
        GameId::Crossy => Box::new(CrossyRound::new(tables.crossy.clone(), bet)),
        GameId::Reflex => Box::new(ReflexRound::new(tables.reflex.clone(), bet, Arc::clone(clock))),
        GameId::Memory => Box::new(MemoryRound::new(tables.memory.clone(), bet)),
        GameId::Quiz => Box::new(QuizRound::new(tables.quiz.clone(), bet, Arc::clone(clock))),
        GameId::Target => Box::new(TargetRound::new(tables.target.clone(), bet, Arc::clone(clock))),
        GameId::Derby => Box::new(DerbyRound::new(
            tables.derby.clone(),
            bet,
            pick.unwrap_or(Pick::Nova),
        )),
    })
}
