//! Single-shot games: the stake goes in and the outcome is known at once.

use arcade_engine::rng::GameRng;

use crate::errors::FloorError;
use crate::round::{
    pay, round2, Action, GameId, Outcome, Pick, RoundController, RoundView, Step,
};
use crate::tables::{LimboTable, PlinkoTable, RouletteTable, SkeeTable, SlotsTable};

/// Draws one outcome for a single-shot game.
pub trait Resolver: Send + std::fmt::Debug {
    fn game(&self) -> GameId;

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError>;
}

/// Controller that settles inside `open`.
#[derive(Debug)]
pub struct InstantRound<R> {
    bet: u64,
    resolver: R,
    view: RoundView,
}

impl<R: Resolver> InstantRound<R> {
    pub fn new(bet: u64, resolver: R) -> Self {
        Self {
            bet,
            resolver,
            view: RoundView::Idle,
        }
    }
}

impl<R: Resolver> RoundController for InstantRound<R> {
    fn game(&self) -> GameId {
        self.resolver.game()
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let (view, outcome) = self.resolver.resolve(self.bet, rng)?;
        self.view = view;
        Ok(Step::Settle(outcome))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        Err(FloorError::illegal(
            self.game(),
            format!("{} resolves instantly, {} is not available", self.game().title(), action.name()),
        ))
    }

    fn view(&self) -> RoundView {
        self.view.clone()
    }
}

#[derive(Debug)]
pub struct Slots {
    table: SlotsTable,
}

impl Slots {
    pub fn new(table: SlotsTable) -> Self {
        Self { table }
    }

    /// Payout multiplier and message for a finished spin.
    pub fn evaluate(&self, reels: &[String; 3]) -> (f64, String) {
        let t = &self.table;
        let [a, b, c] = reels;
        if a == b && b == c {
            let multiplier = if *a == t.jackpot_symbol {
                t.jackpot
            } else if *a == t.seven_symbol {
                t.triple_seven
            } else {
                t.triple
            };
            return (multiplier, format!("Triple {a}! {multiplier}x payout."));
        }
        if a == b || a == c || b == c {
            return (t.pair, "Nice pair! Stake doubled.".to_string());
        }
        if reels.contains(&t.consolation_symbol) {
            return (
                t.consolation,
                "Lucky clover cushions the loss. Half stake returned.".to_string(),
            );
        }
        (0.0, "No luck this time.".to_string())
    }
}

impl Resolver for Slots {
    fn game(&self) -> GameId {
        GameId::Slots
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let symbols = &self.table.symbols;
        let reels: [String; 3] =
            std::array::from_fn(|_| symbols[rng.below(symbols.len())].clone());
        let (multiplier, message) = self.evaluate(&reels);
        Ok((
            RoundView::Reels {
                symbols: reels.to_vec(),
            },
            Outcome {
                payout: pay(bet, multiplier),
                message,
            },
        ))
    }
}

#[derive(Debug)]
pub struct Roulette {
    table: RouletteTable,
    pick: Pick,
}

impl Roulette {
    pub fn new(table: RouletteTable, pick: Pick) -> Self {
        Self { table, pick }
    }

    pub fn colour_of(pocket: u8) -> Pick {
        match pocket {
            0 => Pick::Green,
            n if n % 2 == 0 => Pick::Black,
            _ => Pick::Red,
        }
    }
}

impl Resolver for Roulette {
    fn game(&self) -> GameId {
        GameId::Roulette
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let pocket = rng.below(self.table.pockets as usize) as u8;
        let colour = Self::colour_of(pocket);
        let name = colour_name(colour);
        let outcome = if colour == self.pick {
            let multiplier = if colour == Pick::Green {
                self.table.green
            } else {
                self.table.colour
            };
            Outcome {
                payout: pay(bet, multiplier),
                message: format!("{pocket} {name}! Your colour hits."),
            }
        } else {
            Outcome {
                payout: 0,
                message: format!("{pocket} {name}. The wheel goes against you."),
            }
        };
        Ok((
            RoundView::Wheel {
                pocket,
                colour,
                pick: self.pick,
            },
            outcome,
        ))
    }
}

fn colour_name(pick: Pick) -> &'static str {
    match pick {
        Pick::Red => "red",
        Pick::Black => "black",
        _ => "green",
    }
}

#[derive(Debug)]
pub struct Limbo {
    table: LimboTable,
    target: f64,
}

impl Limbo {
    /// `target` must already be at least the table minimum; it is capped at
    /// the table maximum here.
    pub fn new(table: LimboTable, target: f64) -> Self {
        let target = target.min(table.max_multiplier);
        Self { table, target }
    }
}

impl Resolver for Limbo {
    fn game(&self) -> GameId {
        GameId::Limbo
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let result = round2(1.0 + rng.unit() * (self.table.max_multiplier - 1.0));
        let target = self.target;
        let outcome = if result >= target {
            Outcome {
                payout: pay(bet, target),
                message: format!("Nice! Beam hit {result:.2}x over your {target:.2}x target."),
            }
        } else {
            Outcome {
                payout: 0,
                message: format!("Beam fizzled at {result:.2}x, below your {target:.2}x target."),
            }
        };
        Ok((
            RoundView::Meter {
                multiplier: result,
                target: Some(target),
                crashed_at: None,
            },
            outcome,
        ))
    }
}

#[derive(Debug)]
pub struct Plinko {
    table: PlinkoTable,
    lane: usize,
}

impl Plinko {
    pub const DEFAULT_LANE: usize = 2;

    pub fn new(table: PlinkoTable, lane: Option<usize>) -> Self {
        let last = table.multipliers.len().saturating_sub(1);
        let lane = lane.unwrap_or(Self::DEFAULT_LANE).min(last);
        Self { table, lane }
    }

    fn step(&self, at: usize, delta: isize) -> usize {
        let last = self.table.multipliers.len().saturating_sub(1) as isize;
        (at as isize + delta).clamp(0, last) as usize
    }
}

impl Resolver for Plinko {
    fn game(&self) -> GameId {
        GameId::Plinko
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let mut path = vec![self.lane];
        let mut at = self.lane;
        for _ in 0..self.table.rows {
            at = self.step(at, rng.below(3) as isize - 1);
            path.push(at);
        }
        if rng.chance(self.table.nudge_chance) {
            at = self.step(at, if rng.chance(0.5) { -1 } else { 1 });
            path.push(at);
        }

        let multiplier = self.table.multipliers[at];
        let payout = pay(bet, multiplier);
        let slot = at + 1;
        let message = match payout.cmp(&bet) {
            std::cmp::Ordering::Greater => format!("Great drop! Slot {slot} paid {payout} credits."),
            std::cmp::Ordering::Equal => format!("Even finish. Slot {slot} returned your stake."),
            std::cmp::Ordering::Less if payout > 0 => {
                format!("Soft landing. Slot {slot} returned {payout} credits.")
            }
            std::cmp::Ordering::Less => {
                format!("Puck settled in slot {slot} for {multiplier:.2}x.")
            }
        };
        Ok((
            RoundView::Drop {
                path,
                slot: at,
                multiplier,
            },
            Outcome { payout, message },
        ))
    }
}

#[derive(Debug)]
pub struct Skee {
    table: SkeeTable,
}

impl Skee {
    pub fn new(table: SkeeTable) -> Self {
        Self { table }
    }
}

impl Resolver for Skee {
    fn game(&self) -> GameId {
        GameId::Skee
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let ring = rng.weighted_choice(&self.table.weights)?;
        let multiplier = self.table.multipliers[ring];
        let label = &self.table.labels[ring];
        let payout = pay(bet, multiplier);
        let message = if multiplier <= 0.8 {
            format!("Ball clipped the {label} ring, house keeps a slice.")
        } else if multiplier < 2.0 {
            format!("Solid roll into the {label} ring for {multiplier:.2}x.")
        } else {
            format!("Bullseye! The {label} ring pays {multiplier:.2}x.")
        };
        Ok((
            RoundView::Drop {
                path: vec![ring],
                slot: ring,
                multiplier,
            },
            Outcome { payout, message },
        ))
    }
}
