//! Progressive cash-out games. The multiplier climbs while the round is
//! live and the player decides when to bank it.

use std::collections::BTreeSet;

use arcade_engine::rng::GameRng;

use crate::errors::FloorError;
use crate::round::{
    pay, round2, Action, GameId, LaneState, RoundController, RoundView, Step, TileState,
    TimerRequest,
};
use crate::stats::group_thousands;
use crate::tables::{CrashTable, CrossyTable, MinesTable};

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Rocket multiplier driven by `Tick` inputs.
#[derive(Debug)]
pub struct CrashRound {
    table: CrashTable,
    bet: u64,
    auto_target: Option<f64>,
    current: f64,
    crash_point: f64,
    cap: f64,
    crashed: bool,
    done: bool,
}

impl CrashRound {
    pub fn new(table: CrashTable, bet: u64, auto_target: Option<f64>) -> Self {
        Self {
            table,
            bet,
            auto_target,
            current: 1.0,
            crash_point: 1.0,
            cap: 1.0,
            crashed: false,
            done: false,
        }
    }

    fn launch_at(&mut self, crash_point: f64) {
        self.crash_point = crash_point;
        self.cap = (crash_point + self.table.cap_margin).max(self.table.cap_floor);
        self.current = 1.0;
    }

    fn tick(&mut self) -> Step {
        let delta = self.table.base_step + (self.current - 1.0) * self.table.growth;
        self.current = round2(self.current + delta).min(self.cap);

        // auto cash-out wins a tie with the crash point
        if let Some(target) = self.auto_target {
            if self.current >= target {
                return self.cash_out();
            }
        }
        if self.current >= self.crash_point {
            self.current = self.crash_point;
            self.crashed = true;
            self.done = true;
            return Step::settle(
                0,
                format!(
                    "Rocket imploded at {:.2}x. Maybe next orbit.",
                    self.crash_point
                ),
            );
        }
        Step::status(format!("Climbing at {:.2}x.", self.current))
    }

    fn cash_out(&mut self) -> Step {
        self.done = true;
        let multiplier = self.current.max(1.0);
        let payout = pay(self.bet, multiplier);
        Step::settle(
            payout,
            format!(
                "You bailed at {multiplier:.2}x and pocketed {} credits!",
                group_thousands(payout)
            ),
        )
    }
}

impl RoundController for CrashRound {
    fn game(&self) -> GameId {
        GameId::Crash
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let point = round2(rng.unit() * self.table.crash_spread + self.table.crash_floor);
        self.launch_at(point);
        Ok(Step::status(
            "Launching... hit cash out before the rocket blows!",
        ))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Tick => Ok(self.tick()),
            Action::CashOut => Ok(self.cash_out()),
            other => Err(FloorError::illegal(
                GameId::Crash,
                format!("{} does nothing mid-flight, cash out", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Meter {
            multiplier: self.current,
            target: self.auto_target,
            crashed_at: self.crashed.then_some(self.crash_point),
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        (!self.done).then_some(TimerRequest {
            after_ms: self.table.tick_ms,
            input: Action::Tick,
        })
    }
}

/// Bomb grid where every safe tile raises the multiplier.
#[derive(Debug)]
pub struct MinesRound {
    table: MinesTable,
    bet: u64,
    bombs: u8,
    auto_target: Option<f64>,
    bomb_tiles: BTreeSet<usize>,
    tiles: Vec<TileState>,
    safe: usize,
    multiplier: f64,
    auto_armed: bool,
}

impl MinesRound {
    pub fn new(table: MinesTable, bet: u64, bombs: u8, auto_target: Option<f64>) -> Self {
        let size = table.grid * table.grid;
        Self {
            table,
            bet,
            bombs,
            auto_target,
            bomb_tiles: BTreeSet::new(),
            tiles: vec![TileState::Hidden; size],
            safe: 0,
            multiplier: 1.0,
            auto_armed: false,
        }
    }

    fn size(&self) -> usize {
        self.tiles.len()
    }

    fn adjacent(&self, index: usize) -> u8 {
        let grid = self.table.grid as isize;
        let (row, col) = (index as isize / grid, index as isize % grid);
        let mut count = 0;
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if r < 0 || c < 0 || r >= grid || c >= grid || (r == row && c == col) {
                    continue;
                }
                if self.bomb_tiles.contains(&((r * grid + c) as usize)) {
                    count += 1;
                }
            }
        }
        count
    }

    fn expose_bombs(&mut self) {
        for &i in &self.bomb_tiles {
            if self.tiles[i] == TileState::Hidden {
                self.tiles[i] = TileState::Bomb;
            }
        }
    }

    fn uncover(&mut self, tile: usize) -> Result<Step, FloorError> {
        if tile >= self.size() {
            return Err(FloorError::illegal(
                GameId::Mines,
                format!("there is no tile {tile} on the board"),
            ));
        }
        if self.tiles[tile] != TileState::Hidden {
            return Err(FloorError::illegal(
                GameId::Mines,
                format!("tile {tile} is already uncovered"),
            ));
        }

        if self.bomb_tiles.contains(&tile) {
            self.tiles[tile] = TileState::Hit;
            self.expose_bombs();
            self.auto_armed = false;
            return Ok(Step::settle(0, "Meteor strike! The wager vaporised."));
        }

        self.tiles[tile] = TileState::Safe {
            adjacent: self.adjacent(tile),
        };
        self.safe += 1;
        let boost = self.table.step_base + self.bombs as f64 * self.table.step_per_bomb;
        self.multiplier = round2(1.0 + self.safe as f64 * boost);

        if self.safe >= self.size() - self.bombs as usize {
            self.expose_bombs();
            self.auto_armed = false;
            let payout = pay(self.bet, self.multiplier);
            return Ok(Step::settle(
                payout,
                format!("Board cleared! You collect {} credits.", group_thousands(payout)),
            ));
        }

        self.auto_armed = self
            .auto_target
            .is_some_and(|target| target > 0.0 && self.multiplier >= target);
        Ok(Step::status(format!(
            "{} safe tile{} uncovered.",
            self.safe,
            plural(self.safe)
        )))
    }

    fn cash_out(&mut self) -> Step {
        self.expose_bombs();
        self.auto_armed = false;
        if self.safe == 0 {
            return Step::settle(self.bet, "No tiles revealed. Stake returned.");
        }
        let payout = pay(self.bet, self.multiplier.max(self.table.min_cashout));
        Step::settle(
            payout,
            format!(
                "You cashed out with {} safe tiles for {} credits.",
                self.safe,
                group_thousands(payout)
            ),
        )
    }
}

impl RoundController for MinesRound {
    fn game(&self) -> GameId {
        GameId::Mines
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let size = self.size();
        while self.bomb_tiles.len() < self.bombs as usize {
            self.bomb_tiles.insert(rng.below(size));
        }
        Ok(Step::status("Grid armed. Reveal tiles or cash out early."))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Uncover { tile } => self.uncover(tile),
            Action::CashOut => Ok(self.cash_out()),
            other => Err(FloorError::illegal(
                GameId::Mines,
                format!("{} is not a mines move, uncover or cash out", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Board {
            tiles: self.tiles.clone(),
            bombs: self.bombs,
            multiplier: self.multiplier,
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        self.auto_armed.then_some(TimerRequest {
            after_ms: self.table.auto_delay_ms,
            input: Action::CashOut,
        })
    }
}

/// Lane-hopping run; each cleared lane raises the multiplier.
#[derive(Debug)]
pub struct CrossyRound {
    table: CrossyTable,
    bet: u64,
    lane: usize,
    lanes: Vec<LaneState>,
    multiplier: f64,
}

impl CrossyRound {
    pub fn new(table: CrossyTable, bet: u64) -> Self {
        let lanes = vec![LaneState::Pending; table.lanes.len()];
        Self {
            table,
            bet,
            lane: 0,
            lanes,
            multiplier: 1.0,
        }
    }

    fn hop(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let total = self.lanes.len();
        if self.lane >= total {
            return Err(FloorError::illegal(GameId::Crossy, "every lane is already crossed"));
        }
        let lane = self.lane;

        if self.table.cursed_lane == Some(lane) {
            self.lanes[lane] = LaneState::Fail;
            return Ok(Step::settle(
                0,
                "A hover truck thunders across the neon road and sends the chicken flying.",
            ));
        }
        if rng.chance(self.table.hazard(lane)) {
            self.lanes[lane] = LaneState::Fail;
            return Ok(Step::settle(
                0,
                format!("Traffic surge! You were clipped on lane {}.", lane + 1),
            ));
        }

        self.lanes[lane] = LaneState::Safe;
        self.lane += 1;
        self.multiplier = round2(1.0 + self.lane as f64 * self.table.step);

        if self.lane >= total {
            self.multiplier = round2(self.multiplier + self.table.finish_bonus);
            let payout = pay(self.bet, self.multiplier);
            return Ok(Step::settle(
                payout,
                format!(
                    "Clean sweep! You cleared all lanes for {} credits.",
                    group_thousands(payout)
                ),
            ));
        }
        Ok(Step::status(format!(
            "Safe hop! {} lane{} cleared.",
            self.lane,
            plural(self.lane)
        )))
    }

    fn bail(&self) -> Step {
        if self.lane == 0 {
            return Step::settle(self.bet, "You backed out before hopping. Stake returned.");
        }
        let payout = pay(self.bet, self.multiplier.max(self.table.min_cashout));
        Step::settle(
            payout,
            format!(
                "You bailed with {} safe hop{} for {} credits.",
                self.lane,
                plural(self.lane),
                group_thousands(payout)
            ),
        )
    }
}

impl RoundController for CrossyRound {
    fn game(&self) -> GameId {
        GameId::Crossy
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, _rng: &mut GameRng) -> Result<Step, FloorError> {
        Ok(Step::status(match self.table.cursed_lane {
            Some(lane) => format!(
                "Lanes are live. Rumour says lane {} is cursed tonight.",
                lane + 1
            ),
            None => "Lanes are live. Hop across or bail while you're ahead.".to_string(),
        }))
    }

    fn act(&mut self, action: Action, rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Hop => self.hop(rng),
            Action::CashOut => Ok(self.bail()),
            other => Err(FloorError::illegal(
                GameId::Crossy,
                format!("{} is not a crossy move, hop or cash out", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Lanes {
            themes: self
                .table
                .lanes
                .iter()
                .map(|t| t.label().to_string())
                .collect(),
            lanes: self.lanes.clone(),
            multiplier: self.multiplier,
        }
    }
}
