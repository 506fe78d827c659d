//! Stake limits and payout constants for every game.
//!
//! The multipliers and hazard rates are hand-tuned house constants, so they
//! live here as data and can be overridden from the config file instead of
//! being buried in the round controllers.

use serde::{Deserialize, Serialize};

use crate::round::GameId;
use crate::settings::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLimits {
    pub min_stake: u64,
    pub step: u64,
}

impl StakeLimits {
    pub const fn new(min_stake: u64, step: u64) -> Self {
        Self { min_stake, step }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsTable {
    pub limits: StakeLimits,
    pub symbols: Vec<String>,
    /// Symbol whose triple pays `jackpot`.
    pub jackpot_symbol: String,
    pub jackpot: f64,
    pub seven_symbol: String,
    pub triple_seven: f64,
    pub triple: f64,
    pub pair: f64,
    /// Any reel showing this symbol returns `consolation` when nothing else hits.
    pub consolation_symbol: String,
    pub consolation: f64,
}

impl Default for SlotsTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(10, 10),
            symbols: ["🍒", "🍋", "⭐", "7️⃣", "💎", "🍀"]
                .into_iter()
                .map(String::from)
                .collect(),
            jackpot_symbol: "💎".into(),
            jackpot: 15.0,
            seven_symbol: "7️⃣".into(),
            triple_seven: 10.0,
            triple: 7.0,
            pair: 2.0,
            consolation_symbol: "🍀".into(),
            consolation: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelTable {
    pub limits: StakeLimits,
    pub win: f64,
}

impl Default for DuelTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(25, 25),
            win: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteTable {
    pub limits: StakeLimits,
    pub pockets: u8,
    pub colour: f64,
    pub green: f64,
}

impl Default for RouletteTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(25, 25),
            pockets: 37,
            colour: 2.0,
            green: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimboTable {
    pub limits: StakeLimits,
    pub min_target: f64,
    pub max_multiplier: f64,
}

impl Default for LimboTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(10, 5),
            min_target: 1.2,
            max_multiplier: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinkoTable {
    pub limits: StakeLimits,
    pub rows: usize,
    /// One multiplier per landing slot.
    pub multipliers: Vec<f64>,
    pub nudge_chance: f64,
}

impl Default for PlinkoTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(10, 5),
            rows: 7,
            multipliers: vec![5.0, 3.2, 2.2, 0.2, 0.2, 2.2, 3.2, 5.0],
            nudge_chance: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeeTable {
    pub limits: StakeLimits,
    pub weights: Vec<f64>,
    pub multipliers: Vec<f64>,
    pub labels: Vec<String>,
}

impl Default for SkeeTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 10),
            weights: vec![5.0, 3.0, 2.0, 1.0],
            multipliers: vec![0.6, 1.2, 1.8, 3.2],
            labels: ["20", "40", "80", "150"].into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaccaratTable {
    pub limits: StakeLimits,
    pub player: f64,
    pub banker: f64,
    pub tie: f64,
}

impl Default for BaccaratTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(50, 25),
            player: 2.0,
            banker: 1.95,
            tie: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriadTable {
    pub limits: StakeLimits,
    pub win: f64,
    /// Paid when the dealer fails to qualify.
    pub no_qualify: f64,
    pub straight_bonus: f64,
    pub trips_bonus: f64,
    pub straight_flush_bonus: f64,
}

impl Default for TriadTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(50, 25),
            win: 2.0,
            no_qualify: 2.0,
            straight_bonus: 1.0,
            trips_bonus: 4.0,
            straight_flush_bonus: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeeLoTable {
    pub limits: StakeLimits,
    pub win: f64,
    pub max_rerolls: u8,
}

impl Default for CeeLoTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(25, 25),
            win: 2.0,
            max_rerolls: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackjackTable {
    pub limits: StakeLimits,
    pub natural: f64,
    pub win: f64,
}

impl Default for BlackjackTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(50, 25),
            natural: 2.5,
            win: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokerTable {
    pub limits: StakeLimits,
    pub opponents: Vec<String>,
    pub win: f64,
    pub split: f64,
}

impl Default for PokerTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(100, 50),
            opponents: vec!["Vega".into(), "Rigel".into()],
            win: 3.0,
            split: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrapsTable {
    pub limits: StakeLimits,
    pub win: f64,
}

impl Default for CrapsTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(50, 25),
            win: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashTable {
    pub limits: StakeLimits,
    pub tick_ms: u64,
    /// Crash point is `round2(u * crash_spread + crash_floor)`.
    pub crash_floor: f64,
    pub crash_spread: f64,
    pub base_step: f64,
    pub growth: f64,
    /// The meter never climbs past `max(crash point + cap_margin, cap_floor)`.
    pub cap_margin: f64,
    pub cap_floor: f64,
    pub min_auto_target: f64,
}

impl Default for CrashTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 20),
            tick_ms: 70,
            crash_floor: 1.6,
            crash_spread: 3.0,
            base_step: 0.02,
            growth: 0.025,
            cap_margin: 1.2,
            cap_floor: 4.5,
            min_auto_target: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesTable {
    pub limits: StakeLimits,
    pub grid: usize,
    pub min_bombs: u8,
    pub max_bombs: u8,
    pub default_bombs: u8,
    /// Multiplier is `round2(1 + safe * (step_base + bombs * step_per_bomb))`.
    pub step_base: f64,
    pub step_per_bomb: f64,
    pub min_cashout: f64,
    pub auto_delay_ms: u64,
}

impl Default for MinesTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 10),
            grid: 5,
            min_bombs: 1,
            max_bombs: 9,
            default_bombs: 5,
            step_base: 0.35,
            step_per_bomb: 0.03,
            min_cashout: 1.05,
            auto_delay_ms: 180,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneTheme {
    Field,
    Road,
    River,
}

impl LaneTheme {
    pub fn label(self) -> &'static str {
        match self {
            LaneTheme::Field => "field",
            LaneTheme::Road => "road",
            LaneTheme::River => "river",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossyTable {
    pub limits: StakeLimits,
    pub lanes: Vec<LaneTheme>,
    pub base_hazard: f64,
    pub hazard_per_lane: f64,
    pub road_hazard: f64,
    pub river_hazard: f64,
    pub field_hazard: f64,
    pub min_hazard: f64,
    pub max_hazard: f64,
    pub step: f64,
    pub finish_bonus: f64,
    pub min_cashout: f64,
    /// Lane index where every hop is a hit.
    pub cursed_lane: Option<usize>,
}

impl Default for CrossyTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 10),
            lanes: vec![
                LaneTheme::Field,
                LaneTheme::Road,
                LaneTheme::River,
                LaneTheme::Road,
                LaneTheme::Field,
            ],
            base_hazard: 0.22,
            hazard_per_lane: 0.12,
            road_hazard: 0.18,
            river_hazard: 0.10,
            field_hazard: -0.08,
            min_hazard: 0.18,
            max_hazard: 0.82,
            step: 0.35,
            finish_bonus: 1.25,
            min_cashout: 1.05,
            cursed_lane: None,
        }
    }
}

impl CrossyTable {
    pub fn hazard(&self, lane: usize) -> f64 {
        let theme = match self.lanes.get(lane) {
            Some(LaneTheme::Road) => self.road_hazard,
            Some(LaneTheme::River) => self.river_hazard,
            Some(LaneTheme::Field) => self.field_hazard,
            None => 0.0,
        };
        (self.base_hazard + lane as f64 * self.hazard_per_lane + theme)
            .clamp(self.min_hazard, self.max_hazard)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflexTable {
    pub limits: StakeLimits,
    pub min_delay_ms: u64,
    pub delay_spread_ms: u64,
    pub window_ms: u64,
    /// `(max reaction ms, multiplier)`, fastest first.
    pub tiers: Vec<(u64, f64)>,
}

impl Default for ReflexTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 5),
            min_delay_ms: 900,
            delay_spread_ms: 2000,
            window_ms: 1500,
            tiers: vec![(250, 3.0), (400, 2.0), (550, 1.2)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryTable {
    pub limits: StakeLimits,
    pub pads: u8,
    pub min_length: usize,
    pub max_length: usize,
    pub step_ms: u64,
    pub settle_ms: u64,
    pub perfect: f64,
}

impl Default for MemoryTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(25, 5),
            pads: 4,
            min_length: 3,
            max_length: 5,
            step_ms: 620,
            settle_ms: 320,
            perfect: 2.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizTable {
    pub limits: StakeLimits,
    pub questions: usize,
    pub time_limit_ms: u64,
    /// Multiplier by number of correct answers, from zero up to `questions`.
    pub payouts: Vec<f64>,
}

impl Default for QuizTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(20, 5),
            questions: 3,
            time_limit_ms: 25_000,
            payouts: vec![0.0, 1.0, 1.8, 3.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTable {
    pub limits: StakeLimits,
    pub time_limit_ms: u64,
    /// The drone hops to a new spot this often, and after every hit.
    pub move_ms: u64,
    /// Arena bounds in percent, inclusive.
    pub x_range: (u8, u8),
    pub y_range: (u8, u8),
    /// A shot within this many points of the drone on both axes hits.
    pub hit_radius: u8,
    pub goal_hits: u32,
    pub partial_hits: u32,
    pub full: f64,
    pub partial: f64,
}

impl Default for TargetTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(25, 5),
            time_limit_ms: 20_000,
            move_ms: 850,
            x_range: (12, 88),
            y_range: (18, 82),
            hit_radius: 5,
            goal_hits: 6,
            partial_hits: 4,
            full: 2.5,
            partial: 1.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerbyTable {
    pub limits: StakeLimits,
    pub tick_ms: u64,
    /// Each runner's momentum is `momentum_floor + u * momentum_spread`.
    pub momentum_floor: f64,
    pub momentum_spread: f64,
    /// Each tick a runner strides `(stride_floor + u * stride_spread) * momentum`.
    pub stride_floor: f64,
    pub stride_spread: f64,
    /// Extra stride factor for the picked runner.
    pub pick_bias: f64,
    pub cheer_boost: f64,
    pub sole_win: f64,
    pub shared_win: f64,
}

impl Default for DerbyTable {
    fn default() -> Self {
        Self {
            limits: StakeLimits::new(30, 10),
            tick_ms: 180,
            momentum_floor: 0.85,
            momentum_spread: 0.3,
            stride_floor: 3.0,
            stride_spread: 5.0,
            pick_bias: 1.05,
            cheer_boost: 12.0,
            sole_win: 4.0,
            shared_win: 2.0,
        }
    }
}

/// Every game's table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTables {
    pub slots: SlotsTable,
    pub duel: DuelTable,
    pub roulette: RouletteTable,
    pub limbo: LimboTable,
    pub plinko: PlinkoTable,
    pub skee: SkeeTable,
    pub baccarat: BaccaratTable,
    pub triad: TriadTable,
    pub cee_lo: CeeLoTable,
    pub blackjack: BlackjackTable,
    pub poker: PokerTable,
    pub craps: CrapsTable,
    pub crash: CrashTable,
    pub mines: MinesTable,
    pub crossy: CrossyTable,
    pub reflex: ReflexTable,
    pub memory: MemoryTable,
    pub quiz: QuizTable,
    pub target: TargetTable,
    pub derby: DerbyTable,
}

impl GameTables {
    pub fn limits(&self, game: GameId) -> StakeLimits {
        match game {
            GameId::Slots => self.slots.limits,
            GameId::Duel => self.duel.limits,
            GameId::Roulette => self.roulette.limits,
            GameId::Limbo => self.limbo.limits,
            GameId::Plinko => self.plinko.limits,
            GameId::Skee => self.skee.limits,
            GameId::Baccarat => self.baccarat.limits,
            GameId::Triad => self.triad.limits,
            GameId::CeeLo => self.cee_lo.limits,
            GameId::Blackjack => self.blackjack.limits,
            GameId::Poker => self.poker.limits,
            GameId::Craps => self.craps.limits,
            GameId::Crash => self.crash.limits,
            GameId::Mines => self.mines.limits,
            GameId::Crossy => self.crossy.limits,
            GameId::Reflex => self.reflex.limits,
            GameId::Memory => self.memory.limits,
            GameId::Quiz => self.quiz.limits,
            GameId::Target => self.target.limits,
            GameId::Derby => self.derby.limits,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for game in GameId::ALL {
            let limits = self.limits(game);
            if limits.min_stake == 0 || limits.step == 0 {
                return Err(SettingsError::InvalidValue(format!(
                    "{game}: min_stake and step must be greater than 0"
                )));
            }
        }
        if self.slots.symbols.len() < 2 {
            return Err(invalid("slots.symbols needs at least two symbols"));
        }
        if self.plinko.multipliers.len() < 2 {
            return Err(invalid("plinko.multipliers needs at least two slots"));
        }
        if self.skee.weights.len() != self.skee.multipliers.len()
            || self.skee.labels.len() != self.skee.multipliers.len()
        {
            return Err(invalid("skee weights, multipliers and labels must line up"));
        }
        if self.skee.weights.iter().any(|w| !w.is_finite() || *w < 0.0)
            || self.skee.weights.iter().sum::<f64>() <= 0.0
        {
            return Err(invalid("skee.weights must be non-negative with a positive sum"));
        }
        if self.roulette.pockets < 2 {
            return Err(invalid("roulette.pockets must be at least 2"));
        }
        if self.limbo.min_target < 1.0 || self.limbo.max_multiplier <= self.limbo.min_target {
            return Err(invalid("limbo targets must satisfy 1 <= min_target < max_multiplier"));
        }
        if self.poker.opponents.is_empty() || self.poker.opponents.len() > 8 {
            return Err(invalid("poker.opponents must name between 1 and 8 seats"));
        }
        let mines = &self.mines;
        let tiles = mines.grid * mines.grid;
        if mines.grid < 2
            || mines.min_bombs == 0
            || mines.min_bombs > mines.max_bombs
            || mines.max_bombs as usize >= tiles
            || !(mines.min_bombs..=mines.max_bombs).contains(&mines.default_bombs)
        {
            return Err(invalid("mines bomb range must fit inside the grid"));
        }
        if self.crossy.lanes.is_empty() || self.crossy.min_hazard > self.crossy.max_hazard {
            return Err(invalid("crossy needs lanes and min_hazard <= max_hazard"));
        }
        if let Some(lane) = self.crossy.cursed_lane {
            if lane >= self.crossy.lanes.len() {
                return Err(invalid("crossy.cursed_lane is past the last lane"));
            }
        }
        if self.reflex.tiers.is_empty() || self.reflex.window_ms == 0 {
            return Err(invalid("reflex needs at least one tier and a window"));
        }
        if self.memory.pads < 2
            || self.memory.min_length == 0
            || self.memory.min_length > self.memory.max_length
        {
            return Err(invalid("memory needs two pads and 1 <= min_length <= max_length"));
        }
        if self.crash.tick_ms == 0 || self.crash.crash_floor < 1.0 {
            return Err(invalid("crash needs a tick interval and a crash floor of at least 1"));
        }
        // the meter must be able to reach every crash point
        if self.crash.cap_margin.is_nan()
            || self.crash.cap_margin <= 0.0
            || !self.crash.cap_floor.is_finite()
        {
            return Err(invalid("crash.cap_margin must be greater than 0"));
        }
        let quiz = &self.quiz;
        if quiz.questions == 0 || quiz.time_limit_ms == 0 || quiz.payouts.len() != quiz.questions + 1 {
            return Err(invalid("quiz needs questions, a time limit and one payout per score"));
        }
        let target = &self.target;
        if target.time_limit_ms == 0
            || target.move_ms == 0
            || target.x_range.0 > target.x_range.1
            || target.y_range.0 > target.y_range.1
            || target.goal_hits == 0
            || target.partial_hits > target.goal_hits
        {
            return Err(invalid("target needs timers, ordered ranges and partial_hits <= goal_hits"));
        }
        if self.derby.tick_ms == 0 || self.derby.stride_floor <= 0.0 || self.derby.momentum_floor <= 0.0 {
            return Err(invalid("derby needs a tick interval and positive strides"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SettingsError {
    SettingsError::InvalidValue(msg.to_string())
}
