//! Round protocol shared by every game: identifiers, player actions,
//! controller trait, and the state handed back to the presentation layer.

use std::fmt;
use std::str::FromStr;

use arcade_engine::cards::Card;
use arcade_engine::rng::GameRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FloorError;
use crate::history::SettlementEntry;
use crate::tables::StakeLimits;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    Slots,
    Duel,
    Roulette,
    Limbo,
    Plinko,
    Skee,
    Baccarat,
    Triad,
    CeeLo,
    Blackjack,
    Poker,
    Craps,
    Crash,
    Mines,
    Crossy,
    Reflex,
    Memory,
    Quiz,
    Target,
    Derby,
}

impl GameId {
    pub const ALL: [GameId; 20] = [
        GameId::Slots,
        GameId::Duel,
        GameId::Roulette,
        GameId::Limbo,
        GameId::Plinko,
        GameId::Skee,
        GameId::Baccarat,
        GameId::Triad,
        GameId::CeeLo,
        GameId::Blackjack,
        GameId::Poker,
        GameId::Craps,
        GameId::Crash,
        GameId::Mines,
        GameId::Crossy,
        GameId::Reflex,
        GameId::Memory,
        GameId::Quiz,
        GameId::Target,
        GameId::Derby,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            GameId::Slots => "slots",
            GameId::Duel => "duel",
            GameId::Roulette => "roulette",
            GameId::Limbo => "limbo",
            GameId::Plinko => "plinko",
            GameId::Skee => "skee",
            GameId::Baccarat => "baccarat",
            GameId::Triad => "triad",
            GameId::CeeLo => "cee_lo",
            GameId::Blackjack => "blackjack",
            GameId::Poker => "poker",
            GameId::Craps => "craps",
            GameId::Crash => "crash",
            GameId::Mines => "mines",
            GameId::Crossy => "crossy",
            GameId::Reflex => "reflex",
            GameId::Memory => "memory",
            GameId::Quiz => "quiz",
            GameId::Target => "target",
            GameId::Derby => "derby",
        }
    }

    /// Name shown in the settlement log.
    pub fn title(self) -> &'static str {
        match self {
            GameId::Slots => "Slots",
            GameId::Duel => "High-Card Duel",
            GameId::Roulette => "Color Roulette",
            GameId::Limbo => "Limbo",
            GameId::Plinko => "Plinko",
            GameId::Skee => "Skee-Ball",
            GameId::Baccarat => "Baccarat",
            GameId::Triad => "Triad Poker",
            GameId::CeeLo => "Cee-Lo",
            GameId::Blackjack => "Blackjack",
            GameId::Poker => "Draw Poker",
            GameId::Craps => "Craps",
            GameId::Crash => "Crash",
            GameId::Mines => "Mines",
            GameId::Crossy => "Crossy Run",
            GameId::Reflex => "Reflex Reactor",
            GameId::Memory => "Memory Sequence",
            GameId::Quiz => "Quantum Sums",
            GameId::Target => "Target Lock",
            GameId::Derby => "Neon Derby",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        GameId::ALL
            .iter()
            .copied()
            .find(|g| g.slug() == wanted)
            .ok_or_else(|| format!("unknown game: {s}"))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Tone {
    pub fn from_net(net: i64) -> Self {
        match net {
            n if n > 0 => Tone::Positive,
            0 => Tone::Neutral,
            _ => Tone::Negative,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Committed,
    Settled,
}

/// Something the player (or a fired timer) asks an active round to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Hit,
    Stand,
    /// Toggle the hold flag on a poker card.
    Hold { index: usize },
    Draw,
    Reveal,
    Roll,
    /// Crash multiplier step.
    Tick,
    CashOut,
    /// Uncover a mines tile.
    Uncover { tile: usize },
    Hop,
    /// The reflex signal lit or the memory pattern finished playing.
    Signal,
    /// Reflex tap. The floor's clock measures the reaction.
    Tap,
    Press { pad: u8 },
    /// Answer to the current quiz question.
    Answer { value: i64 },
    /// Shot at arena coordinates, in percent of width and height.
    Shoot { x: u8, y: u8 },
    /// One-time boost for the picked runner.
    Cheer,
    /// A timed window expired.
    Timeout,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Hold { .. } => "hold",
            Action::Draw => "draw",
            Action::Reveal => "reveal",
            Action::Roll => "roll",
            Action::Tick => "tick",
            Action::CashOut => "cash_out",
            Action::Uncover { .. } => "uncover",
            Action::Hop => "hop",
            Action::Signal => "signal",
            Action::Tap => "tap",
            Action::Press { .. } => "press",
            Action::Answer { .. } => "answer",
            Action::Shoot { .. } => "shoot",
            Action::Cheer => "cheer",
            Action::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pick {
    Red,
    Black,
    Green,
    Player,
    Banker,
    Tie,
    Nova,
    Comet,
    Eclipse,
}

impl Pick {
    pub const RUNNERS: [Pick; 3] = [Pick::Nova, Pick::Comet, Pick::Eclipse];

    pub fn label(self) -> &'static str {
        match self {
            Pick::Red => "red",
            Pick::Black => "black",
            Pick::Green => "green",
            Pick::Player => "player",
            Pick::Banker => "banker",
            Pick::Tie => "tie",
            Pick::Nova => "Nova",
            Pick::Comet => "Comet",
            Pick::Eclipse => "Eclipse",
        }
    }
}

impl FromStr for Pick {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Pick::Red),
            "black" => Ok(Pick::Black),
            "green" => Ok(Pick::Green),
            "player" => Ok(Pick::Player),
            "banker" => Ok(Pick::Banker),
            "tie" => Ok(Pick::Tie),
            "nova" => Ok(Pick::Nova),
            "comet" => Ok(Pick::Comet),
            "eclipse" => Ok(Pick::Eclipse),
            other => Err(format!("unknown pick: {other}")),
        }
    }
}

/// Per-game choices made before the stake is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundOptions {
    /// Roulette colour, baccarat side or derby runner.
    pub pick: Option<Pick>,
    /// Limbo target, or the auto cash-out multiplier for crash and mines.
    pub target: Option<f64>,
    pub bombs: Option<u8>,
    /// Plinko entry lane.
    pub lane: Option<usize>,
}

impl RoundOptions {
    pub fn pick(pick: Pick) -> Self {
        Self {
            pick: Some(pick),
            ..Self::default()
        }
    }

    pub fn target(target: f64) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }
}

/// A delayed input the presentation layer (or [`crate::pacing::Pacer`])
/// should feed back through `act` once `after_ms` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerRequest {
    pub after_ms: u64,
    pub input: Action,
}

/// Result of a controller step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue { status: String },
    Settle(Outcome),
}

impl Step {
    pub fn status(status: impl Into<String>) -> Self {
        Step::Continue {
            status: status.into(),
        }
    }

    pub fn settle(payout: u64, message: impl Into<String>) -> Self {
        Step::Settle(Outcome {
            payout,
            message: message.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub payout: u64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "face", content = "card", rename_all = "snake_case")]
pub enum CardFace {
    Up(Card),
    Down,
}

impl CardFace {
    pub fn shown(cards: &[Card]) -> Vec<CardFace> {
        cards.iter().copied().map(CardFace::Up).collect()
    }

    pub fn hidden(n: usize) -> Vec<CardFace> {
        vec![CardFace::Down; n]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub name: String,
    pub cards: Vec<CardFace>,
    /// Total, hand description, or nothing while hidden.
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub held: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Hidden,
    Safe { adjacent: u8 },
    Bomb,
    Hit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerView {
    pub name: String,
    /// Distance covered, 0 to 100.
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneState {
    Pending,
    Safe,
    Fail,
}

/// Game-specific board state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundView {
    Idle,
    Reels {
        symbols: Vec<String>,
    },
    Wheel {
        pocket: u8,
        colour: Pick,
        pick: Pick,
    },
    Table {
        seats: Vec<SeatView>,
    },
    Dice {
        dice: Vec<u8>,
        point: Option<u8>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        house: Vec<u8>,
    },
    Meter {
        multiplier: f64,
        target: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        crashed_at: Option<f64>,
    },
    Drop {
        path: Vec<usize>,
        slot: usize,
        multiplier: f64,
    },
    Board {
        tiles: Vec<TileState>,
        bombs: u8,
        multiplier: f64,
    },
    Lanes {
        themes: Vec<String>,
        lanes: Vec<LaneState>,
        multiplier: f64,
    },
    Reflex {
        lit: bool,
        reaction_ms: Option<u64>,
    },
    Sequence {
        /// Present only while the pattern is being shown.
        shown: Option<Vec<u8>>,
        length: usize,
        entered: Vec<u8>,
    },
    Quiz {
        /// The open question, hidden once the round is over.
        prompt: Option<String>,
        answered: usize,
        total: usize,
        time_left_ms: u64,
    },
    Drone {
        x: u8,
        y: u8,
        hits: u32,
        goal: u32,
        time_left_ms: u64,
    },
    Race {
        runners: Vec<RunnerView>,
        pick: Pick,
        cheered: bool,
    },
}

/// One active round's game logic. Controllers are created per round and
/// dropped at settlement; they never touch the bankroll.
pub trait RoundController: Send + fmt::Debug {
    fn game(&self) -> GameId;

    fn bet(&self) -> u64;

    /// Runs right after the stake is debited. May settle immediately.
    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError>;

    fn act(&mut self, action: Action, rng: &mut GameRng) -> Result<Step, FloorError>;

    fn view(&self) -> RoundView;

    fn timer(&self) -> Option<TimerRequest> {
        None
    }
}

/// Identifies a started round. Stale handles are rejected once the round
/// settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundHandle {
    pub game: GameId,
    pub round_id: Uuid,
}

/// Everything the presentation layer needs to draw one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub game: GameId,
    pub round_id: Option<Uuid>,
    pub stage: Stage,
    pub bet: u64,
    pub view: RoundView,
    pub status: String,
    pub tone: Tone,
    pub timer: Option<TimerRequest>,
    pub settlement: Option<SettlementEntry>,
}

impl RoundState {
    /// Handle for acting on this state's round, if it has one.
    pub fn handle(&self) -> Option<RoundHandle> {
        self.round_id.map(|round_id| RoundHandle {
            game: self.game,
            round_id,
        })
    }

    pub fn idle(game: GameId, last: Option<SettlementEntry>) -> Self {
        let (status, tone) = match &last {
            Some(entry) => (entry.message.clone(), entry.tone),
            None => (format!("Place a stake to play {}.", game.title()), Tone::Neutral),
        };
        Self {
            game,
            round_id: None,
            stage: Stage::Idle,
            bet: 0,
            view: RoundView::Idle,
            status,
            tone,
            timer: None,
            settlement: last,
        }
    }
}

/// Validates a requested stake and rounds it to the table's increment.
pub fn normalize_stake(raw: f64, limits: StakeLimits) -> Result<u64, FloorError> {
    if !raw.is_finite() {
        return Err(FloorError::InvalidStake {
            reason: "stake must be a number".into(),
        });
    }
    if raw < limits.min_stake as f64 {
        return Err(FloorError::InvalidStake {
            reason: format!("minimum stake is {} credits", limits.min_stake),
        });
    }
    let step = limits.step.max(1) as f64;
    let stake = ((raw / step).round() * step) as u64;
    if stake == 0 || stake < limits.min_stake {
        return Err(FloorError::InvalidStake {
            reason: format!("minimum stake is {} credits", limits.min_stake),
        });
    }
    Ok(stake)
}

/// `bet * multiplier`, rounded to the nearest credit.
pub fn pay(bet: u64, multiplier: f64) -> u64 {
    let v = (bet as f64 * multiplier).round();
    if v.is_finite() && v > 0.0 {
        v as u64
    } else {
        0
    }
}

/// Rounds to two decimals, the precision multipliers are shown with.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: StakeLimits = StakeLimits {
        min_stake: 50,
        step: 25,
    };

    #[test]
    fn stake_rounds_to_step() {
        assert_eq!(normalize_stake(60.0, LIMITS).unwrap(), 50);
        assert_eq!(normalize_stake(63.0, LIMITS).unwrap(), 75);
        assert_eq!(normalize_stake(100.0, LIMITS).unwrap(), 100);
    }

    #[test]
    fn stake_rejects_bad_input() {
        assert!(matches!(
            normalize_stake(f64::NAN, LIMITS),
            Err(FloorError::InvalidStake { .. })
        ));
        assert!(matches!(
            normalize_stake(f64::INFINITY, LIMITS),
            Err(FloorError::InvalidStake { .. })
        ));
        assert!(matches!(
            normalize_stake(49.0, LIMITS),
            Err(FloorError::InvalidStake { .. })
        ));
        assert!(matches!(
            normalize_stake(-100.0, LIMITS),
            Err(FloorError::InvalidStake { .. })
        ));
    }

    #[test]
    fn pay_rounds_half_up() {
        assert_eq!(pay(50, 1.95), 98);
        assert_eq!(pay(100, 2.5), 250);
        assert_eq!(pay(10, 0.0), 0);
    }

    #[test]
    fn game_slugs_parse_back() {
        for game in GameId::ALL {
            assert_eq!(game.slug().parse::<GameId>().unwrap(), game);
        }
        assert_eq!("cee-lo".parse::<GameId>().unwrap(), GameId::CeeLo);
        assert!("keno".parse::<GameId>().is_err());
    }

    #[test]
    fn tone_tracks_net_sign() {
        assert_eq!(Tone::from_net(5), Tone::Positive);
        assert_eq!(Tone::from_net(0), Tone::Neutral);
        assert_eq!(Tone::from_net(-5), Tone::Negative);
    }
}
