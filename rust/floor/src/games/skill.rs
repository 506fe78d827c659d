//! Timed skill games. Reflex and memory ask the pacer for a `Signal` input
//! once opened; the quiz and the drone run against a countdown. Every
//! elapsed time is read from the floor's [`Clock`], never from the player.

use std::sync::Arc;

use arcade_engine::rng::GameRng;

use crate::clock::Clock;
use crate::errors::FloorError;
use crate::round::{pay, Action, GameId, RoundController, RoundView, Step, TimerRequest};
use crate::stats::group_thousands;
use crate::tables::{MemoryTable, QuizTable, ReflexTable, TargetTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reactor {
    Armed { delay_ms: u64 },
    Lit { at_ms: u64 },
    Done,
}

#[derive(Debug)]
pub struct ReflexRound {
    table: ReflexTable,
    bet: u64,
    clock: Arc<dyn Clock>,
    phase: Reactor,
    reaction_ms: Option<u64>,
}

impl ReflexRound {
    pub fn new(table: ReflexTable, bet: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            table,
            bet,
            clock,
            phase: Reactor::Armed { delay_ms: 0 },
            reaction_ms: None,
        }
    }

    fn tap(&mut self) -> Result<Step, FloorError> {
        match self.phase {
            Reactor::Armed { .. } => {
                self.phase = Reactor::Done;
                Ok(Step::settle(
                    0,
                    "False start! Triggered before the reactor flashed green.",
                ))
            }
            Reactor::Lit { at_ms } => {
                self.phase = Reactor::Done;
                let reaction_ms = self.clock.now_ms().saturating_sub(at_ms);
                if reaction_ms >= self.table.window_ms {
                    return Ok(Self::too_slow());
                }
                self.reaction_ms = Some(reaction_ms);
                Ok(self.score(reaction_ms))
            }
            Reactor::Done => Err(FloorError::illegal(GameId::Reflex, "the reactor is offline")),
        }
    }

    fn too_slow() -> Step {
        Step::settle(0, "Too slow! The reactor vented your wager.")
    }

    fn score(&self, reaction_ms: u64) -> Step {
        let tier = self
            .table
            .tiers
            .iter()
            .position(|&(limit, _)| reaction_ms <= limit);
        let Some(tier) = tier else {
            return Step::settle(
                0,
                format!("Reaction checked in at {reaction_ms}ms. Reactor keeps the wager."),
            );
        };
        let multiplier = self.table.tiers[tier].1;
        let message = match tier {
            0 => format!("Lightning fast! {reaction_ms}ms locks in a {multiplier}x payout."),
            1 => format!("Sharp response at {reaction_ms}ms. {multiplier}x payout secured."),
            _ => format!("Solid timing at {reaction_ms}ms. Reactor boosts you by {multiplier}x."),
        };
        Step::settle(pay(self.bet, multiplier), message)
    }
}

impl RoundController for ReflexRound {
    fn game(&self) -> GameId {
        GameId::Reflex
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let spread = (rng.unit() * self.table.delay_spread_ms as f64) as u64;
        self.phase = Reactor::Armed {
            delay_ms: self.table.min_delay_ms + spread,
        };
        Ok(Step::status(
            "Wait for the reactor to go green, then tap immediately.",
        ))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match (action, self.phase) {
            (Action::Tap, _) => self.tap(),
            (Action::Signal, Reactor::Armed { .. }) => {
                self.phase = Reactor::Lit {
                    at_ms: self.clock.now_ms(),
                };
                Ok(Step::status("Tap!"))
            }
            (Action::Timeout, Reactor::Lit { .. }) => {
                self.phase = Reactor::Done;
                Ok(Self::too_slow())
            }
            (other, _) => Err(FloorError::illegal(
                GameId::Reflex,
                format!("{} is not expected right now", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Reflex {
            lit: matches!(self.phase, Reactor::Lit { .. }),
            reaction_ms: self.reaction_ms,
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        match self.phase {
            Reactor::Armed { delay_ms } => Some(TimerRequest {
                after_ms: delay_ms,
                input: Action::Signal,
            }),
            Reactor::Lit { at_ms } => Some(TimerRequest {
                after_ms: (at_ms + self.table.window_ms).saturating_sub(self.clock.now_ms()),
                input: Action::Timeout,
            }),
            Reactor::Done => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Question {
    prompt: String,
    answer: i64,
}

impl Question {
    fn random(rng: &mut GameRng) -> Self {
        let mut between = |lo: i64, hi: i64| lo + rng.below((hi - lo + 1) as usize) as i64;
        match between(0, 2) {
            0 => {
                let (a, b) = (between(10, 49), between(10, 49));
                Self {
                    prompt: format!("{a} + {b}"),
                    answer: a + b,
                }
            }
            1 => {
                let (a, b) = (between(30, 69), between(5, 34));
                Self {
                    prompt: format!("{a} − {b}"),
                    answer: a - b,
                }
            }
            _ => {
                let (a, b) = (between(3, 10), between(2, 8));
                Self {
                    prompt: format!("{a} × {b}"),
                    answer: a * b,
                }
            }
        }
    }
}

/// Arithmetic against a countdown; the payout scales with correct answers.
#[derive(Debug)]
pub struct QuizRound {
    table: QuizTable,
    bet: u64,
    clock: Arc<dyn Clock>,
    questions: Vec<Question>,
    answered: usize,
    correct: usize,
    deadline_ms: u64,
    done: bool,
}

impl QuizRound {
    pub fn new(table: QuizTable, bet: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            table,
            bet,
            clock,
            questions: Vec::new(),
            answered: 0,
            correct: 0,
            deadline_ms: 0,
            done: false,
        }
    }

    fn expired(&self) -> bool {
        self.clock.now_ms() >= self.deadline_ms
    }

    fn time_up(&mut self) -> Step {
        self.done = true;
        Step::settle(
            0,
            "Time collapsed before you finished. Quantum vault keeps the wager.",
        )
    }

    fn answer(&mut self, value: i64) -> Step {
        if self.expired() {
            return self.time_up();
        }
        if self.questions[self.answered].answer == value {
            self.correct += 1;
        }
        self.answered += 1;
        if self.answered < self.questions.len() {
            return Step::status(format!(
                "{} of {} answered.",
                self.answered,
                self.questions.len()
            ));
        }
        self.done = true;
        self.grade()
    }

    fn grade(&self) -> Step {
        let (correct, total) = (self.correct, self.questions.len());
        let multiplier = self.table.payouts.get(correct).copied().unwrap_or(0.0);
        let payout = pay(self.bet, multiplier);
        let message = if correct == total && payout > 0 {
            format!(
                "Flawless! {correct}/{total} correct earns {} credits.",
                group_thousands(payout)
            )
        } else if payout > self.bet {
            format!("Great work, {correct}/{total} correct multiplies your stake by {multiplier}x.")
        } else if payout == self.bet {
            format!("{correct}/{total} correct salvaged your stake. Credits returned.")
        } else if correct == 0 {
            "All answers drifted off target. Vault keeps the wager.".to_string()
        } else {
            format!("{correct}/{total} correct falls short. Vault keeps {} credits.", self.bet - payout)
        };
        Step::settle(payout, message)
    }
}

impl RoundController for QuizRound {
    fn game(&self) -> GameId {
        GameId::Quiz
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        self.questions = (0..self.table.questions)
            .map(|_| Question::random(rng))
            .collect();
        self.deadline_ms = self.clock.now_ms() + self.table.time_limit_ms;
        Ok(Step::status(format!(
            "Solve all {} equations before the timer expires.",
            self.questions.len()
        )))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        if self.done {
            return Err(FloorError::illegal(GameId::Quiz, "the quiz is over"));
        }
        match action {
            Action::Answer { value } => Ok(self.answer(value)),
            Action::Timeout => Ok(self.time_up()),
            other => Err(FloorError::illegal(
                GameId::Quiz,
                format!("{} is not expected right now", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Quiz {
            prompt: (!self.done)
                .then(|| self.questions.get(self.answered).map(|q| q.prompt.clone()))
                .flatten(),
            answered: self.answered,
            total: self.questions.len(),
            time_left_ms: self.deadline_ms.saturating_sub(self.clock.now_ms()),
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        (!self.done).then(|| TimerRequest {
            after_ms: self.deadline_ms.saturating_sub(self.clock.now_ms()),
            input: Action::Timeout,
        })
    }
}

/// A roaming drone to be shot `goal_hits` times before the countdown ends.
#[derive(Debug)]
pub struct TargetRound {
    table: TargetTable,
    bet: u64,
    clock: Arc<dyn Clock>,
    x: u8,
    y: u8,
    hits: u32,
    moved_at_ms: u64,
    deadline_ms: u64,
    done: bool,
}

impl TargetRound {
    pub fn new(table: TargetTable, bet: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            table,
            bet,
            clock,
            x: 50,
            y: 50,
            hits: 0,
            moved_at_ms: 0,
            deadline_ms: 0,
            done: false,
        }
    }

    fn relocate(&mut self, rng: &mut GameRng) {
        let within = |rng: &mut GameRng, (lo, hi): (u8, u8)| {
            lo + rng.below(usize::from(hi - lo) + 1) as u8
        };
        self.x = within(rng, self.table.x_range);
        self.y = within(rng, self.table.y_range);
        self.moved_at_ms = self.clock.now_ms();
    }

    fn expired(&self) -> bool {
        self.clock.now_ms() >= self.deadline_ms
    }

    fn shoot(&mut self, x: u8, y: u8, rng: &mut GameRng) -> Step {
        if self.expired() {
            return self.finish();
        }
        let r = self.table.hit_radius;
        if self.x.abs_diff(x) > r || self.y.abs_diff(y) > r {
            return Step::status(format!("Missed. The drone is at ({}, {}).", self.x, self.y));
        }
        self.hits += 1;
        if self.hits >= self.table.goal_hits {
            return self.finish();
        }
        self.relocate(rng);
        Step::status(format!(
            "Hit {} of {}! The drone jumps to ({}, {}).",
            self.hits, self.table.goal_hits, self.x, self.y
        ))
    }

    fn finish(&mut self) -> Step {
        self.done = true;
        let hits = self.hits;
        if hits >= self.table.goal_hits {
            let payout = pay(self.bet, self.table.full);
            return Step::settle(
                payout,
                format!("Drone disabled! {hits} hits bank {} credits.", group_thousands(payout)),
            );
        }
        if hits >= self.table.partial_hits {
            let payout = pay(self.bet, self.table.partial);
            return Step::settle(
                payout,
                format!(
                    "Solid pursuit: {hits} hits earn a {} credit haul.",
                    group_thousands(payout)
                ),
            );
        }
        let plural = if hits == 1 { "" } else { "s" };
        Step::settle(0, format!("Drone escaped after {hits} hit{plural}."))
    }
}

impl RoundController for TargetRound {
    fn game(&self) -> GameId {
        GameId::Target
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        self.deadline_ms = self.clock.now_ms() + self.table.time_limit_ms;
        self.relocate(rng);
        Ok(Step::status(format!(
            "Hit the drone {} times before it cloaks.",
            self.table.goal_hits
        )))
    }

    fn act(&mut self, action: Action, rng: &mut GameRng) -> Result<Step, FloorError> {
        if self.done {
            return Err(FloorError::illegal(GameId::Target, "the drone has cloaked"));
        }
        match action {
            Action::Shoot { x, y } => Ok(self.shoot(x, y, rng)),
            Action::Tick if !self.expired() => {
                self.relocate(rng);
                Ok(Step::status(format!("The drone drifts to ({}, {}).", self.x, self.y)))
            }
            Action::Tick | Action::Timeout => Ok(self.finish()),
            other => Err(FloorError::illegal(
                GameId::Target,
                format!("{} is not expected right now", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Drone {
            x: self.x,
            y: self.y,
            hits: self.hits,
            goal: self.table.goal_hits,
            time_left_ms: self.deadline_ms.saturating_sub(self.clock.now_ms()),
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        if self.done {
            return None;
        }
        let now = self.clock.now_ms();
        let next_move = self.moved_at_ms + self.table.move_ms;
        Some(if next_move < self.deadline_ms {
            TimerRequest {
                after_ms: next_move.saturating_sub(now),
                input: Action::Tick,
            }
        } else {
            TimerRequest {
                after_ms: self.deadline_ms.saturating_sub(now),
                input: Action::Timeout,
            }
        })
    }
}

/// Pad sequence shown once, then replayed from memory.
#[derive(Debug)]
pub struct MemoryRound {
    table: MemoryTable,
    bet: u64,
    sequence: Vec<u8>,
    entered: Vec<u8>,
    recalling: bool,
}

impl MemoryRound {
    pub fn new(table: MemoryTable, bet: u64) -> Self {
        Self {
            table,
            bet,
            sequence: Vec::new(),
            entered: Vec::new(),
            recalling: false,
        }
    }

    fn press(&mut self, pad: u8) -> Result<Step, FloorError> {
        if !self.recalling {
            return Err(FloorError::illegal(GameId::Memory, "watch the pattern first"));
        }
        if pad >= self.table.pads {
            return Err(FloorError::illegal(
                GameId::Memory,
                format!("pad {pad} is not on the board"),
            ));
        }
        let expected = self.sequence[self.entered.len()];
        self.entered.push(pad);
        if pad != expected {
            self.recalling = false;
            return Ok(Step::settle(
                0,
                "Pattern drifted out of focus. Nebula claims the wager.",
            ));
        }
        if self.entered.len() == self.sequence.len() {
            self.recalling = false;
            let payout = pay(self.bet, self.table.perfect);
            return Ok(Step::settle(
                payout,
                format!(
                    "Nebula stabilised! Sequence replayed perfectly for {} credits.",
                    group_thousands(payout)
                ),
            ));
        }
        Ok(Step::status(format!(
            "{} of {} locked in.",
            self.entered.len(),
            self.sequence.len()
        )))
    }
}

impl RoundController for MemoryRound {
    fn game(&self) -> GameId {
        GameId::Memory
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let span = self.table.max_length - self.table.min_length + 1;
        let length = self.table.min_length + rng.below(span);
        self.sequence = (0..length)
            .map(|_| rng.below(self.table.pads as usize) as u8)
            .collect();
        Ok(Step::status("Observe the pattern closely..."))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Signal if !self.recalling && self.entered.is_empty() => {
                self.recalling = true;
                Ok(Step::status("Your turn! Tap the pads in order."))
            }
            Action::Press { pad } => self.press(pad),
            other => Err(FloorError::illegal(
                GameId::Memory,
                format!("{} is not expected right now", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Sequence {
            shown: (!self.recalling && self.entered.is_empty()).then(|| self.sequence.clone()),
            length: self.sequence.len(),
            entered: self.entered.clone(),
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        if self.recalling || !self.entered.is_empty() {
            return None;
        }
        let steps = self.sequence.len().saturating_sub(1) as u64;
        Some(TimerRequest {
            after_ms: steps * self.table.step_ms + self.table.settle_ms,
            input: Action::Signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn reflex(clock: &Arc<ManualClock>) -> ReflexRound {
        ReflexRound::new(ReflexTable::default(), 100, Arc::clone(clock) as Arc<dyn Clock>)
    }

    fn lit_reflex(clock: &Arc<ManualClock>) -> (ReflexRound, GameRng) {
        let mut rng = GameRng::seeded(9);
        let mut round = reflex(clock);
        round.open(&mut rng).unwrap();
        round.act(Action::Signal, &mut rng).unwrap();
        (round, rng)
    }

    #[test]
    fn reflex_arm_delay_in_range() {
        let clock = Arc::new(ManualClock::new());
        let mut rng = GameRng::seeded(4);
        for _ in 0..50 {
            let mut round = reflex(&clock);
            round.open(&mut rng).unwrap();
            let timer = round.timer().unwrap();
            assert_eq!(timer.input, Action::Signal);
            assert!((900..2900).contains(&timer.after_ms));
        }
    }

    #[test]
    fn reflex_false_start() {
        let clock = Arc::new(ManualClock::new());
        let mut rng = GameRng::seeded(1);
        let mut round = reflex(&clock);
        round.open(&mut rng).unwrap();
        clock.advance(5_000);
        assert_eq!(
            round.act(Action::Tap, &mut rng).unwrap(),
            Step::settle(0, "False start! Triggered before the reactor flashed green.")
        );
    }

    #[test]
    fn reflex_tiers_follow_the_clock() {
        let cases = [
            (180, 300, "Lightning fast! 180ms locks in a 3x payout."),
            (400, 200, "Sharp response at 400ms. 2x payout secured."),
            (500, 120, "Solid timing at 500ms. Reactor boosts you by 1.2x."),
            (551, 0, "Reaction checked in at 551ms. Reactor keeps the wager."),
        ];
        for (ms, payout, message) in cases {
            let clock = Arc::new(ManualClock::new());
            clock.set(10_000);
            let (mut round, mut rng) = lit_reflex(&clock);
            clock.advance(ms);
            assert_eq!(round.act(Action::Tap, &mut rng).unwrap(), Step::settle(payout, message));
            assert_eq!(
                round.view(),
                RoundView::Reflex {
                    lit: false,
                    reaction_ms: Some(ms)
                }
            );
            assert!(round.timer().is_none());
        }
    }

    #[test]
    fn instant_tap_is_zero_not_a_chosen_time() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = lit_reflex(&clock);
        assert_eq!(
            round.act(Action::Tap, &mut rng).unwrap(),
            Step::settle(300, "Lightning fast! 0ms locks in a 3x payout.")
        );
    }

    #[test]
    fn tap_after_the_window_is_too_slow() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = lit_reflex(&clock);
        clock.advance(1_500);
        assert_eq!(
            round.act(Action::Tap, &mut rng).unwrap(),
            Step::settle(0, "Too slow! The reactor vented your wager.")
        );
    }

    #[test]
    fn reflex_window_expires() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = lit_reflex(&clock);
        clock.advance(600);
        assert_eq!(
            round.timer(),
            Some(TimerRequest {
                after_ms: 900,
                input: Action::Timeout
            })
        );
        assert!(matches!(round.view(), RoundView::Reflex { lit: true, .. }));
        assert_eq!(
            round.act(Action::Timeout, &mut rng).unwrap(),
            Step::settle(0, "Too slow! The reactor vented your wager.")
        );
    }

    #[test]
    fn reflex_rejects_early_timeout() {
        let clock = Arc::new(ManualClock::new());
        let mut rng = GameRng::seeded(1);
        let mut round = reflex(&clock);
        round.open(&mut rng).unwrap();
        assert!(matches!(
            round.act(Action::Timeout, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
    }

    fn quiz(clock: &Arc<ManualClock>, questions: &[(&str, i64)]) -> QuizRound {
        let mut round = QuizRound::new(QuizTable::default(), 100, Arc::clone(clock) as Arc<dyn Clock>);
        round.open(&mut GameRng::seeded(3)).unwrap();
        round.questions = questions
            .iter()
            .map(|&(prompt, answer)| Question {
                prompt: prompt.to_string(),
                answer,
            })
            .collect();
        round
    }

    #[test]
    fn quiz_questions_are_well_formed() {
        let mut rng = GameRng::seeded(12);
        for _ in 0..200 {
            let q = Question::random(&mut rng);
            let parts: Vec<&str> = q.prompt.split(' ').collect();
            let (a, b): (i64, i64) = (parts[0].parse().unwrap(), parts[2].parse().unwrap());
            let expected = match parts[1] {
                "+" => a + b,
                "−" => a - b,
                "×" => a * b,
                op => panic!("unexpected operator {op}"),
            };
            assert_eq!(q.answer, expected);
            assert!((-4..=98).contains(&q.answer));
        }
    }

    #[test]
    fn quiz_pays_by_correct_answers() {
        let script = [("12 + 30", 42), ("40 − 7", 33), ("3 × 4", 12)];
        let cases: [(&[i64], u64, &str); 4] = [
            (&[42, 33, 12], 300, "Flawless! 3/3 correct earns 300 credits."),
            (&[42, 33, 13], 180, "Great work, 2/3 correct multiplies your stake by 1.8x."),
            (&[42, 0, 0], 100, "1/3 correct salvaged your stake. Credits returned."),
            (&[1, 2, 3], 0, "All answers drifted off target. Vault keeps the wager."),
        ];
        for (answers, payout, message) in cases {
            let clock = Arc::new(ManualClock::new());
            let mut round = quiz(&clock, &script);
            let mut rng = GameRng::seeded(0);
            let mut last = None;
            for &value in answers {
                last = Some(round.act(Action::Answer { value }, &mut rng).unwrap());
            }
            assert_eq!(last.unwrap(), Step::settle(payout, message));
        }
    }

    #[test]
    fn quiz_deadline_comes_from_the_clock() {
        let clock = Arc::new(ManualClock::new());
        let mut round = quiz(&clock, &[("1 + 1", 2), ("2 + 2", 4), ("3 + 3", 6)]);
        let mut rng = GameRng::seeded(0);
        round.act(Action::Answer { value: 2 }, &mut rng).unwrap();
        clock.advance(10_000);
        assert_eq!(
            round.timer(),
            Some(TimerRequest {
                after_ms: 15_000,
                input: Action::Timeout
            })
        );
        assert!(matches!(
            round.view(),
            RoundView::Quiz { prompt: Some(ref p), answered: 1, total: 3, time_left_ms: 15_000 } if p == "2 + 2"
        ));

        clock.advance(15_000);
        // a correct answer after the deadline still loses
        assert_eq!(
            round.act(Action::Answer { value: 4 }, &mut rng).unwrap(),
            Step::settle(0, "Time collapsed before you finished. Quantum vault keeps the wager.")
        );
        assert!(round.timer().is_none());
        assert!(round.act(Action::Answer { value: 6 }, &mut rng).is_err());
    }

    fn drone(clock: &Arc<ManualClock>) -> (TargetRound, GameRng) {
        let mut rng = GameRng::seeded(6);
        let mut round = TargetRound::new(TargetTable::default(), 100, Arc::clone(clock) as Arc<dyn Clock>);
        round.open(&mut rng).unwrap();
        (round, rng)
    }

    fn shoot_drone(round: &mut TargetRound, rng: &mut GameRng) -> Step {
        let (x, y) = (round.x, round.y);
        round.act(Action::Shoot { x, y }, rng).unwrap()
    }

    #[test]
    fn drone_stays_inside_the_arena() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = drone(&clock);
        for _ in 0..100 {
            round.relocate(&mut rng);
            assert!((12..=88).contains(&round.x));
            assert!((18..=82).contains(&round.y));
        }
    }

    #[test]
    fn six_hits_disable_the_drone() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = drone(&clock);
        for _ in 0..5 {
            clock.advance(300);
            assert!(matches!(shoot_drone(&mut round, &mut rng), Step::Continue { .. }));
        }
        assert_eq!(
            shoot_drone(&mut round, &mut rng),
            Step::settle(250, "Drone disabled! 6 hits bank 250 credits.")
        );
    }

    #[test]
    fn wide_shot_misses() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = drone(&clock);
        let x = if round.x > 50 { round.x - 6 } else { round.x + 6 };
        let step = round.act(Action::Shoot { x, y: round.y }, &mut rng).unwrap();
        assert_eq!(
            step,
            Step::status(format!("Missed. The drone is at ({}, {}).", round.x, round.y))
        );
        assert_eq!(round.hits, 0);
    }

    #[test]
    fn drone_moves_on_ticks_then_escapes() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = drone(&clock);
        for _ in 0..4 {
            shoot_drone(&mut round, &mut rng);
        }
        assert_eq!(
            round.timer(),
            Some(TimerRequest {
                after_ms: 850,
                input: Action::Tick
            })
        );
        clock.advance(850);
        assert!(matches!(round.act(Action::Tick, &mut rng).unwrap(), Step::Continue { .. }));

        clock.set(19_500);
        round.act(Action::Tick, &mut rng).unwrap();
        // the next move would land after the deadline
        assert_eq!(
            round.timer(),
            Some(TimerRequest {
                after_ms: 500,
                input: Action::Timeout
            })
        );
        clock.set(20_000);
        // the countdown ran out, so the next input ends the round
        assert_eq!(
            shoot_drone(&mut round, &mut rng),
            Step::settle(140, "Solid pursuit: 4 hits earn a 140 credit haul.")
        );
    }

    #[test]
    fn drone_escape_without_hits() {
        let clock = Arc::new(ManualClock::new());
        let (mut round, mut rng) = drone(&clock);
        assert_eq!(
            round.act(Action::Timeout, &mut rng).unwrap(),
            Step::settle(0, "Drone escaped after 0 hits.")
        );
    }

    fn scripted_memory(sequence: &[u8]) -> MemoryRound {
        let mut round = MemoryRound::new(MemoryTable::default(), 100);
        round.sequence = sequence.to_vec();
        round
    }

    #[test]
    fn memory_sequence_shown_then_hidden() {
        let mut rng = GameRng::seeded(2);
        let mut round = MemoryRound::new(MemoryTable::default(), 100);
        round.open(&mut rng).unwrap();
        let len = round.sequence.len();
        assert!((3..=5).contains(&len));
        assert!(round.sequence.iter().all(|&p| p < 4));
        assert_eq!(round.timer().unwrap().after_ms, (len as u64 - 1) * 620 + 320);
        assert!(matches!(round.view(), RoundView::Sequence { shown: Some(_), .. }));

        round.act(Action::Signal, &mut rng).unwrap();
        assert!(matches!(round.view(), RoundView::Sequence { shown: None, .. }));
        assert!(round.timer().is_none());
    }

    #[test]
    fn memory_perfect_replay_pays() {
        let mut rng = GameRng::seeded(0);
        let mut round = scripted_memory(&[2, 0, 3]);
        assert!(matches!(
            round.act(Action::Press { pad: 2 }, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
        round.act(Action::Signal, &mut rng).unwrap();
        round.act(Action::Press { pad: 2 }, &mut rng).unwrap();
        round.act(Action::Press { pad: 0 }, &mut rng).unwrap();
        assert_eq!(
            round.act(Action::Press { pad: 3 }, &mut rng).unwrap(),
            Step::settle(280, "Nebula stabilised! Sequence replayed perfectly for 280 credits.")
        );
    }

    #[test]
    fn memory_wrong_pad_loses() {
        let mut rng = GameRng::seeded(0);
        let mut round = scripted_memory(&[1, 1, 2, 0]);
        round.act(Action::Signal, &mut rng).unwrap();
        round.act(Action::Press { pad: 1 }, &mut rng).unwrap();
        match round.act(Action::Press { pad: 3 }, &mut rng).unwrap() {
            Step::Settle(o) => assert_eq!(o.payout, 0),
            other => panic!("expected settlement, got {other:?}"),
        }
    }

    #[test]
    fn memory_rejects_missing_pad() {
        let mut rng = GameRng::seeded(0);
        let mut round = scripted_memory(&[1, 2, 3]);
        round.act(Action::Signal, &mut rng).unwrap();
        assert!(matches!(
            round.act(Action::Press { pad: 4 }, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
        assert!(round.entered.is_empty());
    }
}
