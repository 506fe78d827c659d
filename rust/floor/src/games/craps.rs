use arcade_engine::dice::{come_out, point_roll, ComeOut, PointRoll};
use arcade_engine::rng::GameRng;

use crate::errors::FloorError;
use crate::round::{pay, Action, GameId, RoundController, RoundView, Step};
use crate::tables::CrapsTable;

/// Pass-line craps: the come-out roll happens when the round opens, then
/// `Roll` repeats until the point is made or a seven shows.
#[derive(Debug)]
pub struct CrapsRound {
    table: CrapsTable,
    bet: u64,
    dice: [u8; 2],
    point: Option<u8>,
}

impl CrapsRound {
    pub fn new(table: CrapsTable, bet: u64) -> Self {
        Self {
            table,
            bet,
            dice: [1, 1],
            point: None,
        }
    }

    fn throw(&mut self, rng: &mut GameRng) -> u8 {
        self.dice = [rng.roll_die(), rng.roll_die()];
        self.dice[0] + self.dice[1]
    }

    /// Applies one roll total to the current phase.
    pub fn apply(&mut self, total: u8) -> Step {
        let win = pay(self.bet, self.table.win);
        match self.point {
            None => match come_out(total) {
                ComeOut::Natural(n) => {
                    Step::settle(win, format!("Natural {n}! You pocket {win} credits."))
                }
                ComeOut::Craps(n) => {
                    Step::settle(0, format!("Craps {n}. The house scoops your stake."))
                }
                ComeOut::Point(n) => {
                    self.point = Some(n);
                    Step::status(format!(
                        "Point set at {n}. Roll {n} before a seven to score."
                    ))
                }
            },
            Some(point) => match point_roll(total, point) {
                PointRoll::Made => {
                    Step::settle(win, format!("Point made! {total} hits and pays even money."))
                }
                PointRoll::SevenOut => Step::settle(0, "Seven out. Dice go cold."),
                PointRoll::Again => Step::status(format!(
                    "Rolled {total}. Still hunting for the point {point}."
                )),
            },
        }
    }
}

impl RoundController for CrapsRound {
    fn game(&self) -> GameId {
        GameId::Craps
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        let total = self.throw(rng);
        Ok(self.apply(total))
    }

    fn act(&mut self, action: Action, rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Roll => {
                let total = self.throw(rng);
                Ok(self.apply(total))
            }
            other => Err(FloorError::illegal(
                GameId::Craps,
                format!("{} does nothing at the craps table, roll", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Dice {
            dice: self.dice.to_vec(),
            point: self.point,
            house: Vec::new(),
        }
    }
}
