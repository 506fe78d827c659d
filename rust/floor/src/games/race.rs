use arcade_engine::rng::GameRng;

use crate::errors::FloorError;
use crate::round::{
    pay, Action, GameId, Pick, RoundController, RoundView, RunnerView, Step, TimerRequest,
};
use crate::stats::group_thousands;
use crate::tables::DerbyTable;

const FINISH_LINE: f64 = 100.0;
/// Runners this close to the leader share the finish.
const DEAD_HEAT: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Runner {
    pick: Pick,
    momentum: f64,
    progress: f64,
}

/// Three runners stride on every `Tick` until one crosses the line. The
/// player backs one of them and may cheer it forward once.
#[derive(Debug)]
pub struct DerbyRound {
    table: DerbyTable,
    bet: u64,
    pick: Pick,
    runners: Vec<Runner>,
    cheered: bool,
    running: bool,
}

impl DerbyRound {
    pub fn new(table: DerbyTable, bet: u64, pick: Pick) -> Self {
        let runners = Pick::RUNNERS
            .iter()
            .map(|&pick| Runner {
                pick,
                momentum: 1.0,
                progress: 0.0,
            })
            .collect();
        Self {
            table,
            bet,
            pick,
            runners,
            cheered: false,
            running: false,
        }
    }

    fn backed(&mut self) -> Option<&mut Runner> {
        let pick = self.pick;
        self.runners.iter_mut().find(|r| r.pick == pick)
    }

    fn stride(&mut self, rng: &mut GameRng) -> Step {
        for runner in &mut self.runners {
            let bias = if runner.pick == self.pick {
                self.table.pick_bias
            } else {
                1.0
            };
            let stride = (rng.unit() * self.table.stride_spread + self.table.stride_floor)
                * runner.momentum
                * bias;
            runner.progress = (runner.progress + stride).min(FINISH_LINE);
        }
        if self.runners.iter().any(|r| r.progress >= FINISH_LINE) {
            return self.finish();
        }
        let leader = self
            .runners
            .iter()
            .max_by(|a, b| a.progress.total_cmp(&b.progress))
            .map_or("Nobody", |r| r.pick.label());
        Step::status(format!("{leader} leads the pack."))
    }

    fn finish(&mut self) -> Step {
        self.running = false;
        let top = self
            .runners
            .iter()
            .map(|r| r.progress)
            .fold(f64::MIN, f64::max);
        let winners: Vec<Pick> = self
            .runners
            .iter()
            .filter(|r| (r.progress - top).abs() < DEAD_HEAT)
            .map(|r| r.pick)
            .collect();
        let name = self.pick.label();
        if !winners.contains(&self.pick) {
            let names: Vec<&str> = winners.iter().map(|p| p.label()).collect();
            return Step::settle(
                0,
                format!("{} sprinted ahead of your pick {name}.", names.join(" & ")),
            );
        }
        if winners.len() == 1 {
            let payout = pay(self.bet, self.table.sole_win);
            return Step::settle(
                payout,
                format!(
                    "{name} takes the win! You collect {} credits.",
                    group_thousands(payout)
                ),
            );
        }
        let partners: Vec<&str> = winners
            .iter()
            .filter(|&&p| p != self.pick)
            .map(|p| p.label())
            .collect();
        Step::settle(
            pay(self.bet, self.table.shared_win),
            format!(
                "{name} shares the win with {}. Split purse awarded.",
                partners.join(" & ")
            ),
        )
    }
}

impl RoundController for DerbyRound {
    fn game(&self) -> GameId {
        GameId::Derby
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        for runner in &mut self.runners {
            runner.momentum = self.table.momentum_floor + rng.unit() * self.table.momentum_spread;
            runner.progress = 0.0;
        }
        self.cheered = false;
        self.running = true;
        Ok(Step::status(format!(
            "Race underway! Cheer once to boost {}.",
            self.pick.label()
        )))
    }

    fn act(&mut self, action: Action, rng: &mut GameRng) -> Result<Step, FloorError> {
        if !self.running {
            return Err(FloorError::illegal(GameId::Derby, "the race is over"));
        }
        match action {
            Action::Tick => Ok(self.stride(rng)),
            Action::Cheer if self.cheered => Err(FloorError::illegal(
                GameId::Derby,
                "the crowd has already cheered",
            )),
            Action::Cheer => {
                self.cheered = true;
                let boost = self.table.cheer_boost;
                if let Some(runner) = self.backed() {
                    runner.progress = (runner.progress + boost).min(FINISH_LINE);
                }
                Ok(Step::status(format!(
                    "{} surges forward with the crowd behind them!",
                    self.pick.label()
                )))
            }
            other => Err(FloorError::illegal(
                GameId::Derby,
                format!("{} is not expected right now", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        RoundView::Race {
            runners: self
                .runners
                .iter()
                .map(|r| RunnerView {
                    name: r.pick.label().to_string(),
                    progress: r.progress,
                })
                .collect(),
            pick: self.pick,
            cheered: self.cheered,
        }
    }

    fn timer(&self) -> Option<TimerRequest> {
        self.running.then(|| TimerRequest {
            after_ms: self.table.tick_ms,
            input: Action::Tick,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn racing(pick: Pick) -> (DerbyRound, GameRng) {
        let mut rng = GameRng::seeded(21);
        let mut round = DerbyRound::new(DerbyTable::default(), 100, pick);
        round.open(&mut rng).unwrap();
        (round, rng)
    }

    fn place(round: &mut DerbyRound, progress: [f64; 3]) {
        for (runner, p) in round.runners.iter_mut().zip(progress) {
            runner.progress = p;
        }
    }

    #[test]
    fn opening_sets_momentum_in_range() {
        let (round, _) = racing(Pick::Comet);
        for runner in &round.runners {
            assert!((0.85..1.15).contains(&runner.momentum));
            assert_eq!(runner.progress, 0.0);
        }
        assert_eq!(
            round.timer(),
            Some(TimerRequest {
                after_ms: 180,
                input: Action::Tick
            })
        );
    }

    #[test]
    fn ticks_run_until_someone_finishes() {
        let (mut round, mut rng) = racing(Pick::Nova);
        let mut ticks = 0;
        let outcome = loop {
            ticks += 1;
            match round.act(Action::Tick, &mut rng).unwrap() {
                Step::Continue { .. } => continue,
                Step::Settle(outcome) => break outcome,
            }
        };
        // the slowest possible pace still needs well under 50 strides
        assert!((9..50).contains(&ticks));
        assert!([0, 200, 400].contains(&outcome.payout));
        assert!(round.timer().is_none());
        assert!(round.act(Action::Tick, &mut rng).is_err());
    }

    #[test]
    fn cheer_boosts_the_pick_once() {
        let (mut round, mut rng) = racing(Pick::Eclipse);
        place(&mut round, [40.0, 40.0, 40.0]);
        assert_eq!(
            round.act(Action::Cheer, &mut rng).unwrap(),
            Step::status("Eclipse surges forward with the crowd behind them!")
        );
        assert_eq!(round.runners[2].progress, 52.0);
        assert!(matches!(round.view(), RoundView::Race { cheered: true, .. }));
        assert!(matches!(
            round.act(Action::Cheer, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
    }

    #[test]
    fn cheer_is_capped_at_the_line() {
        let (mut round, mut rng) = racing(Pick::Nova);
        place(&mut round, [95.0, 10.0, 10.0]);
        round.act(Action::Cheer, &mut rng).unwrap();
        assert_eq!(round.runners[0].progress, 100.0);
    }

    #[test]
    fn sole_winner_pays_four_times() {
        let (mut round, _) = racing(Pick::Comet);
        place(&mut round, [91.0, 100.0, 97.5]);
        assert_eq!(
            round.finish(),
            Step::settle(400, "Comet takes the win! You collect 400 credits.")
        );
    }

    #[test]
    fn dead_heat_splits_the_purse() {
        let (mut round, _) = racing(Pick::Nova);
        place(&mut round, [100.0, 99.995, 80.0]);
        assert_eq!(
            round.finish(),
            Step::settle(200, "Nova shares the win with Comet. Split purse awarded.")
        );
    }

    #[test]
    fn losing_pick_names_the_winners() {
        let (mut round, _) = racing(Pick::Eclipse);
        place(&mut round, [100.0, 100.0, 70.0]);
        assert_eq!(
            round.finish(),
            Step::settle(0, "Nova & Comet sprinted ahead of your pick Eclipse.")
        );
    }

    #[test]
    fn race_rejects_other_inputs() {
        let (mut round, mut rng) = racing(Pick::Nova);
        assert!(matches!(
            round.act(Action::Hit, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
    }
}
