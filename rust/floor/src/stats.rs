use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::errors::FloorError;
use crate::events::{EventBus, FloorEvent};
use crate::round::GameId;
use crate::store::Slot;

/// Raw persisted counters. Every derived figure is computed by
/// [`StatsRecord::snapshot`] on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    pub total_won: u64,
    pub total_lost: u64,
    pub biggest_win: u64,
    pub current_streak: i64,
    pub longest_win_streak: i64,
    pub longest_loss_streak: i64,
    pub last_game: Option<GameId>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatsRecord {
    pub fn record(&mut self, game: GameId, net: i64) {
        self.rounds += 1;
        self.last_game = Some(game);
        self.updated_at = Some(Utc::now());

        match net {
            n if n > 0 => {
                let won = n.unsigned_abs();
                self.wins += 1;
                self.total_won += won;
                self.biggest_win = self.biggest_win.max(won);
                self.current_streak = if self.current_streak >= 0 {
                    self.current_streak + 1
                } else {
                    1
                };
                self.longest_win_streak = self.longest_win_streak.max(self.current_streak);
            }
            0 => self.pushes += 1,
            n => {
                self.losses += 1;
                self.total_lost += n.unsigned_abs();
                self.current_streak = if self.current_streak <= 0 {
                    self.current_streak - 1
                } else {
                    -1
                };
                self.longest_loss_streak = self.longest_loss_streak.min(self.current_streak);
            }
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let win_rate = if self.rounds > 0 {
            self.wins as f64 / self.rounds as f64 * 100.0
        } else {
            0.0
        };
        let net = self.total_won as i64 - self.total_lost as i64;
        let streak = self.current_streak;

        StatsSnapshot {
            rounds: self.rounds,
            wins: self.wins,
            losses: self.losses,
            pushes: self.pushes,
            total_won: self.total_won,
            total_lost: self.total_lost,
            net,
            biggest_win: self.biggest_win,
            win_rate,
            current_streak: streak,
            longest_win_streak: self.longest_win_streak.max(0),
            longest_loss_streak: self.longest_loss_streak.min(0),
            last_game: self.last_game,
            updated_at: self.updated_at,
            win_rate_label: format!("{win_rate:.1}%"),
            total_won_label: format!("{} credits", group_thousands(self.total_won)),
            biggest_win_label: if self.biggest_win > 0 {
                format!("{} credits", group_thousands(self.biggest_win))
            } else {
                "--".to_string()
            },
            net_label: format!(
                "{}{} credits",
                if net >= 0 { '+' } else { '-' },
                group_thousands(net.unsigned_abs())
            ),
            rounds_label: plural(self.rounds, "bet"),
            wins_label: plural(self.wins, "win"),
            current_streak_label: match streak {
                0 => "Neutral streak".to_string(),
                s if s > 0 => format!("+{s} win streak"),
                s => format!("-{} loss streak", s.unsigned_abs()),
            },
        }
    }
}

/// Read model with derived values and display labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    pub total_won: u64,
    pub total_lost: u64,
    pub net: i64,
    pub biggest_win: u64,
    pub win_rate: f64,
    pub current_streak: i64,
    pub longest_win_streak: i64,
    pub longest_loss_streak: i64,
    pub last_game: Option<GameId>,
    pub updated_at: Option<DateTime<Utc>>,
    pub win_rate_label: String,
    pub total_won_label: String,
    pub biggest_win_label: String,
    pub net_label: String,
    pub rounds_label: String,
    pub wins_label: String,
    pub current_streak_label: String,
}

fn plural(n: u64, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Persisted aggregate statistics.
#[derive(Debug)]
pub struct StatsTracker {
    record: Mutex<StatsRecord>,
    slot: Slot,
    bus: EventBus,
}

impl StatsTracker {
    pub fn open(slot: Slot, bus: EventBus) -> Self {
        let record = slot.load_json::<StatsRecord>().unwrap_or_default();
        Self {
            record: Mutex::new(record),
            slot,
            bus,
        }
    }

    pub fn record(&self, game: GameId, net: i64) -> Result<StatsSnapshot, FloorError> {
        self.update(|r| r.record(game, net))
    }

    pub fn reset(&self) -> Result<StatsSnapshot, FloorError> {
        tracing::info!("stats reset");
        self.update(|r| {
            *r = StatsRecord {
                updated_at: Some(Utc::now()),
                ..StatsRecord::default()
            }
        })
    }

    pub fn snapshot(&self) -> Result<StatsSnapshot, FloorError> {
        let guard = self.record.lock().map_err(|_| FloorError::StoragePoisoned)?;
        Ok(guard.snapshot())
    }

    fn update<F: FnOnce(&mut StatsRecord)>(&self, f: F) -> Result<StatsSnapshot, FloorError> {
        let mut guard = self.record.lock().map_err(|_| FloorError::StoragePoisoned)?;
        f(&mut guard);
        self.slot.save_json(&*guard);
        let snapshot = guard.snapshot();
        drop(guard);
        self.bus.publish(FloorEvent::Stats {
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore, STATS_KEY};
    use std::sync::Arc;

    #[test]
    fn streaks_extend_and_flip() {
        let mut r = StatsRecord::default();
        r.record(GameId::Slots, 20);
        r.record(GameId::Slots, 10);
        assert_eq!(r.current_streak, 2);
        r.record(GameId::Duel, -25);
        assert_eq!(r.current_streak, -1);
        r.record(GameId::Duel, -25);
        r.record(GameId::Duel, -25);
        assert_eq!(r.current_streak, -3);
        r.record(GameId::Craps, 50);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.longest_win_streak, 2);
        assert_eq!(r.longest_loss_streak, -3);
    }

    #[test]
    fn push_counts_round_but_keeps_streak() {
        let mut r = StatsRecord::default();
        r.record(GameId::Blackjack, 50);
        r.record(GameId::Blackjack, 0);
        assert_eq!(r.rounds, 2);
        assert_eq!(r.pushes, 1);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.wins + r.losses + r.pushes, r.rounds);
    }

    #[test]
    fn snapshot_labels() {
        let mut r = StatsRecord::default();
        let empty = r.snapshot();
        assert_eq!(empty.win_rate_label, "0.0%");
        assert_eq!(empty.biggest_win_label, "--");
        assert_eq!(empty.current_streak_label, "Neutral streak");
        assert_eq!(empty.rounds_label, "0 bets");

        r.record(GameId::Slots, 1500);
        r.record(GameId::Slots, 250);
        r.record(GameId::Slots, -100);
        let s = r.snapshot();
        assert_eq!(s.rounds_label, "3 bets");
        assert_eq!(s.wins_label, "2 wins");
        assert_eq!(s.win_rate_label, "66.7%");
        assert_eq!(s.net, 1650);
        assert_eq!(s.net_label, "+1,650 credits");
        assert_eq!(s.biggest_win_label, "1,500 credits");
        assert_eq!(s.current_streak_label, "-1 loss streak");
    }

    #[test]
    fn negative_net_label() {
        let mut r = StatsRecord::default();
        r.record(GameId::Mines, -20);
        assert_eq!(r.snapshot().net_label, "-20 credits");
        assert_eq!(r.snapshot().wins_label, "0 wins");
    }

    #[test]
    fn tracker_persists_and_resets() {
        let store = MemoryStore::new();
        let slot = Slot::new(Arc::new(store.clone()), STATS_KEY);
        let tracker = StatsTracker::open(slot.clone(), EventBus::new());
        tracker.record(GameId::Crash, 40).unwrap();

        let reopened = StatsTracker::open(slot, EventBus::new());
        assert_eq!(reopened.snapshot().unwrap().wins, 1);

        reopened.reset().unwrap();
        assert_eq!(reopened.snapshot().unwrap().rounds, 0);
        let raw = store.read(STATS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"rounds\":0"));
    }

    #[test]
    fn partial_record_fills_defaults() {
        let store = MemoryStore::new();
        store.write(STATS_KEY, r#"{"rounds":4,"wins":1}"#).unwrap();
        let tracker = StatsTracker::open(Slot::new(Arc::new(store), STATS_KEY), EventBus::new());
        let snap = tracker.snapshot().unwrap();
        assert_eq!(snap.rounds, 4);
        assert_eq!(snap.win_rate_label, "25.0%");
        assert_eq!(snap.current_streak, 0);
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
