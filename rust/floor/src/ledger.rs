//! The bankroll: one non-negative integer balance shared by every game.
//!
//! All mutations go through a mutex that is held across the persistence
//! write, so two mutations never interleave and the stored value always
//! matches some state the ledger was in.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::errors::FloorError;
use crate::events::{EventBus, FloorEvent};
use crate::round::Tone;
use crate::store::Slot;

pub const DEFAULT_STARTING_CREDITS: u64 = 1000;

/// Why the balance changed, as carried on balance events.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceChange {
    /// A persisted balance replaced the starting credits at startup.
    Restored,
    Debit,
    Credit,
    Reset,
    Set,
    /// Another process wrote a different balance to the shared store.
    Synced,
}

impl BalanceChange {
    pub fn tone(self) -> Tone {
        match self {
            BalanceChange::Credit => Tone::Positive,
            BalanceChange::Debit => Tone::Negative,
            _ => Tone::Neutral,
        }
    }

    pub fn is_initial(self) -> bool {
        matches!(self, BalanceChange::Restored)
    }
}

#[derive(Debug)]
pub struct Bankroll {
    balance: Mutex<u64>,
    starting_credits: u64,
    slot: Slot,
    bus: EventBus,
}

impl Bankroll {
    /// Builds the ledger, adopting a persisted balance when one is present
    /// and valid.
    pub fn open(starting_credits: u64, slot: Slot, bus: EventBus) -> Self {
        let restored = slot.load_raw().and_then(|raw| parse_balance(&raw));
        let balance = restored.unwrap_or(starting_credits);
        let ledger = Self {
            balance: Mutex::new(balance),
            starting_credits,
            slot,
            bus,
        };
        if balance != starting_credits {
            tracing::info!(balance, starting_credits, "restored persisted bankroll");
            ledger.notify(balance, BalanceChange::Restored);
        }
        ledger
    }

    pub fn starting_credits(&self) -> u64 {
        self.starting_credits
    }

    pub fn balance(&self) -> Result<u64, FloorError> {
        let guard = self
            .balance
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        Ok(*guard)
    }

    /// Clamps to `max(0, round(amount))`. Non-finite input reads as zero.
    pub fn set_balance(&self, amount: f64) -> Result<u64, FloorError> {
        let value = clamp_amount(amount);
        self.mutate(BalanceChange::Set, |_| Some(value))
            .map(|v| v.unwrap_or(value))
    }

    /// Removes `amount` from the balance. Returns `false` without touching
    /// anything when the balance does not cover it.
    pub fn debit(&self, amount: u64) -> Result<bool, FloorError> {
        let applied = self.mutate(BalanceChange::Debit, |current| {
            (amount <= current).then(|| current - amount)
        })?;
        if applied.is_none() {
            tracing::debug!(amount, "debit refused, balance too low");
        }
        Ok(applied.is_some())
    }

    /// Adds `|amount|`.
    pub fn credit(&self, amount: i64) -> Result<u64, FloorError> {
        let amount = amount.unsigned_abs();
        self.mutate(BalanceChange::Credit, |current| {
            Some(current.saturating_add(amount))
        })
        .map(|v| v.unwrap_or_default())
    }

    pub fn reset(&self) -> Result<u64, FloorError> {
        let start = self.starting_credits;
        tracing::info!(balance = start, "bankroll reset");
        self.mutate(BalanceChange::Reset, |_| Some(start))
            .map(|v| v.unwrap_or(start))
    }

    /// Re-reads the persisted balance and adopts it when it differs from
    /// memory. Returns the adopted value.
    pub fn sync_from_storage(&self) -> Result<Option<u64>, FloorError> {
        let Some(stored) = self.slot.load_raw().and_then(|raw| parse_balance(&raw)) else {
            return Ok(None);
        };
        let mut guard = self
            .balance
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        if *guard == stored {
            return Ok(None);
        }
        tracing::info!(from = *guard, to = stored, "adopted externally written balance");
        *guard = stored;
        drop(guard);
        self.notify(stored, BalanceChange::Synced);
        Ok(Some(stored))
    }

    /// Applies `f` under the lock and persists the result. `f` returning
    /// `None` leaves the balance untouched.
    fn mutate<F>(&self, change: BalanceChange, f: F) -> Result<Option<u64>, FloorError>
    where
        F: FnOnce(u64) -> Option<u64>,
    {
        let mut guard = self
            .balance
            .lock()
            .map_err(|_| FloorError::StoragePoisoned)?;
        let Some(next) = f(*guard) else {
            return Ok(None);
        };
        *guard = next;
        self.slot.save_raw(&next.to_string());
        drop(guard);
        self.notify(next, change);
        Ok(Some(next))
    }

    fn notify(&self, balance: u64, change: BalanceChange) {
        self.bus.publish(FloorEvent::Balance { balance, change });
    }
}

fn clamp_amount(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    amount.round() as u64
}

fn parse_balance(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        tracing::warn!(raw, "ignoring invalid persisted balance");
        None
    }
}
