use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::round::{GameId, Tone};
use crate::store::Slot;

pub const DEFAULT_LOG_CAPACITY: usize = 20;

/// One settled round. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub round_id: Uuid,
    pub game: GameId,
    pub message: String,
    pub bet: u64,
    pub payout: u64,
    pub net: i64,
    pub tone: Tone,
    pub at: DateTime<Utc>,
}

impl SettlementEntry {
    pub fn new(round_id: Uuid, game: GameId, bet: u64, payout: u64, message: String) -> Self {
        let net = payout as i64 - bet as i64;
        Self {
            round_id,
            game,
            message,
            bet,
            payout,
            net,
            tone: Tone::from_net(net),
            at: Utc::now(),
        }
    }

    /// `"+150"`, `"-50"` or `"±0"`.
    pub fn net_label(&self) -> String {
        match self.net {
            n if n > 0 => format!("+{n}"),
            0 => "±0".to_string(),
            n => n.to_string(),
        }
    }
}

/// Bounded most-recent-first log of settlements, optionally mirrored to a
/// persisted slot.
#[derive(Debug)]
pub struct SettlementLog {
    entries: RwLock<VecDeque<SettlementEntry>>,
    capacity: usize,
    slot: Option<Slot>,
}

impl Default for SettlementLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl SettlementLog {
    /// Memory-only log.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            slot: None,
        }
    }

    /// Restores entries saved in `slot`, newest first, trimmed to `capacity`.
    pub fn open(capacity: usize, slot: Slot) -> Self {
        let capacity = capacity.max(1);
        let mut entries: VecDeque<SettlementEntry> = slot
            .load_json::<Vec<SettlementEntry>>()
            .unwrap_or_default()
            .into();
        entries.truncate(capacity);
        Self {
            entries: RwLock::new(entries),
            capacity,
            slot: Some(slot),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepends an entry, evicting the oldest beyond capacity.
    pub fn record(&self, entry: SettlementEntry) -> Result<(), HistoryError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        entries.push_front(entry);
        entries.truncate(self.capacity);
        if let Some(slot) = &self.slot {
            slot.save_json(&*entries);
        }
        Ok(())
    }

    /// Newest first, at most `limit` entries (all when `None`).
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<SettlementEntry>, HistoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        let limit = limit.unwrap_or(self.capacity);
        Ok(entries.iter().take(limit).cloned().collect())
    }

    /// Most recent settlement for one game, if still in the log.
    pub fn last_for(&self, game: GameId) -> Result<Option<SettlementEntry>, HistoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(entries.iter().find(|e| e.game == game).cloned())
    }

    pub fn len(&self) -> Result<usize, HistoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, HistoryError> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Settlement log lock poisoned")]
    StoragePoisoned,
}
