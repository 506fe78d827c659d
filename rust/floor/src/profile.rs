use std::sync::Mutex;

use crate::errors::FloorError;
use crate::store::Slot;

pub const MAX_ALIAS_CHARS: usize = 24;

/// Display alias, trimmed and capped at [`MAX_ALIAS_CHARS`] characters.
#[derive(Debug)]
pub struct Profile {
    alias: Mutex<Option<String>>,
    slot: Slot,
}

impl Profile {
    pub fn open(slot: Slot) -> Self {
        let alias = slot
            .load_json::<String>()
            .and_then(|raw| normalize_alias(&raw));
        Self {
            alias: Mutex::new(alias),
            slot,
        }
    }

    pub fn alias(&self) -> Result<Option<String>, FloorError> {
        let guard = self.alias.lock().map_err(|_| FloorError::StoragePoisoned)?;
        Ok(guard.clone())
    }

    /// Stores the normalized alias; blank input clears it.
    pub fn set_alias(&self, raw: &str) -> Result<Option<String>, FloorError> {
        let alias = normalize_alias(raw);
        let mut guard = self.alias.lock().map_err(|_| FloorError::StoragePoisoned)?;
        match &alias {
            Some(name) => self.slot.save_json(name),
            None => self.slot.clear(),
        }
        *guard = alias.clone();
        Ok(alias)
    }
}

pub fn normalize_alias(raw: &str) -> Option<String> {
    let trimmed: String = raw.trim().chars().take(MAX_ALIAS_CHARS).collect();
    let trimmed = trimmed.trim_end();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
