use crate::{
    error::{ImageGenError, Result},
    history::traits::HistoryPersistence,
};
use std::sync::{Arc, Mutex};

/// Process-local slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Raw stored value.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl HistoryPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| ImageGenError::Storage(e.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, value: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| ImageGenError::Storage(e.to_string()))?;
        *slot = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| ImageGenError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
