use crate::error::Result;

/// A single key-value slot holding the encoded history.
pub trait HistoryPersistence: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
