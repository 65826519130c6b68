//! Capped, newest-first list of past generations backed by one persisted slot.
//!
//! Every mutation writes through to the backend before returning. Storage
//! failures never reach the caller: a bad read degrades to an empty history
//! and a failed write only gets logged, leaving memory ahead of the slot
//! until the next successful write.

pub mod file;
pub mod memory;
pub mod traits;

use crate::{config::HistoryConfig, error::ImageGenError, models::GeneratedImage};

pub use file::FilePersistence;
pub use memory::MemoryPersistence;
pub use traits::HistoryPersistence;

pub const CAPACITY: usize = crate::config::HISTORY_CAPACITY;

pub struct HistoryStore {
    backend: Box<dyn HistoryPersistence>,
    images: Vec<GeneratedImage>,
}

impl HistoryStore {
    /// Creates the store and loads whatever the backend already holds.
    pub fn new(backend: impl HistoryPersistence + 'static) -> Self {
        let mut store = Self {
            backend: Box::new(backend),
            images: Vec::new(),
        };
        store.load();
        store
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(FilePersistence::new(config.path.clone()))
    }

    /// Re-reads the persisted slot, replacing the in-memory list.
    pub fn load(&mut self) -> &[GeneratedImage] {
        self.images = match self.backend.load() {
            Ok(Some(raw)) => serde_json::from_str::<Vec<GeneratedImage>>(&raw).unwrap_or_else(|e| {
                log::warn!("Error loading history, starting empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Error loading history, starting empty: {}", e);
                Vec::new()
            }
        };
        self.images.truncate(CAPACITY);
        &self.images
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Puts `image` at the front, evicting from the tail beyond capacity.
    pub fn insert(&mut self, image: GeneratedImage) {
        self.images.insert(0, image);
        self.images.truncate(CAPACITY);
        self.persist();
    }

    /// Drops the record with `id`. Unknown ids leave the list as it was.
    pub fn remove(&mut self, id: &str) {
        self.images.retain(|image| image.id != id);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.images.clear();
        if let Err(e) = self.backend.clear() {
            log::error!("Error clearing history: {}", e);
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.images)
            .map_err(ImageGenError::from)
            .and_then(|raw| self.backend.save(&raw));
        if let Err(e) = result {
            log::error!("Error saving to history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn image(n: usize) -> GeneratedImage {
        let mut image = GeneratedImage::new(format!("https://x.com/{}.png", n), format!("prompt {}", n));
        image.id = format!("img_{}", n);
        image
    }

    struct ReadOnlyPersistence;

    impl HistoryPersistence for ReadOnlyPersistence {
        fn load(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn save(&self, _value: &str) -> Result<()> {
            Err(ImageGenError::Storage("quota exceeded".into()))
        }

        fn clear(&self) -> Result<()> {
            Err(ImageGenError::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn test_insert_is_newest_first_and_persisted() {
        let backend = MemoryPersistence::new();
        let mut store = HistoryStore::new(backend.clone());

        store.insert(image(1));
        store.insert(image(2));

        let ids: Vec<&str> = store.images().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img_2", "img_1"]);

        let reopened = HistoryStore::new(backend);
        assert_eq!(reopened.images(), store.images());
    }

    #[test]
    fn test_fifty_first_insert_evicts_oldest() {
        let backend = MemoryPersistence::new();
        let mut store = HistoryStore::new(backend.clone());

        for n in 1..=51 {
            store.insert(image(n));
        }

        assert_eq!(store.len(), 50);
        assert_eq!(store.images()[0].id, "img_51");
        assert_eq!(store.images()[49].id, "img_2");
        assert!(store.get("img_1").is_none());

        let persisted: Vec<GeneratedImage> =
            serde_json::from_str(&backend.raw().unwrap()).unwrap();
        assert_eq!(persisted.len(), 50);
    }

    #[test]
    fn test_oversized_slot_is_truncated_on_load() {
        let stored: Vec<GeneratedImage> = (1..=60).map(image).collect();
        let backend = MemoryPersistence::with_value(serde_json::to_string(&stored).unwrap());

        let mut store = HistoryStore::new(backend);
        assert_eq!(store.capacity(), 50);
        assert_eq!(store.len(), 50);
        assert_eq!(store.images()[0].id, "img_1");
        assert_eq!(store.images()[49].id, "img_50");

        store.insert(image(61));
        assert_eq!(store.len(), 50);
        assert_eq!(store.images()[0].id, "img_61");
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = HistoryStore::new(MemoryPersistence::new());
        store.insert(image(1));
        store.insert(image(2));

        store.remove("img_404");
        assert_eq!(store.len(), 2);

        store.remove("img_1");
        assert_eq!(store.len(), 1);
        assert_eq!(store.images()[0].id, "img_2");
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let backend = MemoryPersistence::new();
        let mut store = HistoryStore::new(backend.clone());
        store.insert(image(1));

        store.clear();
        assert!(store.load().is_empty());
        assert_eq!(backend.raw(), None);
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let store = HistoryStore::new(MemoryPersistence::with_value("{not an array"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_out_of_order_timestamps_are_kept() {
        let mut store = HistoryStore::new(MemoryPersistence::new());
        let mut newer = image(1);
        newer.timestamp = 2_000;
        let mut older = image(2);
        older.timestamp = 1_000;

        store.insert(newer);
        store.insert(older);
        assert_eq!(store.images()[0].timestamp, 1_000);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = HistoryStore::new(ReadOnlyPersistence);
        store.insert(image(1));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistoryConfig::new().with_path(dir.path().join("history.json"));

        let mut store = HistoryStore::from_config(&config);
        store.insert(image(1));

        let reopened = HistoryStore::from_config(&config);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.images()[0].url, "https://x.com/1.png");
    }
}
