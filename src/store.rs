use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

pub const BEST_SCORE_KEY: &str = "best-snake-score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed store file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Durable string key-value storage.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keys kept in a YAML mapping on disk. Every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml_ng::from_str(&content).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_all().unwrap_or_else(|e| {
            warn!("discarding unreadable store: {e}");
            BTreeMap::new()
        });
        entries.insert(key.to_owned(), value.to_owned());

        let content = serde_yaml_ng::to_string(&entries).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Process-local store, used when nothing should touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.to_owned());
        Self { entries, writes: 0 }
    }

    /// How many times `set` was called.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The best score ever reached, backed by a store.
///
/// The stored value only ever grows, and the store is written only when a new
/// maximum is reached.
#[derive(Debug)]
pub struct BestScore<S> {
    store: S,
    value: u32,
}

impl<S: ScoreStore> BestScore<S> {
    /// Reads the persisted best. Missing or unreadable values count as 0.
    pub fn load(store: S) -> Self {
        let value = match store.get(BEST_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(raw = %raw, "ignoring malformed best score");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("could not read best score: {e}");
                0
            }
        };
        debug!(value, "best score loaded");

        Self { store, value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Offers a score. Returns true when it is a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }

        self.value = score;
        info!(score, "new best score");
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
            warn!("could not persist best score: {e}");
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn scores_path(dir: &TempDir) -> PathBuf {
        dir.path().join("scores.yaml")
    }

    #[test]
    fn test_missing_best_is_zero() {
        let best = BestScore::load(MemoryStore::new());
        assert_eq!(best.value(), 0);
    }

    #[test]
    fn test_malformed_best_is_zero() {
        let best = BestScore::load(MemoryStore::with_entry(BEST_SCORE_KEY, "twelve"));
        assert_eq!(best.value(), 0);
    }

    #[test]
    fn test_loads_stored_best() {
        let best = BestScore::load(MemoryStore::with_entry(BEST_SCORE_KEY, "12"));
        assert_eq!(best.value(), 12);
    }

    #[test]
    fn test_lower_or_equal_score_does_not_write() {
        let mut best = BestScore::load(MemoryStore::with_entry(BEST_SCORE_KEY, "5"));

        assert!(!best.record(3));
        assert!(!best.record(5));
        assert_eq!(best.store().writes(), 0);
        assert_eq!(best.value(), 5);
    }

    #[test]
    fn test_higher_score_writes_once() {
        let mut best = BestScore::load(MemoryStore::with_entry(BEST_SCORE_KEY, "5"));

        assert!(best.record(6));
        assert_eq!(best.value(), 6);
        assert_eq!(best.store().writes(), 1);
        assert_eq!(
            best.store().get(BEST_SCORE_KEY).unwrap(),
            Some("6".to_owned())
        );
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = scores_path(&dir);
        let mut store = FileStore::new(&path);

        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
        store.set(BEST_SCORE_KEY, "9").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(BEST_SCORE_KEY).unwrap(), Some("9".to_owned()));
        assert_eq!(reopened.get("other").unwrap(), Some("x".to_owned()));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = scores_path(&dir);
        fs::write(&path, "- [unbalanced").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get(BEST_SCORE_KEY), Err(StoreError::Format { .. })));
        assert_eq!(BestScore::load(store).value(), 0);
    }

    #[test]
    fn test_file_store_overwrites_corrupt_file_on_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = scores_path(&dir);
        fs::write(&path, "- [unbalanced").unwrap();

        let mut best = BestScore::load(FileStore::new(&path));
        assert!(best.record(4));
        assert_eq!(BestScore::load(FileStore::new(&path)).value(), 4);
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.yaml");

        let mut store = FileStore::new(&path);
        store.set(BEST_SCORE_KEY, "3").unwrap();
        assert!(path.exists());

        dir.close().unwrap();
        assert!(!path.exists());
    }
}
