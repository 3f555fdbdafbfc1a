//! High score persistence
//!
//! A single scalar: read once when a session starts, written whenever the
//! running score beats it. Stores only ever move the value upward.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Where the best score lives between runs
pub trait HighScoreStore {
    /// Stored best score (0 if none)
    fn read(&self) -> u64;
    /// Record a new best. Lower values are ignored.
    fn write(&mut self, score: u64);
}

/// In-memory store. Clones share the same value, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
}

impl MemoryStore {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn read(&self) -> u64 {
        self.value.get()
    }

    fn write(&mut self, score: u64) {
        if score > self.value.get() {
            self.value.set(score);
        }
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file store (native)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cached: u64,
}

impl JsonFileStore {
    /// Open a store, loading whatever is on disk
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match Self::load(&path) {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, path.display());
                score
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score {}: {}", path.display(), e);
                0
            }
        };
        Self { path, cached }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> std::io::Result<u64> {
        let json = std::fs::read_to_string(path)?;
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let record = HighScoreRecord {
            high_score: self.cached,
        };
        // Write-then-rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string(&record)?)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl HighScoreStore for JsonFileStore {
    fn read(&self) -> u64 {
        self.cached
    }

    fn write(&mut self, score: u64) {
        if score <= self.cached {
            return;
        }
        self.cached = score;
        match self.save() {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bubble_pop_high_score";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn read(&self) -> u64 {
        Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    fn write(&mut self, score: u64) {
        if score <= self.read() {
            return;
        }
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(Self::STORAGE_KEY, &score.to_string());
            log::info!("High score {} saved", score);
        }
    }
}
