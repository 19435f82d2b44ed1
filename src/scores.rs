use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;

const DEFAULT_FILE_NAME: &str = "swipecade.scores";

/// Plain key/value persistence used for best scores.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store handle shared by every host in the feed.
pub type SharedStore = Rc<RefCell<dyn ScoreStore>>;

pub fn shared<S: ScoreStore + 'static>(store: S) -> SharedStore {
    Rc::new(RefCell::new(store))
}

/// Storage key for a game's best score.
pub fn best_key(game_id: &str) -> String {
    format!("best_{game_id}")
}

/// Volatile store, used for tests and when the score file cannot be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Text file of `key=value` lines. Read once on open, rewritten on every set.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => parse_entries(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened score file");
        Ok(Self { path, entries })
    }

    /// Default location: next to the executable.
    pub fn default_path() -> PathBuf {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(DEFAULT_FILE_NAME);
            }
        }
        PathBuf::from(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self) -> Result<(), StoreError> {
        let mut buf = String::new();
        for (key, value) in &self.entries {
            buf.push_str(key);
            buf.push('=');
            buf.push_str(value);
            buf.push('\n');
        }
        fs::write(&self.path, buf).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn parse_entries(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write_file()
    }
}

/// Typed best-score view over a [`ScoreStore`].
#[derive(Clone)]
pub struct BestScores {
    store: SharedStore,
}

impl BestScores {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Stored best for a game. Text that is not a non-negative integer
    /// counts as no record.
    pub fn best(&self, game_id: &str) -> Option<u32> {
        let raw = self.store.borrow().get(&best_key(game_id))?;
        match raw.trim().parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(game = game_id, value = %raw, "ignoring unparseable best score");
                None
            }
        }
    }

    pub fn save(&self, game_id: &str, score: u32) -> Result<(), StoreError> {
        self.store
            .borrow_mut()
            .set(&best_key(game_id), &score.to_string())
    }
}
