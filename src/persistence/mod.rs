//! Level-completion progress on disk
//!
//! Features:
//! - JSON record `{ "cleared": [0, 2, ...] }`
//! - Atomic replace (write tmp, then rename over the record)
//! - Missing/corrupt records read back as "no progress"

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Index of a level definition, in `[0, num_levels)`
pub type LevelIndex = usize;

/// Set of completed levels. Only ever grows during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedSet {
    levels: BTreeSet<LevelIndex>,
}

impl ClearedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a level cleared. Returns true if it was not cleared before.
    pub fn insert(&mut self, level: LevelIndex) -> bool {
        self.levels.insert(level)
    }

    pub fn contains(&self, level: LevelIndex) -> bool {
        self.levels.contains(&level)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// True once every level in `[0, num_levels)` is cleared
    pub fn covers(&self, num_levels: usize) -> bool {
        self.levels.len() >= num_levels
    }

    /// Ascending iteration
    pub fn iter(&self) -> impl Iterator<Item = LevelIndex> + '_ {
        self.levels.iter().copied()
    }

    /// Drop indices outside `[0, num_levels)`, returning how many were removed
    pub fn restrict_to(&mut self, num_levels: usize) -> usize {
        let before = self.levels.len();
        self.levels.retain(|&level| level < num_levels);
        before - self.levels.len()
    }
}

impl FromIterator<LevelIndex> for ClearedSet {
    fn from_iter<I: IntoIterator<Item = LevelIndex>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// On-disk shape of the progress record
#[derive(Debug, Serialize, Deserialize)]
struct ProgressRecord {
    cleared: Vec<LevelIndex>,
}

/// Owner of the progress record file. Nothing else touches the file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cleared set. Never fails: anything unreadable is "no progress".
    pub fn load(&self) -> ClearedSet {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Could not read {}: {}", self.path.display(), e);
                }
                log::info!("No progress found, starting fresh");
                return ClearedSet::new();
            }
        };

        match serde_json::from_str::<ProgressRecord>(&json) {
            Ok(record) => {
                let cleared: ClearedSet = record.cleared.into_iter().collect();
                log::info!("Loaded progress ({} levels cleared)", cleared.len());
                cleared
            }
            Err(e) => {
                log::warn!("Ignoring corrupt progress record {}: {}", self.path.display(), e);
                ClearedSet::new()
            }
        }
    }

    /// Replace the record with `cleared`.
    ///
    /// The new record is written next to the old one and renamed over it, so a
    /// crash mid-write leaves the previous record intact.
    pub fn persist(&self, cleared: &ClearedSet) -> GameResult<()> {
        let record = ProgressRecord {
            cleared: cleared.iter().collect(),
        };
        let json = serde_json::to_string(&record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GameError::io(parent, e))?;
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| GameError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| GameError::io(&self.path, e))?;

        log::info!("Progress saved ({} levels cleared)", cleared.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "save.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
