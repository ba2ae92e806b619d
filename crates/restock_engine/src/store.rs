use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use restock_core::{StateMap, StockStatus, TargetState};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

const STATE_FILENAME: &str = ".restock_state.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed state snapshot: {0}")]
    Malformed(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Whole-snapshot load/store of the per-target state map. No partial
/// updates: a run reads one snapshot and writes one snapshot.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<StateMap, PersistError>;
    fn save(&self, map: &StateMap) -> Result<(), PersistError>;
}

/// Ensure the state directory exists; create if missing.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file
/// then renaming, so a crashed run never leaves a partial snapshot.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

// The core types stay serde-free; persistence goes through these mirrors.

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum PersistedStatus {
    Out,
    In,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedTarget {
    status: PersistedStatus,
    in_since_ts: i64,
    in_streak: u32,
    err_streak: u32,
    last_err_notify_ts: i64,
    last_in_notify_attempt_ts: i64,
    last_in_notify_ok_ts: i64,
    last_used_url: String,
    last_reason: String,
    ts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSnapshot {
    targets: BTreeMap<String, PersistedTarget>,
}

fn to_persisted(state: &TargetState) -> PersistedTarget {
    PersistedTarget {
        status: match state.status {
            StockStatus::Out => PersistedStatus::Out,
            StockStatus::In => PersistedStatus::In,
        },
        in_since_ts: state.in_since_ts,
        in_streak: state.in_streak,
        err_streak: state.err_streak,
        last_err_notify_ts: state.last_err_notify_ts,
        last_in_notify_attempt_ts: state.last_in_notify_attempt_ts,
        last_in_notify_ok_ts: state.last_in_notify_ok_ts,
        last_used_url: state.last_used_url.clone(),
        last_reason: state.last_reason.clone(),
        ts: state.ts,
    }
}

fn from_persisted(record: PersistedTarget) -> TargetState {
    TargetState {
        status: match record.status {
            PersistedStatus::Out => StockStatus::Out,
            PersistedStatus::In => StockStatus::In,
        },
        in_since_ts: record.in_since_ts,
        in_streak: record.in_streak,
        err_streak: record.err_streak,
        last_err_notify_ts: record.last_err_notify_ts,
        last_in_notify_attempt_ts: record.last_in_notify_attempt_ts,
        last_in_notify_ok_ts: record.last_in_notify_ok_ts,
        last_used_url: record.last_used_url,
        last_reason: record.last_reason,
        ts: record.ts,
    }
}

/// File-backed store: one pretty-printed ron document per deployment,
/// written through [`AtomicFileWriter`].
///
/// A missing file loads as an empty map. A file that exists but does not
/// parse is a fatal load error rather than an empty map, so a corrupted
/// snapshot is never silently discarded and overwritten.
pub struct RonFileStore {
    dir: PathBuf,
}

impl RonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }
}

impl StateStore for RonFileStore {
    fn load(&self) -> Result<StateMap, PersistError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StateMap::new());
            }
            Err(err) => return Err(PersistError::Io(err)),
        };

        let snapshot: PersistedSnapshot =
            ron::from_str(&content).map_err(|err| PersistError::Malformed(err.to_string()))?;

        Ok(snapshot
            .targets
            .into_iter()
            .map(|(name, record)| (name, from_persisted(record)))
            .collect())
    }

    fn save(&self, map: &StateMap) -> Result<(), PersistError> {
        let snapshot = PersistedSnapshot {
            targets: map
                .iter()
                .map(|(name, state)| (name.clone(), to_persisted(state)))
                .collect(),
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&snapshot, pretty)
            .map_err(|err| PersistError::Serialize(err.to_string()))?;

        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(STATE_FILENAME, &content)?;
        Ok(())
    }
}
