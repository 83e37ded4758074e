use crate::error::LogError;
use crate::plane::{Plane, PlaneRecord};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Enqueue,
    Dequeue,
    #[serde(rename = "Cancel Landing")]
    CancelLanding,
    Rebuild,
    Save,
    Load,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Enqueue => "Enqueue",
            Action::Dequeue => "Dequeue",
            Action::CancelLanding => "Cancel Landing",
            Action::Rebuild => "Rebuild",
            Action::Save => "Save",
            Action::Load => "Load",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub seq: u64,
    pub action: Action,
    pub plane: Option<PlaneRecord>,
}

/// Append-only action log, one JSON object per line. Sequence numbers keep counting
/// from the last event already in the file.
pub struct EventLog {
    path: PathBuf,
    seq: u64,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> EventLog {
        let path = path.into();
        let seq = Self::read_all(&path)
            .map(|events| events.iter().map(|e| e.seq).max().unwrap_or(0))
            .unwrap_or(0);
        debug!(path = %path.display(), seq, "action log opened");
        EventLog { path, seq }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, action: Action, plane: Option<&Plane>) -> Result<(), LogError> {
        self.seq += 1;
        let event = LogEvent {
            seq: self.seq,
            action,
            plane: plane.map(Plane::to_record),
        };
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');

        let unavailable = |source| LogError::Unavailable {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(unavailable)?;
        file.write_all(line.as_bytes()).map_err(unavailable)?;
        debug!(seq = event.seq, %action, "action logged");
        Ok(())
    }

    /// Reads back every event, skipping lines that are not valid events.
    pub fn read_all(path: &Path) -> Result<Vec<LogEvent>, LogError> {
        let data = std::fs::read_to_string(path).map_err(|source| LogError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(data
            .lines()
            .filter_map(|l| serde_json::from_str::<LogEvent>(l).ok())
            .collect())
    }
}
