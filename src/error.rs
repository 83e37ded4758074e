//! Error types for the landing pool and its collaborators.

use crate::plane::PlaneId;
use std::path::PathBuf;
use thiserror::Error;

/// Checked outcomes of pool and session operations. None is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("runway is free, no planes are waiting to land")]
    Empty,
    #[error("plane {0} is not in the queue")]
    NotFound(PlaneId),
    #[error("no plane ids or arrival times are left in this run")]
    Exhausted,
}

/// Failures of the queue file. The pool is never touched when one of these is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("queue file {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("queue file is malformed at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("queue file holds an invalid plane: {0}")]
    InvalidPlane(#[from] InputError),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("action log {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("action log entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Rejected operator input. Handled at the console by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("fuel level {0} is outside 0..=100")]
    FuelOutOfRange(i64),
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("expected yes or no, got '{0}'")]
    NotAYesNo(String),
}
