//! Error types for loading vocabulary and driving a drill session.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`DrillEngine`](crate::session::DrillEngine) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillError {
    /// The requested unit does not exist or has an empty word list.
    #[error("this unit has no words (unit #{unit_id})")]
    NoWords { unit_id: i64 },

    /// The operation is not valid in the engine's current state.
    #[error("cannot {action} while {state}")]
    InvalidAction {
        action: &'static str,
        state: &'static str,
    },
}

/// Failure to obtain a raw vocabulary document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read vocabulary from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vocabulary file {} is not valid JSON", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
