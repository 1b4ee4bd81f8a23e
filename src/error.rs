use chrono::{DateTime, Utc};
use thiserror::Error;

/// Everything that can go wrong while loading, editing or reporting trackers.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("tracker \"{0}\" does not exist")]
    NotFound(String),

    #[error("tracker \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("tracker \"{0}\" already running")]
    AlreadyRunning(String),

    #[error("tracker \"{0}\" not running")]
    NotRunning(String),

    #[error("invalid interval: {end} precedes {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("invalid label \"{0}\": labels must be non-empty and contain no whitespace")]
    InvalidLabel(String),

    #[error("must provide a label to {0} a tracker")]
    MissingLabel(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;
