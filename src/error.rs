use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = MarsTimeError> = std::result::Result<T, E>;

/// Failures of the conversion core. Stale or pre-1972 lookups are not errors,
/// see [`crate::leap_table::OffsetStatus`].
#[derive(Debug, Error)]
pub enum MarsTimeError {
    #[error("cannot read leap second file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed leap second data on line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("leap second data has no {0} line")]
    MissingMetadata(&'static str),

    #[error("leap second table has no entries")]
    EmptyTable,

    #[error("unknown time zone '{0}'")]
    UnknownZone(String),

    #[error("out of memory: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("failed to render Mars time")]
    Render(#[from] std::fmt::Error),
}

impl MarsTimeError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        MarsTimeError::Format {
            line,
            reason: reason.into(),
        }
    }
}
