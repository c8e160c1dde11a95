//! Errors raised while decoding asset identifiers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Image id '{id}' has length {len}; expected 27 (MER) or 36 (MSL)")]
    NameLength { id: String, len: usize },

    #[error("Image id '{id}' does not start with a known rover/camera prefix (1N/1P/1F/1R, 2N/2P/2F/2R or N)")]
    UnknownRover { id: String },

    #[error("Spacecraft clock field '{field}' of image id '{id}' is not numeric")]
    ClockParse { id: String, field: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
