use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Malformed label: {0}")]
    MalformedLabel(String),

    #[error("Truncated data: need {needed} bytes, only {available} available")]
    TruncatedData { needed: usize, available: usize },

    #[error("Expected {expected} band(s), found {found}")]
    BandCount { expected: usize, found: usize },

    #[error("Grid of {lines}x{samples} exceeds the u32 vertex index range")]
    GridTooLarge { lines: usize, samples: usize },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type AssetResult<T> = Result<T, AssetError>;
