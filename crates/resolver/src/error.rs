use std::{io, path::PathBuf};

use thiserror::Error;

use crate::naming::AssetKind;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No {kind} product found for '{id}' after trying {tried} candidate(s) locally and remotely")]
    AssetNotFound {
        kind: AssetKind,
        id: String,
        tried: usize,
    },

    #[error("Cache I/O failed at {}: {source}", path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub(crate) fn cache_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CacheIo {
            path: path.into(),
            source,
        }
    }
}
