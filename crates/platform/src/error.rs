use asset::AssetError;
use corelib::CoreError;
use resolver::ResolveError;
use thiserror::Error;

/// Why a single id could not be turned into a mesh.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Identifier(#[from] CoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Product unusable: {0}")]
    Decode(#[from] AssetError),

    #[error("Scene assembly failed: {0:#}")]
    Scene(anyhow::Error),
}
