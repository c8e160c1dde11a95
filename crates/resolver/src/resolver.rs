//! Tiered product lookup: every candidate is probed in the local cache
//! first; only on a complete cache miss are the same candidates fetched
//! remotely, and the first successful download is written to the cache.

use std::{fs, path::PathBuf};

use corelib::{AssetIdentifier, Sol};

use crate::cache::{self, ResolverConfig};
use crate::error::ResolveError;
use crate::fetch::Fetcher;
use crate::naming::{self, AssetKind, Candidate};

/// Resolution state of an [`AssetReference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    /// Found in the local cache.
    Cached,
    /// Downloaded and written to the local cache.
    Downloaded,
}

/// A product candidate with its local and remote locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetReference {
    pub kind: AssetKind,
    pub variant: &'static str,
    pub local_path: PathBuf,
    pub remote_url: String,
    pub resolution: Resolution,
}

impl AssetReference {
    fn resolved(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

pub struct AssetResolver<'a, F: Fetcher + ?Sized> {
    config: &'a ResolverConfig,
    fetcher: &'a F,
}

impl<'a, F: Fetcher + ?Sized> AssetResolver<'a, F> {
    pub fn new(config: &'a ResolverConfig, fetcher: &'a F) -> Self {
        Self { config, fetcher }
    }

    /// Unresolved references for every candidate of `kind`, in tier order.
    pub fn references(&self, kind: AssetKind, id: &AssetIdentifier, sol: Sol) -> Vec<AssetReference> {
        let trees = id.product_trees(sol);
        let tree = match kind {
            AssetKind::Texture => trees.browse,
            AssetKind::Texture16 | AssetKind::Depth => trees.science,
        };

        naming::candidates(kind, id, sol)
            .into_iter()
            .map(|Candidate { variant, filename }| AssetReference {
                kind,
                variant,
                local_path: cache::cache_path(&self.config.cache_root, &tree, id.rover, sol, &filename),
                remote_url: cache::remote_url(&self.config.remote_base, &tree, id.rover, sol, &filename),
                resolution: Resolution::Unresolved,
            })
            .collect()
    }

    /// Finds the best available product of `kind` for `id`.
    pub fn resolve(&self, kind: AssetKind, id: &AssetIdentifier, sol: Sol) -> Result<AssetReference, ResolveError> {
        let references = self.references(kind, id, sol);

        for reference in &references {
            log::debug!("Looking for {} in cache: {}", kind, reference.local_path.display());
            if reference.local_path.is_file() {
                log::info!(
                    "Using cached {} ({}): {}",
                    kind,
                    reference.variant,
                    reference.local_path.display()
                );
                return Ok(reference.clone().resolved(Resolution::Cached));
            }
        }

        log::info!("No cached {} for {}, trying remote archive", kind, id);
        for reference in &references {
            if let Some(dir) = reference.local_path.parent() {
                fs::create_dir_all(dir).map_err(|e| ResolveError::cache_io(dir, e))?;
            }

            match self.fetcher.fetch(&reference.remote_url) {
                Ok(bytes) => {
                    fs::write(&reference.local_path, &bytes)
                        .map_err(|e| ResolveError::cache_io(&reference.local_path, e))?;
                    log::info!(
                        "Downloaded {} ({}, {} bytes) to {}",
                        kind,
                        reference.variant,
                        bytes.len(),
                        reference.local_path.display()
                    );
                    return Ok(reference.clone().resolved(Resolution::Downloaded));
                }
                Err(e) => log::debug!("{} variant {} unavailable: {}", kind, reference.variant, e),
            }
        }

        Err(ResolveError::AssetNotFound {
            kind,
            id: id.to_string(),
            tried: references.len(),
        })
    }
}
