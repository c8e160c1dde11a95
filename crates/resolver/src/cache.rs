//! Cache layout and resolver configuration.
//!
//! Products are stored as:
//!
//! ```text
//! <cache_root>/<product_tree>/sol<NNNN>/rdr/<filename>     MER
//! <cache_root>/<product_tree>/sol<NNNNN>/rdr/<filename>    MSL
//! ```
//!
//! The remote archive mirrors the tree but differs per family: MER folders
//! are `sol<NNNN>/rdr/` with lowercased filenames, MSL folders are
//! `SOL<NNNNN>/` with filenames kept as-is.

use std::path::{Path, PathBuf};

use corelib::{Rover, Sol};

pub const DEFAULT_REMOTE_BASE: &str = "https://pds-imaging.jpl.nasa.gov/data/";
const CACHE_DIR_NAME: &str = "MarsRoverImages";

/// Where products are cached and fetched from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub cache_root: PathBuf,
    pub remote_base: String,
}

impl ResolverConfig {
    pub fn new(cache_root: impl Into<PathBuf>, remote_base: impl Into<String>) -> Self {
        Self {
            cache_root: cache_root.into(),
            remote_base: remote_base.into(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join(CACHE_DIR_NAME), DEFAULT_REMOTE_BASE)
    }
}

#[inline]
fn sol_width(rover: Rover) -> usize {
    if rover.is_mer() { 4 } else { 5 }
}

/// Directory holding cached products of one tree and sol.
pub fn sol_directory(cache_root: &Path, tree: &str, rover: Rover, sol: Sol) -> PathBuf {
    let mut dir = cache_root.to_path_buf();
    dir.extend(tree.split('/').filter(|part| !part.is_empty()));
    dir.push(sol.folder("sol", sol_width(rover)));
    dir.push("rdr");
    dir
}

/// Canonical cache location of a product file.
pub fn cache_path(cache_root: &Path, tree: &str, rover: Rover, sol: Sol, filename: &str) -> PathBuf {
    sol_directory(cache_root, tree, rover, sol).join(filename)
}

/// Remote archive URL of a product file.
pub fn remote_url(remote_base: &str, tree: &str, rover: Rover, sol: Sol, filename: &str) -> String {
    let base = remote_base.trim_end_matches('/');
    let tree = tree.trim_matches('/');
    if rover.is_mer() {
        format!(
            "{}/{}/{}/rdr/{}",
            base,
            tree,
            sol.folder("sol", 4),
            filename.to_ascii_lowercase()
        )
    } else {
        format!("{}/{}/{}/{}", base, tree, sol.folder("SOL", 5), filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mer_cache_path() {
        let path = cache_path(
            Path::new("/cache"),
            "mer/spirit/mer2no_0xxx/data/",
            Rover::Spirit,
            Sol::new(42),
            "2N295212876xylB1DNP1950L0m1.IMG",
        );
        assert_eq!(
            path,
            PathBuf::from("/cache/mer/spirit/mer2no_0xxx/data/sol0042/rdr/2N295212876xylB1DNP1950L0m1.IMG")
        );
    }

    #[test]
    fn msl_cache_path_uses_five_digits() {
        let dir = sol_directory(
            Path::new("/cache"),
            "msl/MSLNAV_1XXX/DATA_V1/",
            Rover::Curiosity,
            Sol::new(703),
        );
        assert_eq!(dir, PathBuf::from("/cache/msl/MSLNAV_1XXX/DATA_V1/sol00703/rdr"));
    }

    #[test]
    fn mer_remote_url_is_lowercased() {
        let url = remote_url(
            DEFAULT_REMOTE_BASE,
            "mer/spirit/mer2no_0xxx/browse/",
            Rover::Spirit,
            Sol::new(1902),
            "2N295212876effB1DNP1950L0m1.img.JPG",
        );
        assert_eq!(
            url,
            "https://pds-imaging.jpl.nasa.gov/data/mer/spirit/mer2no_0xxx/browse/sol1902/rdr/2n295212876effb1dnp1950l0m1.img.jpg"
        );
    }

    #[test]
    fn msl_remote_url_keeps_case() {
        let url = remote_url(
            "https://example.org/data",
            "msl/MSLNAV_1XXX/DATA_V1/",
            Rover::Curiosity,
            Sol::new(703),
            "NLB_459941093XYZ_F0260000NCAM00285M1.IMG",
        );
        assert_eq!(
            url,
            "https://example.org/data/msl/MSLNAV_1XXX/DATA_V1/SOL00703/NLB_459941093XYZ_F0260000NCAM00285M1.IMG"
        );
    }

    #[test]
    fn default_config_points_at_temp_dir() {
        let config = ResolverConfig::default();
        assert!(config.cache_root.ends_with(CACHE_DIR_NAME));
        assert_eq!(config.remote_base, DEFAULT_REMOTE_BASE);
    }
}
