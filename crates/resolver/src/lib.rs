//! Locating rover data products: candidate naming, on-disk cache layout and
//! remote fallback through a pluggable fetch capability.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod resolver;

pub use cache::ResolverConfig;
pub use error::ResolveError;
pub use fetch::{FetchError, Fetcher, ReqwestFetcher};
pub use naming::{AssetKind, Candidate};
pub use resolver::{AssetReference, AssetResolver, Resolution};
