//! Source dependency fetching.

pub mod fetcher;
pub mod git;

pub use fetcher::{FetchPath, FetchReport, SourceFetcher};
pub use git::GitClient;
