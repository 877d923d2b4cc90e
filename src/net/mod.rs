//! Downloads and archive extraction for SDK installs.

pub mod archive;
pub mod download;

pub use archive::{extract_all, extract_filtered};
pub use download::{
    download_with_progress, sha256_file, verify_sha256, Downloader, HttpDownloader,
    MockDownloader, ProgressFn,
};
