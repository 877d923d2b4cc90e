//! Zip extraction.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::Result;

/// Extract every member of `archive` into `dest`.
pub fn extract_all(archive: &Path, dest: &Path) -> Result<usize> {
    extract_filtered(archive, dest, |_| true)
}

/// Extract the members whose archive path satisfies `filter` into `dest`.
///
/// Member paths that would escape `dest` are skipped. Returns the number of
/// files written.
pub fn extract_filtered(
    archive: &Path,
    dest: &Path,
    filter: impl Fn(&str) -> bool,
) -> Result<usize> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid zip archive", archive.display()))?;

    fs::create_dir_all(dest)?;
    let mut written = 0;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("Failed to read entry {} of {}", i, archive.display()))?;

        if !filter(entry.name()) {
            continue;
        }

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive path {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    tracing::debug!("Extracted {} files from {}", written, archive.display());
    Ok(written)
}
