//! HTTP downloads with progress reporting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::error::{Result, SetupError};
use crate::ui::UserInterface;

/// Progress callback: bytes received so far and the total if known.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64, Option<u64>);

/// Fetches a URL into a local file.
pub trait Downloader {
    /// Download `url` to `dest`, creating parent directories. Returns the
    /// number of bytes written. A partial file is removed on failure.
    fn download(&self, url: &str, dest: &Path, progress: ProgressFn<'_>) -> Result<u64>;
}

/// Downloader backed by a blocking reqwest client.
pub struct HttpDownloader {
    client: Client,
    timeout: Duration,
}

impl HttpDownloader {
    /// Create a downloader with a 30 minute timeout (SDK installers are large).
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30 * 60))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lunex-setup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| SetupError::Other(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch_into(&self, url: &str, file: &mut File, progress: ProgressFn<'_>) -> Result<u64> {
        let download_err = |message: String| SetupError::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_err(format!("HTTP {}", response.status())));
        }

        let total = response.content_length();
        let mut buf = vec![0u8; 64 * 1024];
        let mut received = 0u64;

        loop {
            let n = response
                .read(&mut buf)
                .map_err(|e| download_err(e.to_string()))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            received += n as u64;
            progress(received, total);
        }
        file.flush()?;

        Ok(received)
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path, progress: ProgressFn<'_>) -> Result<u64> {
        tracing::info!("Downloading {} -> {}", url, dest.display());

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(dest)?;
        let result = self.fetch_into(url, &mut file, progress);
        drop(file);

        if result.is_err() {
            fs::remove_file(dest).ok();
        }
        result
    }
}

/// Download with a progress bar and optional SHA-256 check.
pub fn download_with_progress(
    ui: &mut dyn UserInterface,
    downloader: &dyn Downloader,
    url: &str,
    dest: &Path,
    expected_sha256: Option<&str>,
) -> Result<u64> {
    let label = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());

    let mut bar = ui.start_transfer(&label);
    let result = downloader
        .download(url, dest, &mut |received, total| bar.update(received, total))
        .and_then(|bytes| {
            if let Some(expected) = expected_sha256 {
                if let Err(e) = verify_sha256(dest, expected) {
                    fs::remove_file(dest).ok();
                    return Err(e);
                }
            }
            Ok(bytes)
        });

    match &result {
        Ok(_) => bar.finish("Downloaded"),
        Err(e) => bar.fail(&e.to_string()),
    }
    result
}

/// Hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file's SHA-256 against an expected hex digest.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(SetupError::Download {
            url: path.display().to_string(),
            message: format!("checksum mismatch: expected {}, got {}", expected, actual),
        })
    }
}

/// In-memory downloader for tests.
#[derive(Default)]
pub struct MockDownloader {
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`. Any other URL answers HTTP 404.
    pub fn with_file(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.to_string(), body.into());
        self
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Downloader for MockDownloader {
    fn download(&self, url: &str, dest: &Path, progress: ProgressFn<'_>) -> Result<u64> {
        self.requests.borrow_mut().push(url.to_string());

        let body = self.files.get(url).ok_or_else(|| SetupError::Download {
            url: url.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, body)?;

        let len = body.len() as u64;
        progress(len, Some(len));
        Ok(len)
    }
}
