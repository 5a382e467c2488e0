use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Something that can place a raw vendor list in a local file
#[async_trait]
pub trait VendorListSource: Send + Sync {
    /// Write the complete list to `dest`, returning the number of bytes written
    async fn fetch_to(&self, dest: &Path) -> Result<u64>;

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}

/// Downloads the vendor list over HTTP(S)
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Stream the body into `part`; `dest` is only touched by the final rename
    async fn download(&self, part: &Path, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(part)
            .await
            .map_err(|e| Error::io(part, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{}: {}", self.url, e)))?
        {
            file.write_all(&chunk).await.map_err(|e| Error::io(part, e))?;
            written += chunk.len() as u64;
            debug!("Bytes read: {}", written);
        }
        file.flush().await.map_err(|e| Error::io(part, e))?;
        drop(file);

        tokio::fs::rename(part, dest)
            .await
            .map_err(|e| Error::io(dest, e))?;

        Ok(written)
    }
}

/// Sibling of `dest` that receives the download until it completes
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[async_trait]
impl VendorListSource for HttpSource {
    async fn fetch_to(&self, dest: &Path) -> Result<u64> {
        info!("Downloading vendor list from {}", self.url);

        let part = partial_path(dest);
        let outcome = tokio::select! {
            res = self.download(&part, dest) => res,
            _ = tokio::signal::ctrl_c() => {
                Err(Error::SourceUnavailable("download interrupted by user".to_string()))
            }
        };

        match &outcome {
            Ok(written) => info!("Saved {} bytes to {}", written, dest.display()),
            Err(e) => {
                warn!("Download failed: {}", e);
                // Any previous copy at dest is left as it was
                if tokio::fs::remove_file(&part).await.is_ok() {
                    debug!("Removed partial file {}", part.display());
                }
            }
        }
        outcome
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
