//! Where bootstrap documents come from.

use super::document::BootstrapDocument;
use crate::error::{RdapError, Result};
use crate::types::{normalize_base_url, RegistryKind};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

/// A provider of bootstrap registry documents
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch the current document for `kind`
    async fn fetch(&self, kind: RegistryKind) -> Result<BootstrapDocument>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Fetches bootstrap files over HTTP (IANA by default)
pub struct HttpSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(client: Client, base_url: impl AsRef<str>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url.as_ref()),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RegistrySource for HttpSource {
    async fn fetch(&self, kind: RegistryKind) -> Result<BootstrapDocument> {
        let url = kind.index_url(&self.base_url);
        let timeout_secs = self.timeout.as_secs();

        tracing::debug!(kind = %kind, url = %url, "Fetching bootstrap registry");

        let response = timeout(self.timeout, self.client.get(&url).send())
            .await
            .map_err(|_| RdapError::timeout(format!("fetch {} registry", kind), timeout_secs))?
            .map_err(|e| {
                RdapError::upstream(
                    format!("unable to retrieve registry {}: {}", kind, e),
                    None,
                    Some(url.clone()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(kind = %kind, url = %url, status = %status, "Bootstrap registry fetch failed");
            return Err(RdapError::upstream(
                format!("server returned non-200 status code: {}", status),
                Some(status.as_u16()),
                Some(url),
            ));
        }

        let text = timeout(self.timeout, response.text())
            .await
            .map_err(|_| RdapError::timeout(format!("read {} registry", kind), timeout_secs))?
            .map_err(|e| {
                RdapError::upstream(
                    format!("unable to read response for registry {}: {}", kind, e),
                    None,
                    Some(url.clone()),
                )
            })?;

        BootstrapDocument::from_json(&text)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads bootstrap files (`dns.json`, `asn.json`, ...) from a directory
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: RegistryKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a document where this source will find it
    pub async fn store(&self, kind: RegistryKind, doc: &BootstrapDocument) -> Result<()> {
        let path = self.path_for(kind);
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            RdapError::io(e.to_string(), Some(self.dir.to_string_lossy().to_string()))
        })?;
        tokio::fs::write(&path, doc.to_json()?).await.map_err(|e| {
            RdapError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })
    }
}

#[async_trait]
impl RegistrySource for FileSource {
    async fn fetch(&self, kind: RegistryKind) -> Result<BootstrapDocument> {
        let path = self.path_for(kind);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            RdapError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        BootstrapDocument::from_json(&content)
    }

    fn describe(&self) -> String {
        self.dir.to_string_lossy().to_string()
    }
}
