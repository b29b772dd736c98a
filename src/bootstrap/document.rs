//! Wire shape of an IANA bootstrap registry file (RFC 9224).
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "publication": "2024-01-01T00:00:00Z",
//!   "description": "...",
//!   "services": [
//!     [["36864-37887", "327680-328703"], ["https://rdap.afrinic.net/rdap/"]]
//!   ]
//! }
//! ```
//!
//! Only this module knows about the nested array layout. Tables convert to and
//! from it at the boundary and keep a keyed representation internally.

use crate::error::{RdapError, Result};
use serde::{Deserialize, Serialize};

/// A whole bootstrap registry document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub publication: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// One `[keys, urls]` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service(pub Vec<String>, pub Vec<String>);

impl Service {
    pub fn new(keys: Vec<String>, urls: Vec<String>) -> Self {
        Self(keys, urls)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn urls(&self) -> &[String] {
        &self.1
    }
}

/// Registry metadata carried alongside the services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub publication: String,
    pub description: String,
}

impl BootstrapDocument {
    /// Parse a document from raw JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            RdapError::parse(
                format!("malformed bootstrap document: {}", e),
                Some(text.chars().take(512).collect()),
            )
        })
    }

    /// Serialize back to the bootstrap JSON shape
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RdapError::internal(format!("failed to serialize bootstrap document: {}", e)))
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            version: self.version.clone(),
            publication: self.publication.clone(),
            description: self.description.clone(),
        }
    }

    /// Assemble a document from metadata and services
    pub fn with_services(metadata: &Metadata, services: Vec<Service>) -> Self {
        Self {
            version: metadata.version.clone(),
            publication: metadata.publication.clone(),
            description: metadata.description.clone(),
            services,
        }
    }
}
