//! Core types and configuration for rdap-lookup

use crate::error::{RdapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default location of the IANA bootstrap files
pub const DEFAULT_BOOTSTRAP_BASE_URL: &str = "https://data.iana.org/rdap/";

/// Bootstrap registry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Dns,
    Ipv4,
    Ipv6,
    Asn,
}

impl RegistryKind {
    /// All registry kinds, in fetch order
    pub const ALL: [RegistryKind; 4] = [
        RegistryKind::Dns,
        RegistryKind::Ipv4,
        RegistryKind::Ipv6,
        RegistryKind::Asn,
    ];

    /// File name of this registry under the bootstrap base URL
    pub fn file_name(&self) -> &'static str {
        match self {
            RegistryKind::Dns => "dns.json",
            RegistryKind::Ipv4 => "ipv4.json",
            RegistryKind::Ipv6 => "ipv6.json",
            RegistryKind::Asn => "asn.json",
        }
    }

    /// Full URL of this registry's bootstrap file.
    ///
    /// An empty base falls back to the IANA location.
    pub fn index_url(&self, base_url: &str) -> String {
        let base = if base_url.is_empty() {
            DEFAULT_BOOTSTRAP_BASE_URL.to_string()
        } else {
            normalize_base_url(base_url)
        };
        format!("{}{}", base, self.file_name())
    }
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Dns => write!(f, "dns"),
            RegistryKind::Ipv4 => write!(f, "ipv4"),
            RegistryKind::Ipv6 => write!(f, "ipv6"),
            RegistryKind::Asn => write!(f, "asn"),
        }
    }
}

impl FromStr for RegistryKind {
    type Err = RdapError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "dns" => Ok(RegistryKind::Dns),
            "ipv4" => Ok(RegistryKind::Ipv4),
            "ipv6" => Ok(RegistryKind::Ipv6),
            "asn" => Ok(RegistryKind::Asn),
            other => Err(RdapError::invalid_input(format!(
                "invalid registry type '{}', must be one of: dns, ipv4, ipv6, asn",
                other
            ))),
        }
    }
}

/// RDAP object class being queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Domain,
    Ip,
    Autnum,
    Entity,
    Nameserver,
}

impl QueryType {
    /// Path segment used by RDAP servers for this object class
    pub fn path_segment(&self) -> &'static str {
        match self {
            QueryType::Domain => "domain",
            QueryType::Ip => "ip",
            QueryType::Autnum => "autnum",
            QueryType::Entity => "entity",
            QueryType::Nameserver => "nameserver",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub bootstrap_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Read bootstrap files from this directory instead of the network
    pub bootstrap_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bootstrap_base_url: DEFAULT_BOOTSTRAP_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rdap-lookup/{}", env!("CARGO_PKG_VERSION")),
            bootstrap_dir: None,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `RDAP_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RDAP_BOOTSTRAP_URL").filter(|u| !u.trim().is_empty()) {
            config.bootstrap_base_url = normalize_base_url(url.trim());
        }

        if let Some(secs) = lookup("RDAP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                RdapError::config(format!("RDAP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", secs))
            })?;
            if secs == 0 {
                return Err(RdapError::config("RDAP_TIMEOUT_SECS must be greater than zero"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = lookup("RDAP_BOOTSTRAP_DIR").filter(|d| !d.trim().is_empty()) {
            config.bootstrap_dir = Some(PathBuf::from(dir.trim()));
        }

        Ok(config)
    }

    /// Download bootstrap files from another base URL
    pub fn with_bootstrap_url(mut self, url: &str) -> Self {
        self.bootstrap_base_url = normalize_base_url(url.trim());
        self
    }

    /// Use bootstrap files from a local directory
    pub fn with_bootstrap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bootstrap_dir = Some(dir.into());
        self
    }
}

/// Ensure a base URL ends with `/` so file names and paths can be appended
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
