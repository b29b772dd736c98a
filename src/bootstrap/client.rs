//! Bootstrap client: loads registries on demand and resolves through them.

use super::resolver::{ip_registry_kind, parse_ip, Resolver};
use super::source::{FileSource, HttpSource, RegistrySource};
use super::table::RegistryTable;
use crate::error::{RdapError, Result};
use crate::types::{ClientConfig, RegistryKind};
use futures::future::join_all;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Instant;

/// Lazily fetches bootstrap registries and answers server lookups
pub struct BootstrapClient {
    source: Box<dyn RegistrySource>,
    resolver: Resolver,
}

impl BootstrapClient {
    /// Create a client over an arbitrary source
    pub fn new(source: Box<dyn RegistrySource>) -> Self {
        Self {
            source,
            resolver: Resolver::new(),
        }
    }

    /// Create a client from configuration, sharing `http` for downloads
    pub fn from_config(config: &ClientConfig, http: Client) -> Self {
        let source: Box<dyn RegistrySource> = match &config.bootstrap_dir {
            Some(dir) => Box::new(FileSource::new(dir.clone())),
            None => Box::new(HttpSource::new(http, &config.bootstrap_base_url, config.timeout)),
        };
        Self::new(source)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Get the table for `kind`, fetching it when absent or when forced
    pub async fn fetch_registry(&self, kind: RegistryKind, force_update: bool) -> Result<Arc<RegistryTable>> {
        if !force_update {
            if let Some(table) = self.resolver.table(kind) {
                return Ok(table);
            }
        }

        let start_time = Instant::now();
        let doc = self.source.fetch(kind).await.map_err(|e| {
            tracing::warn!(kind = %kind, source = %self.source.describe(), error = %e, "Failed to fetch bootstrap registry");
            e
        })?;
        let table = RegistryTable::from_document(kind, &doc)?;

        tracing::debug!(
            kind = %kind,
            publication = %doc.publication,
            duration_ms = %start_time.elapsed().as_millis(),
            "Bootstrap registry fetched"
        );

        self.resolver.install(kind, table)
    }

    /// Fetch every registry concurrently, replacing any cached tables
    pub async fn fetch_all(&self) -> Result<()> {
        let futures = RegistryKind::ALL
            .iter()
            .map(|&kind| self.fetch_registry(kind, true));

        for result in join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// RDAP base URLs for a domain name
    pub async fn domain_servers(&self, domain: &str) -> Result<Vec<Url>> {
        self.fetch_registry(RegistryKind::Dns, false)
            .await
            .map_err(|e| wrap_fetch_error(RegistryKind::Dns, e))?;
        self.resolver.resolve_domain(domain)
    }

    /// RDAP base URLs for an AS number
    pub async fn autnum_servers(&self, asn: &str) -> Result<Vec<Url>> {
        self.fetch_registry(RegistryKind::Asn, false)
            .await
            .map_err(|e| wrap_fetch_error(RegistryKind::Asn, e))?;
        self.resolver.resolve_autnum(asn)
    }

    /// RDAP base URLs for an IP address
    pub async fn ip_servers(&self, ip: &str) -> Result<Vec<Url>> {
        // validate before touching the network
        let addr = parse_ip(ip)?;
        let kind = ip_registry_kind(&addr);
        self.fetch_registry(kind, false)
            .await
            .map_err(|e| wrap_fetch_error(kind, e))?;
        self.resolver.resolve_ip(ip)
    }
}

fn wrap_fetch_error(kind: RegistryKind, err: RdapError) -> RdapError {
    match err {
        RdapError::Upstream { message, status_code, url } => RdapError::Upstream {
            message: format!("failed to fetch {} service registry: {}", kind, message),
            status_code,
            url,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::document::BootstrapDocument;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RegistrySource for CountingSource {
        async fn fetch(&self, kind: RegistryKind) -> Result<BootstrapDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = match kind {
                RegistryKind::Dns => r#"{"services":[[["com"],["https://rdap.verisign.com/com/v1/"]]]}"#,
                RegistryKind::Asn => r#"{"services":[[["1-100"],["https://rdap.arin.net/registry/"]]]}"#,
                RegistryKind::Ipv4 => r#"{"services":[[["8.0.0.0/8"],["https://rdap.arin.net/registry/"]]]}"#,
                RegistryKind::Ipv6 => r#"{"services":[[["2600::/12"],["https://rdap.arin.net/registry/"]]]}"#,
            };
            BootstrapDocument::from_json(text)
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RegistrySource for FailingSource {
        async fn fetch(&self, _kind: RegistryKind) -> Result<BootstrapDocument> {
            Err(RdapError::upstream("server returned non-200 status code: 503", Some(503), None))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn counting_client() -> (BootstrapClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = BootstrapClient::new(Box::new(CountingSource { calls: Arc::clone(&calls) }));
        (client, calls)
    }

    #[tokio::test]
    async fn test_registry_fetched_once_and_cached() {
        let (client, calls) = counting_client();

        client.domain_servers("example.com").await.unwrap();
        client.domain_servers("other.com").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        client.fetch_registry(RegistryKind::Dns, true).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ip_picks_family_registry() {
        let (client, calls) = counting_client();

        let v4 = client.ip_servers("8.8.8.8").await.unwrap();
        assert_eq!(v4[0].as_str(), "https://rdap.arin.net/registry/");
        assert!(client.resolver().has_table(RegistryKind::Ipv4));
        assert!(!client.resolver().has_table(RegistryKind::Ipv6));

        client.ip_servers("2600::1").await.unwrap();
        assert!(client.resolver().has_table(RegistryKind::Ipv6));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_ip_skips_fetch() {
        let (client, calls) = counting_client();
        let err = client.ip_servers("not-an-ip").await.unwrap_err();
        assert!(matches!(err, RdapError::InvalidInput { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_loads_every_kind() {
        let (client, calls) = counting_client();
        client.fetch_all().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        for kind in RegistryKind::ALL {
            assert!(client.resolver().has_table(kind));
        }
        assert!(client.autnum_servers("AS42").await.is_ok());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let client = BootstrapClient::new(Box::new(FailingSource));
        match client.autnum_servers("AS1").await.unwrap_err() {
            RdapError::Upstream { message, status_code, .. } => {
                assert_eq!(status_code, Some(503));
                assert!(message.contains("asn service registry"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
