//! RDAP client: bootstrap lookup, server choice, fetch and decode.

use crate::bootstrap::{parse_asn, parse_ip, BootstrapClient};
use crate::error::{RdapError, Result};
use crate::response::{Autnum, Domain, Entity, IpNetwork, Nameserver};
use crate::types::{ClientConfig, QueryType};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// RDAP client with a built-in bootstrap registry
pub struct RdapClient {
    http: Client,
    bootstrap: BootstrapClient,
    config: ClientConfig,
}

impl RdapClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| RdapError::config(format!("failed to build HTTP client: {}", e)))?;

        let bootstrap = BootstrapClient::from_config(&config, http.clone());

        Ok(Self {
            http,
            bootstrap,
            config,
        })
    }

    /// Create a client around an existing bootstrap client
    pub fn with_bootstrap(config: ClientConfig, bootstrap: BootstrapClient) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.bootstrap = bootstrap;
        Ok(client)
    }

    pub fn bootstrap(&self) -> &BootstrapClient {
        &self.bootstrap
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URLs able to answer `query` for the given object class
    pub async fn servers_for(&self, query_type: QueryType, query: &str) -> Result<Vec<Url>> {
        match query_type {
            QueryType::Domain | QueryType::Nameserver => self.bootstrap.domain_servers(query).await,
            QueryType::Ip => self.bootstrap.ip_servers(query).await,
            QueryType::Autnum => self.bootstrap.autnum_servers(query).await,
            QueryType::Entity => Err(RdapError::invalid_input(
                "entity handles cannot be bootstrapped; query a known server instead",
            )),
        }
    }

    /// Look up a domain name
    pub async fn domain(&self, domain: &str) -> Result<Domain> {
        let name = normalize_domain(domain)?;
        self.bootstrapped(QueryType::Domain, &name, &name).await
    }

    /// Look up a nameserver, using the registry of its TLD
    pub async fn nameserver(&self, name: &str) -> Result<Nameserver> {
        let name = normalize_domain(name)?;
        self.bootstrapped(QueryType::Nameserver, &name, &name).await
    }

    /// Look up the network containing an IP address
    pub async fn ip(&self, ip: &str) -> Result<IpNetwork> {
        let addr = parse_ip(ip)?;
        self.bootstrapped(QueryType::Ip, ip, &addr.to_string()).await
    }

    /// Look up an AS number (`AS15169` or `15169`)
    pub async fn autnum(&self, asn: &str) -> Result<Autnum> {
        let number = parse_asn(asn)?;
        self.bootstrapped(QueryType::Autnum, asn, &number.to_string()).await
    }

    /// Look up an entity handle on a specific server
    pub async fn entity(&self, server: &Url, handle: &str) -> Result<Entity> {
        self.query_server(server, QueryType::Entity, handle.trim()).await
    }

    async fn bootstrapped<T: DeserializeOwned>(
        &self,
        query_type: QueryType,
        lookup_key: &str,
        path_query: &str,
    ) -> Result<T> {
        let servers = self.servers_for(query_type, lookup_key).await?;
        let server = choose_server(&servers).ok_or_else(|| {
            RdapError::not_found(format!("no RDAP server listed for {}", lookup_key))
        })?;
        self.query_server(server, query_type, path_query).await
    }

    /// Fetch and decode one object from an explicit server
    pub async fn query_server<T: DeserializeOwned>(
        &self,
        server: &Url,
        query_type: QueryType,
        query: &str,
    ) -> Result<T> {
        let url = object_url(server, query_type, query)?;
        let timeout_secs = self.config.timeout.as_secs();
        let start_time = Instant::now();

        let response = timeout(self.config.timeout, self.http.get(url.clone()).send())
            .await
            .map_err(|_| RdapError::timeout(format!("RDAP {} query", query_type), timeout_secs))?
            .map_err(|e| RdapError::upstream(e.to_string(), None, Some(url.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "RDAP query failed");
            return Err(RdapError::upstream(
                format!("server returned non-200 status code: {}", status),
                Some(status.as_u16()),
                Some(url.to_string()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RdapError::upstream(format!("error reading RDAP response: {}", e), None, Some(url.to_string())))?;

        tracing::debug!(
            url = %url,
            query_type = %query_type,
            bytes = text.len(),
            duration_ms = %start_time.elapsed().as_millis(),
            "RDAP query completed"
        );

        serde_json::from_str(&text)
            .map_err(|e| RdapError::parse(format!("error parsing RDAP response: {}", e), Some(text)))
    }
}

/// Prefer the first HTTPS server, otherwise fall back to the last listed
pub fn choose_server(servers: &[Url]) -> Option<&Url> {
    servers
        .iter()
        .find(|url| url.scheme() == "https")
        .or_else(|| servers.last())
}

/// `<base>/<segment>/<query>` with the query escaped as one path segment
pub fn object_url(base: &Url, query_type: QueryType, query: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RdapError::invalid_input(format!("'{}' cannot be used as a base URL", base)))?
        .pop_if_empty()
        .push(query_type.path_segment())
        .push(query);
    Ok(url)
}

fn normalize_domain(domain: &str) -> Result<String> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(RdapError::invalid_input("domain name cannot be empty"));
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<Url> {
        list.iter().map(|s| Url::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_choose_server_prefers_https() {
        let servers = urls(&["http://rdap.afrinic.net/rdap/", "https://rdap.afrinic.net/rdap/"]);
        assert_eq!(choose_server(&servers).unwrap().scheme(), "https");

        let plain = urls(&["http://a.example/", "http://b.example/"]);
        assert_eq!(choose_server(&plain).unwrap().as_str(), "http://b.example/");

        assert!(choose_server(&[]).is_none());
    }

    #[test]
    fn test_object_url() {
        let base = Url::parse("https://rdap.verisign.com/com/v1/").unwrap();
        let url = object_url(&base, QueryType::Domain, "google.com").unwrap();
        assert_eq!(url.as_str(), "https://rdap.verisign.com/com/v1/domain/google.com");

        let bare = Url::parse("https://rdap.arin.net/registry").unwrap();
        let url = object_url(&bare, QueryType::Ip, "2001:db8::/32").unwrap();
        assert_eq!(url.as_str(), "https://rdap.arin.net/registry/ip/2001:db8::%2F32");
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain(" Example.COM. ").unwrap(), "example.com");
        assert!(normalize_domain(".").is_err());
    }

    #[tokio::test]
    async fn test_entity_has_no_bootstrap() {
        let client = RdapClient::new().unwrap();
        let err = client.servers_for(QueryType::Entity, "ABC-ARIN").await.unwrap_err();
        assert!(matches!(err, RdapError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_invalid_queries_fail_before_network() {
        let client = RdapClient::new().unwrap();
        assert!(matches!(client.autnum("ASX").await.unwrap_err(), RdapError::InvalidInput { .. }));
        assert!(matches!(client.ip("1.2.3").await.unwrap_err(), RdapError::InvalidInput { .. }));
        assert!(matches!(client.domain("  ").await.unwrap_err(), RdapError::InvalidInput { .. }));
    }
}
