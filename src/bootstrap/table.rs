//! Keyed registry tables built from bootstrap documents.
//!
//! A table is immutable once built. Refreshing a registry builds a new table
//! and swaps it in whole (see [`crate::bootstrap::Resolver`]).

use super::document::{BootstrapDocument, Metadata, Service};
use super::interval::{Interval, IntervalIndex};
use crate::error::{RdapError, Result};
use crate::types::RegistryKind;
use cidr::IpCidr;
use regex::Regex;
use reqwest::Url;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::OnceLock;

/// Parse a list of base URLs. Every URL must be absolute.
pub fn parse_urls(urls: &[String]) -> Result<Vec<Url>> {
    urls.iter()
        .map(|raw| {
            Url::parse(raw.trim()).map_err(|e| {
                RdapError::parse(format!("invalid URL '{}': {}", raw, e), None)
            })
        })
        .collect()
}

fn url_strings(urls: &[Url]) -> Vec<String> {
    urls.iter().map(|u| u.as_str().to_string()).collect()
}

#[derive(Debug, Clone)]
struct DnsEntry {
    // key as written in the document
    key: String,
    urls: Vec<Url>,
}

/// Exact-match table of top-level domains
#[derive(Debug, Clone, Default)]
pub struct DnsTable {
    metadata: Metadata,
    // lowercased TLD -> entry
    services: BTreeMap<String, DnsEntry>,
}

impl DnsTable {
    pub fn from_document(doc: &BootstrapDocument) -> Result<Self> {
        let mut services = BTreeMap::new();

        for service in &doc.services {
            let urls = parse_urls(service.urls())?;
            if urls.is_empty() {
                tracing::debug!(keys = ?service.keys(), "Skipping DNS service without URLs");
                continue;
            }
            for key in service.keys() {
                let tld = key.trim().trim_start_matches('.').to_lowercase();
                if tld.is_empty() {
                    continue;
                }
                let entry = DnsEntry {
                    key: key.clone(),
                    urls: urls.clone(),
                };
                if services.insert(tld, entry).is_some() {
                    tracing::debug!(tld = %key, "Duplicate TLD in bootstrap document, keeping last");
                }
            }
        }

        Ok(Self {
            metadata: doc.metadata(),
            services,
        })
    }

    pub fn to_document(&self) -> BootstrapDocument {
        let services = self
            .services
            .values()
            .map(|entry| Service::new(vec![entry.key.clone()], url_strings(&entry.urls)))
            .collect();
        BootstrapDocument::with_services(&self.metadata, services)
    }

    /// URLs for an already-lowercased TLD
    pub fn lookup(&self, tld: &str) -> Option<&[Url]> {
        self.services.get(tld).map(|entry| entry.urls.as_slice())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[derive(Debug, Clone)]
struct AsnEntry {
    key: String,
    min: u32,
    max: u32,
    urls: Vec<Url>,
}

/// AS number interval table
#[derive(Debug, Clone, Default)]
pub struct AsnTable {
    metadata: Metadata,
    entries: Vec<AsnEntry>,
    index: IntervalIndex<u32>,
}

static ASN_RANGE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

fn asn_range_regex() -> Result<&'static Regex> {
    ASN_RANGE
        .get_or_init(|| Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?$"))
        .as_ref()
        .map_err(|e| RdapError::internal(format!("bad ASN range pattern: {}", e)))
}

/// Parse `"36864-37887"` or `"36864"` into an ordered `(min, max)` pair
pub fn parse_asn_range(raw: &str) -> Result<(u32, u32)> {
    let caps = asn_range_regex()?
        .captures(raw)
        .ok_or_else(|| RdapError::parse(format!("invalid ASN range '{}'", raw), None))?;

    let parse = |s: &str| {
        s.parse::<u32>()
            .map_err(|e| RdapError::parse(format!("invalid ASN '{}' in range '{}': {}", s, raw, e), None))
    };

    let min = parse(&caps[1])?;
    let max = match caps.get(2) {
        Some(m) => parse(m.as_str())?,
        None => min,
    };

    Ok(if min <= max { (min, max) } else { (max, min) })
}

impl AsnTable {
    pub fn from_document(doc: &BootstrapDocument) -> Result<Self> {
        let mut entries = Vec::new();

        for service in &doc.services {
            let urls = parse_urls(service.urls())?;
            if urls.is_empty() {
                tracing::debug!(keys = ?service.keys(), "Skipping ASN service without URLs");
                continue;
            }
            for key in service.keys() {
                let (min, max) = parse_asn_range(key)?;
                entries.push(AsnEntry {
                    key: key.clone(),
                    min,
                    max,
                    urls: urls.clone(),
                });
            }
        }

        let index = IntervalIndex::new(
            entries
                .iter()
                .enumerate()
                .map(|(slot, e)| Interval::new(e.min, e.max, slot))
                .collect(),
        );

        Ok(Self {
            metadata: doc.metadata(),
            entries,
            index,
        })
    }

    pub fn to_document(&self) -> BootstrapDocument {
        let services = self
            .index
            .iter()
            .map(|interval| {
                let entry = &self.entries[interval.slot];
                Service::new(
                    vec![entry.key.clone()],
                    url_strings(&entry.urls),
                )
            })
            .collect();
        BootstrapDocument::with_services(&self.metadata, services)
    }

    pub fn lookup(&self, asn: u32) -> Option<&[Url]> {
        self.index
            .lookup(asn)
            .map(|slot| self.entries[slot].urls.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
struct NetEntry {
    key: String,
    cidr: IpCidr,
    urls: Vec<Url>,
}

/// CIDR block table (one per address family registry, but holds either family)
#[derive(Debug, Clone, Default)]
pub struct NetTable {
    metadata: Metadata,
    entries: Vec<NetEntry>,
    v4: IntervalIndex<u128>,
    v6: IntervalIndex<u128>,
}

/// Closed numeric range covered by a CIDR block
pub fn cidr_bounds(cidr: &IpCidr) -> (u128, u128) {
    match cidr {
        IpCidr::V4(block) => {
            let start = u32::from(block.first_address());
            let host_bits = 32 - u32::from(block.network_length());
            let mask = if host_bits >= 32 { u32::MAX } else { (1u32 << host_bits) - 1 };
            (u128::from(start), u128::from(start | mask))
        }
        IpCidr::V6(block) => {
            let start = u128::from(block.first_address());
            let host_bits = 128 - u32::from(block.network_length());
            let mask = if host_bits >= 128 { u128::MAX } else { (1u128 << host_bits) - 1 };
            (start, start | mask)
        }
    }
}

impl NetTable {
    pub fn from_document(doc: &BootstrapDocument) -> Result<Self> {
        let mut entries = Vec::new();

        for service in &doc.services {
            let urls = parse_urls(service.urls())?;
            if urls.is_empty() {
                tracing::debug!(keys = ?service.keys(), "Skipping network service without URLs");
                continue;
            }
            for key in service.keys() {
                let cidr: IpCidr = key.trim().parse().map_err(|e| {
                    RdapError::invalid_input(format!("invalid CIDR block '{}': {}", key, e))
                })?;
                entries.push(NetEntry {
                    key: key.clone(),
                    cidr,
                    urls: urls.clone(),
                });
            }
        }

        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        for (slot, entry) in entries.iter().enumerate() {
            let (start, end) = cidr_bounds(&entry.cidr);
            match entry.cidr {
                IpCidr::V4(_) => v4.push(Interval::new(start, end, slot)),
                IpCidr::V6(_) => v6.push(Interval::new(start, end, slot)),
            }
        }

        Ok(Self {
            metadata: doc.metadata(),
            entries,
            v4: IntervalIndex::new(v4),
            v6: IntervalIndex::new(v6),
        })
    }

    pub fn to_document(&self) -> BootstrapDocument {
        let services = self
            .v4
            .iter()
            .chain(self.v6.iter())
            .map(|interval| {
                let entry = &self.entries[interval.slot];
                Service::new(vec![entry.key.clone()], url_strings(&entry.urls))
            })
            .collect();
        BootstrapDocument::with_services(&self.metadata, services)
    }

    /// URLs of the most specific block containing `addr`
    pub fn lookup(&self, addr: IpAddr) -> Option<&[Url]> {
        let slot = match addr.to_canonical() {
            IpAddr::V4(v4) => self.v4.lookup(u128::from(u32::from(v4))),
            IpAddr::V6(v6) => self.v6.lookup(u128::from(v6)),
        }?;
        Some(self.entries[slot].urls.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A built table for one registry kind
#[derive(Debug, Clone)]
pub enum RegistryTable {
    Dns(DnsTable),
    Asn(AsnTable),
    Net(NetTable),
}

impl RegistryTable {
    /// Build the table shape that `kind` calls for
    pub fn from_document(kind: RegistryKind, doc: &BootstrapDocument) -> Result<Self> {
        Ok(match kind {
            RegistryKind::Dns => Self::Dns(DnsTable::from_document(doc)?),
            RegistryKind::Asn => Self::Asn(AsnTable::from_document(doc)?),
            RegistryKind::Ipv4 | RegistryKind::Ipv6 => Self::Net(NetTable::from_document(doc)?),
        })
    }

    pub fn from_json(kind: RegistryKind, text: &str) -> Result<Self> {
        Self::from_document(kind, &BootstrapDocument::from_json(text)?)
    }

    pub fn to_document(&self) -> BootstrapDocument {
        match self {
            Self::Dns(table) => table.to_document(),
            Self::Asn(table) => table.to_document(),
            Self::Net(table) => table.to_document(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Dns(table) => table.len(),
            Self::Asn(table) => table.len(),
            Self::Net(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this table shape can serve `kind`
    pub fn serves(&self, kind: RegistryKind) -> bool {
        matches!(
            (self, kind),
            (Self::Dns(_), RegistryKind::Dns)
                | (Self::Asn(_), RegistryKind::Asn)
                | (Self::Net(_), RegistryKind::Ipv4 | RegistryKind::Ipv6)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(services: &[(&[&str], &[&str])]) -> BootstrapDocument {
        BootstrapDocument {
            version: "1.0".into(),
            publication: "2024-05-01T18:00:01Z".into(),
            description: String::new(),
            services: services
                .iter()
                .map(|(keys, urls)| {
                    Service::new(
                        keys.iter().map(|s| s.to_string()).collect(),
                        urls.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_urls() {
        let urls = parse_urls(&["https://example.com/".into(), "http://test.org/rdap/".into()]).unwrap();
        assert_eq!(urls[0].as_str(), "https://example.com/");
        assert_eq!(urls[1].scheme(), "http");

        assert!(parse_urls(&["https://example.com".into(), "invalid.com".into()]).is_err());
        assert!(parse_urls(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_asn_range() {
        assert_eq!(parse_asn_range("36864-37887").unwrap(), (36864, 37887));
        assert_eq!(parse_asn_range("36864").unwrap(), (36864, 36864));
        assert_eq!(parse_asn_range("200-100").unwrap(), (100, 200));
        assert!(parse_asn_range("1-2-3").is_err());
        assert!(parse_asn_range("AS100").is_err());
        assert!(parse_asn_range("4294967296").is_err());
    }

    fn keys(doc: &BootstrapDocument) -> Vec<String> {
        let mut keys: Vec<String> = doc
            .services
            .iter()
            .flat_map(|service| service.keys().to_vec())
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_to_document_keeps_keys_as_written() {
        let dns = DnsTable::from_document(&doc(&[(&["COM", "Net"], &["https://rdap.verisign.com/com/v1/"])])).unwrap();
        assert_eq!(keys(&dns.to_document()), vec!["COM", "Net"]);
        assert!(dns.lookup("net").is_some());

        let asn = AsnTable::from_document(&doc(&[(&["200-100", "7-7"], &["https://rdap.arin.net/registry/"])])).unwrap();
        assert_eq!(keys(&asn.to_document()), vec!["200-100", "7-7"]);
        assert!(asn.lookup(150).is_some());
        assert!(asn.lookup(7).is_some());

        let net = NetTable::from_document(&doc(&[(
            &["10.0.0.0/8", "192.0.2.1/32", "2001:db8::1/128"],
            &["https://rdap.example.net/"],
        )]))
        .unwrap();
        assert_eq!(keys(&net.to_document()), vec!["10.0.0.0/8", "192.0.2.1/32", "2001:db8::1/128"]);
        assert!(net.lookup("192.0.2.1".parse().unwrap()).is_some());
        assert!(net.lookup("192.0.2.2".parse().unwrap()).is_none());
        assert!(net.lookup("2001:db8::1".parse().unwrap()).is_some());
    }

    #[test]
    fn test_dns_table_lowercases_keys() {
        let table = DnsTable::from_document(&doc(&[(&["COM", "net"], &["https://rdap.verisign.com/com/v1/"])])).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.lookup("com").is_some());
        assert!(table.lookup("COM").is_none());
    }

    #[test]
    fn test_empty_url_lists_are_dropped() {
        let table = DnsTable::from_document(&doc(&[(&["zz"], &[]), (&["io"], &["https://rdap.nic.io/"])])).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.lookup("zz").is_none());
    }

    #[test]
    fn test_asn_table_lookup() {
        let table = AsnTable::from_document(&doc(&[
            (&["1-1876", "1902-2042"], &["https://rdap.arin.net/registry/"]),
            (&["1877-1901"], &["https://rdap.db.ripe.net/"]),
        ]))
        .unwrap();

        assert_eq!(table.lookup(1).unwrap()[0].as_str(), "https://rdap.arin.net/registry/");
        assert_eq!(table.lookup(1876).unwrap()[0].as_str(), "https://rdap.arin.net/registry/");
        assert_eq!(table.lookup(1877).unwrap()[0].as_str(), "https://rdap.db.ripe.net/");
        assert_eq!(table.lookup(1901).unwrap()[0].as_str(), "https://rdap.db.ripe.net/");
        assert_eq!(table.lookup(1902).unwrap()[0].as_str(), "https://rdap.arin.net/registry/");
        assert!(table.lookup(2043).is_none());
        assert!(table.lookup(0).is_none());
    }

    #[test]
    fn test_net_table_prefers_most_specific_block() {
        let table = NetTable::from_document(&doc(&[
            (&["41.0.0.0/8"], &["https://rdap.afrinic.net/rdap/"]),
            (&["41.128.0.0/12"], &["https://rdap.example.net/"]),
            (&["2c00::/12"], &["https://rdap.afrinic.net/rdap/"]),
        ]))
        .unwrap();

        let specific = table.lookup("41.130.1.1".parse().unwrap()).unwrap();
        assert_eq!(specific[0].as_str(), "https://rdap.example.net/");
        let broad = table.lookup("41.1.1.1".parse().unwrap()).unwrap();
        assert_eq!(broad[0].as_str(), "https://rdap.afrinic.net/rdap/");
        assert!(table.lookup("42.0.0.1".parse().unwrap()).is_none());
        assert!(table.lookup("2c0f:f000::1".parse().unwrap()).is_some());
        assert!(table.lookup("::ffff:41.1.1.1".parse().unwrap()).is_some());
    }

    #[test]
    fn test_net_table_rejects_bad_cidr() {
        let err = NetTable::from_document(&doc(&[(&["300.0.0.0/8"], &["https://x.example/"])])).unwrap_err();
        assert!(matches!(err, RdapError::InvalidInput { .. }));
    }

    #[test]
    fn test_cidr_bounds() {
        let cidr: IpCidr = "10.0.0.0/8".parse().unwrap();
        assert_eq!(cidr_bounds(&cidr), (0x0a00_0000, 0x0aff_ffff));
        let all: IpCidr = "0.0.0.0/0".parse().unwrap();
        assert_eq!(cidr_bounds(&all), (0, u128::from(u32::MAX)));
        let all6: IpCidr = "::/0".parse().unwrap();
        assert_eq!(cidr_bounds(&all6), (0, u128::MAX));
    }

    #[test]
    fn test_registry_table_serves() {
        let table = RegistryTable::from_document(RegistryKind::Ipv6, &doc(&[])).unwrap();
        assert!(table.serves(RegistryKind::Ipv4));
        assert!(table.serves(RegistryKind::Ipv6));
        assert!(!table.serves(RegistryKind::Asn));
        assert!(table.is_empty());
    }
}
