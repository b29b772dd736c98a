//! Resolution of domains, IP addresses and AS numbers to RDAP base URLs.

use super::table::RegistryTable;
use crate::error::{RdapError, Result};
use crate::types::RegistryKind;
use parking_lot::RwLock;
use reqwest::Url;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// Holds one table per registry kind and answers lookups against them.
///
/// Tables are shared as `Arc`s and replaced whole. A lookup clones the `Arc`
/// under a short read lock and then works on that snapshot, so a concurrent
/// refresh is observed either fully or not at all.
#[derive(Debug, Default)]
pub struct Resolver {
    tables: RwLock<HashMap<RegistryKind, Arc<RegistryTable>>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the table for `kind`
    pub fn install(&self, kind: RegistryKind, table: RegistryTable) -> Result<Arc<RegistryTable>> {
        if !table.serves(kind) {
            return Err(RdapError::internal(format!(
                "table shape does not match the {} registry",
                kind
            )));
        }

        let table = Arc::new(table);
        let previous = self.tables.write().insert(kind, Arc::clone(&table));

        tracing::info!(
            kind = %kind,
            entries = table.len(),
            replaced = previous.is_some(),
            "Bootstrap registry installed"
        );

        Ok(table)
    }

    /// Snapshot of the current table for `kind`
    pub fn table(&self, kind: RegistryKind) -> Option<Arc<RegistryTable>> {
        self.tables.read().get(&kind).cloned()
    }

    pub fn has_table(&self, kind: RegistryKind) -> bool {
        self.tables.read().contains_key(&kind)
    }

    fn snapshot(&self, kind: RegistryKind) -> Result<Arc<RegistryTable>> {
        self.table(kind)
            .ok_or_else(|| RdapError::not_found(format!("{} bootstrap registry is not loaded", kind)))
    }

    /// Resolve an identifier against the table for `kind`
    pub fn resolve(&self, kind: RegistryKind, identifier: &str) -> Result<Vec<Url>> {
        match kind {
            RegistryKind::Dns => self.resolve_domain(identifier),
            RegistryKind::Asn => self.resolve_autnum(identifier),
            RegistryKind::Ipv4 | RegistryKind::Ipv6 => {
                let addr = parse_ip(identifier)?;
                self.resolve_addr(kind, addr)
            }
        }
    }

    /// Base URLs serving the rightmost label of `domain`
    pub fn resolve_domain(&self, domain: &str) -> Result<Vec<Url>> {
        let tld = tld_of(domain)?;
        let table = self.snapshot(RegistryKind::Dns)?;

        let urls = match table.as_ref() {
            RegistryTable::Dns(dns) => dns.lookup(&tld),
            _ => None,
        };

        urls.map(<[Url]>::to_vec)
            .ok_or_else(|| RdapError::not_found(format!("tld {} not supported", tld)))
    }

    /// Base URLs serving the AS number (`"AS64496"` or `"64496"`)
    pub fn resolve_autnum(&self, asn: &str) -> Result<Vec<Url>> {
        let number = parse_asn(asn)?;
        let table = self.snapshot(RegistryKind::Asn)?;

        let urls = match table.as_ref() {
            RegistryTable::Asn(asns) => asns.lookup(number),
            _ => None,
        };

        urls.map(<[Url]>::to_vec)
            .ok_or_else(|| RdapError::not_found(format!("AS{} is not covered by any registry", number)))
    }

    /// Base URLs serving an IP address, using the registry of its family
    pub fn resolve_ip(&self, ip: &str) -> Result<Vec<Url>> {
        let addr = parse_ip(ip)?;
        self.resolve_addr(ip_registry_kind(&addr), addr)
    }

    fn resolve_addr(&self, kind: RegistryKind, addr: IpAddr) -> Result<Vec<Url>> {
        let table = self.snapshot(kind)?;

        let urls = match table.as_ref() {
            RegistryTable::Net(net) => net.lookup(addr),
            _ => None,
        };

        urls.map(<[Url]>::to_vec)
            .ok_or_else(|| RdapError::not_found(format!("{} is not covered by any {} block", addr, kind)))
    }
}

/// Lowercased rightmost label of a domain name
pub fn tld_of(domain: &str) -> Result<String> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(RdapError::invalid_input("domain name cannot be empty"));
    }

    let tld = trimmed.rsplit('.').next().unwrap_or(trimmed);
    if tld.is_empty() {
        return Err(RdapError::invalid_input(format!("domain '{}' has an empty top-level label", domain)));
    }

    Ok(tld.to_lowercase())
}

/// Parse an AS number, accepting an optional case-insensitive `AS` prefix
pub fn parse_asn(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &trimmed[2..],
        _ => trimmed,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RdapError::invalid_input(format!("'{}' is not an AS number", input)));
    }

    digits
        .parse::<u32>()
        .map_err(|_| RdapError::invalid_input(format!("AS number '{}' is out of range", input)))
}

/// Parse an IP address literal
pub fn parse_ip(input: &str) -> Result<IpAddr> {
    input
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| RdapError::invalid_input(format!("input {} is not an IP address", input)))
}

/// Registry that serves an address. IPv4-mapped IPv6 addresses use IPv4.
pub fn ip_registry_kind(addr: &IpAddr) -> RegistryKind {
    match addr.to_canonical() {
        IpAddr::V4(_) => RegistryKind::Ipv4,
        IpAddr::V6(_) => RegistryKind::Ipv6,
    }
}
