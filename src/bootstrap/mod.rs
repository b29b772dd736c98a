//! RDAP bootstrap registries (RFC 9224).
//!
//! Maps a domain's TLD, an IP address or an AS number to the RDAP servers
//! responsible for it, using the tables IANA publishes.

pub mod client;
pub mod document;
pub mod interval;
pub mod resolver;
pub mod source;
pub mod table;

// Re-export main functionality
pub use client::BootstrapClient;
pub use document::{BootstrapDocument, Service};
pub use resolver::{parse_asn, parse_ip, tld_of, Resolver};
pub use source::{FileSource, HttpSource, RegistrySource};
pub use table::{AsnTable, DnsTable, NetTable, RegistryTable};
