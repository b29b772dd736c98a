//! rdap-lookup - RDAP bootstrap resolution and contact decoding
//!
//! Finds the authoritative RDAP servers for a domain, IP address or AS number
//! using the IANA bootstrap registries, fetches the registration data, and
//! decodes the jCard contact records embedded in it.

pub mod bootstrap;
pub mod client;
pub mod error;
pub mod jcard;
pub mod print;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use error::{RdapError, Result};
pub use types::{ClientConfig, QueryType, RegistryKind};

// Re-export main functionality
pub use bootstrap::{BootstrapClient, Resolver};
pub use client::RdapClient;
pub use jcard::{parse_jcard, Address, VCard};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
