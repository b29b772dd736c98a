//! Topmost RDAP response objects (RFC 9083).

pub mod common;
pub mod domain;
pub mod entity;
pub mod network;

pub use common::{Event, Link, Notice, PublicId, Remark};
pub use domain::{Domain, SecureDns};
pub use entity::Entity;
pub use network::{Autnum, IpAddressSet, IpNetwork, Nameserver};
