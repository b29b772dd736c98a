//! IP network, autonomous system and nameserver objects.

use super::common::{find_event, Event, Link, Notice, Remark};
use super::entity::{find_entity, Entity};
use serde::Deserialize;

/// IP network registration (RFC 9083 section 5.4)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpNetwork {
    pub lang: String,
    pub rdap_conformance: Vec<String>,
    pub object_class_name: String,
    pub notices: Vec<Notice>,

    pub handle: String,
    pub start_address: String,
    pub end_address: String,
    pub ip_version: String,
    pub name: String,
    #[serde(rename = "type")]
    pub network_type: String,
    pub country: String,
    pub parent_handle: String,
    pub status: Vec<String>,
    pub entities: Vec<Entity>,
    pub remarks: Vec<Remark>,
    pub links: Vec<Link>,
    pub port43: String,
    pub events: Vec<Event>,
}

impl IpNetwork {
    pub fn entity_with_role(&self, role: &str) -> Option<&Entity> {
        find_entity(&self.entities, role)
    }

    pub fn event(&self, action: &str) -> Option<&Event> {
        find_event(&self.events, action)
    }
}

/// Autonomous system registration (RFC 9083 section 5.5)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Autnum {
    pub lang: String,
    pub rdap_conformance: Vec<String>,
    pub object_class_name: String,
    pub notices: Vec<Notice>,

    pub handle: String,
    pub start_autnum: Option<u32>,
    pub end_autnum: Option<u32>,
    pub name: String,
    #[serde(rename = "type")]
    pub autnum_type: String,
    pub status: Vec<String>,
    pub country: String,
    pub entities: Vec<Entity>,
    pub remarks: Vec<Remark>,
    pub links: Vec<Link>,
    pub port43: String,
    pub events: Vec<Event>,
}

impl Autnum {
    pub fn entity_with_role(&self, role: &str) -> Option<&Entity> {
        find_entity(&self.entities, role)
    }

    pub fn event(&self, action: &str) -> Option<&Event> {
        find_event(&self.events, action)
    }

    /// `AS64496` or `AS64496-AS64511`
    pub fn range_label(&self) -> Option<String> {
        match (self.start_autnum, self.end_autnum) {
            (Some(start), Some(end)) if start != end => Some(format!("AS{}-AS{}", start, end)),
            (Some(start), _) => Some(format!("AS{}", start)),
            (None, Some(end)) => Some(format!("AS{}", end)),
            (None, None) => None,
        }
    }
}

/// Addresses of a nameserver
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IpAddressSet {
    pub v4: Vec<String>,
    pub v6: Vec<String>,
}

/// Nameserver (RFC 9083 section 5.2)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Nameserver {
    pub lang: String,
    pub rdap_conformance: Vec<String>,
    pub object_class_name: String,
    pub notices: Vec<Notice>,

    pub handle: String,
    pub ldh_name: String,
    pub unicode_name: String,
    pub ip_addresses: Option<IpAddressSet>,
    pub entities: Vec<Entity>,
    pub status: Vec<String>,
    pub remarks: Vec<Remark>,
    pub links: Vec<Link>,
    pub port43: String,
    pub events: Vec<Event>,
}
