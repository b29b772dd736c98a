//! Domain: a DNS name and its point of delegation.

use super::common::{find_event, Event, Link, Notice, PublicId, Remark};
use super::entity::{find_entity, Entity};
use super::network::{IpNetwork, Nameserver};
use serde::Deserialize;

/// Domain (RFC 9083 section 5.3)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Domain {
    pub lang: String,
    pub rdap_conformance: Vec<String>,
    pub object_class_name: String,
    pub notices: Vec<Notice>,

    pub handle: String,
    pub ldh_name: String,
    pub unicode_name: String,
    pub variants: Vec<Variant>,
    pub nameservers: Vec<Nameserver>,
    #[serde(rename = "secureDNS")]
    pub secure_dns: Option<SecureDns>,
    pub entities: Vec<Entity>,
    pub status: Vec<String>,
    pub public_ids: Vec<PublicId>,
    pub remarks: Vec<Remark>,
    pub links: Vec<Link>,
    pub port43: String,
    pub events: Vec<Event>,
    pub network: Option<IpNetwork>,
}

/// Variant names of an internationalized domain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Variant {
    pub relation: Vec<String>,
    pub idn_table: String,
    pub variant_names: Vec<VariantName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantName {
    pub ldh_name: String,
    pub unicode_name: String,
}

/// DNSSEC information
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecureDns {
    pub zone_signed: Option<bool>,
    pub delegation_signed: Option<bool>,
    pub max_sig_life: Option<u64>,
    pub ds_data: Vec<DsData>,
    pub key_data: Vec<KeyData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DsData {
    pub key_tag: Option<u64>,
    pub algorithm: Option<u8>,
    pub digest: String,
    pub digest_type: Option<u8>,
    pub events: Vec<Event>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyData {
    pub flags: Option<u16>,
    pub protocol: Option<u8>,
    pub algorithm: Option<u8>,
    pub public_key: String,
    pub events: Vec<Event>,
    pub links: Vec<Link>,
}

impl Domain {
    /// First entity holding `role`, searching nested entities as well
    pub fn entity_with_role(&self, role: &str) -> Option<&Entity> {
        find_entity(&self.entities, role)
    }

    pub fn event(&self, action: &str) -> Option<&Event> {
        find_event(&self.events, action)
    }

    /// Value of the first `self` link
    pub fn registrar_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "self")
            .map(|link| if link.value.is_empty() { link.href.as_str() } else { link.value.as_str() })
    }

    pub fn nameserver_names(&self) -> Vec<String> {
        self.nameservers
            .iter()
            .map(|ns| ns.ldh_name.to_lowercase())
            .collect()
    }

    pub fn is_dnssec_signed(&self) -> bool {
        self.secure_dns
            .as_ref()
            .and_then(|s| s.delegation_signed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = r#"{
        "objectClassName": "domain",
        "handle": "2138514_DOMAIN_COM-VRSN",
        "ldhName": "GOOGLE.COM",
        "links": [{"value": "https://rdap.verisign.com/com/v1/domain/GOOGLE.COM", "rel": "self",
                   "href": "https://rdap.verisign.com/com/v1/domain/GOOGLE.COM", "type": "application/rdap+json"}],
        "status": ["client delete prohibited", "server transfer prohibited"],
        "entities": [{"objectClassName": "entity", "handle": "292", "roles": ["registrar"],
            "vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "MarkMonitor Inc."]]]}],
        "events": [
            {"eventAction": "registration", "eventDate": "1997-09-15T04:00:00Z"},
            {"eventAction": "expiration", "eventDate": "2028-09-14T04:00:00Z"}
        ],
        "secureDNS": {"delegationSigned": false},
        "nameservers": [{"objectClassName": "nameserver", "ldhName": "NS1.GOOGLE.COM"},
                        {"objectClassName": "nameserver", "ldhName": "NS2.GOOGLE.COM"}],
        "rdapConformance": ["rdap_level_0"]
    }"#;

    #[test]
    fn test_domain_decode() {
        let domain: Domain = serde_json::from_str(DOMAIN).unwrap();
        assert_eq!(domain.ldh_name, "GOOGLE.COM");
        assert_eq!(domain.nameserver_names(), vec!["ns1.google.com", "ns2.google.com"]);
        assert_eq!(domain.registrar_url(), Some("https://rdap.verisign.com/com/v1/domain/GOOGLE.COM"));
        assert!(!domain.is_dnssec_signed());
        assert_eq!(domain.rdap_conformance, vec!["rdap_level_0"]);
    }

    #[test]
    fn test_domain_helpers() {
        let domain: Domain = serde_json::from_str(DOMAIN).unwrap();
        let registrar = domain.entity_with_role("registrar").unwrap();
        assert_eq!(registrar.display_name(), "MarkMonitor Inc.");
        assert!(domain.entity_with_role("registrant").is_none());

        let created = domain.event("registration").unwrap().date().unwrap();
        assert_eq!(created.format("%Y-%m-%d").to_string(), "1997-09-15");
        assert!(domain.event("last changed").is_none());
    }

    #[test]
    fn test_minimal_domain() {
        let domain: Domain = serde_json::from_str(r#"{"ldhName": "example.zz"}"#).unwrap();
        assert!(domain.registrar_url().is_none());
        assert!(domain.nameserver_names().is_empty());
    }
}
