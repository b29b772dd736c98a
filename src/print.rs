//! Console summaries of RDAP objects

use crate::jcard::VCard;
use crate::response::{Autnum, Domain, Entity, Event, IpNetwork};
use reqwest::Url;
use std::fmt::Write;

const CONTACT_ROLES: [(&str, &str); 3] = [
    ("registrant", "Registrant"),
    ("administrative", "Admin"),
    ("technical", "Tech"),
];

/// Render a domain in the familiar WHOIS-style layout
pub fn render_domain(domain: &Domain) -> String {
    let mut out = String::new();

    line(&mut out, "RegistryDomainID", &domain.handle);
    line(&mut out, "DomainName", &domain.ldh_name);
    event_line(&mut out, "CreatedDate", domain.event("registration"));
    event_line(&mut out, "UpdatedDate", domain.event("last changed"));
    event_line(&mut out, "RegistrarExpirationDate", domain.event("expiration"));
    line(&mut out, "RegistrarWhoisServer", &domain.port43);
    line(&mut out, "NameServer", &domain.nameserver_names().join(", "));
    line(&mut out, "DomainStatus", &domain.status.join(", "));
    line(&mut out, "DNSSEC", if domain.is_dnssec_signed() { "signedDelegation" } else { "unsigned" });

    if let Some(registrar) = domain.entity_with_role("registrar") {
        line(&mut out, "Registrar", registrar.display_name());
        let iana_id = registrar
            .public_ids
            .iter()
            .find(|id| id.id_type.to_lowercase().contains("iana"))
            .map(|id| id.identifier.as_str())
            .unwrap_or(registrar.handle.as_str());
        line(&mut out, "RegistrarIanaID", iana_id);
        if let Some(url) = domain.registrar_url() {
            line(&mut out, "RegistrarURL", url);
        }
        if let Some(abuse) = registrar.vcard_for_role("abuse") {
            line(&mut out, "RegistrarAbuseContactEmail", &abuse.email);
            line(&mut out, "RegistrarAbuseContactPhone", &abuse.telephone);
        }
    }

    contacts(&mut out, &domain.entities);
    out
}

/// Render an IP network registration
pub fn render_ip_network(network: &IpNetwork) -> String {
    let mut out = String::new();

    line(&mut out, "NetHandle", &network.handle);
    if !network.start_address.is_empty() {
        line(&mut out, "NetRange", &format!("{} - {}", network.start_address, network.end_address));
    }
    line(&mut out, "NetName", &network.name);
    line(&mut out, "NetType", &network.network_type);
    line(&mut out, "Parent", &network.parent_handle);
    line(&mut out, "Country", &network.country);
    line(&mut out, "Status", &network.status.join(", "));
    event_line(&mut out, "RegDate", network.event("registration"));
    event_line(&mut out, "Updated", network.event("last changed"));

    if let Some(abuse) = network.entity_with_role("abuse").and_then(|e| e.vcard.as_ref()) {
        line(&mut out, "AbuseEmail", &abuse.email);
        line(&mut out, "AbusePhone", &abuse.telephone);
    }

    contacts(&mut out, &network.entities);
    out
}

/// Render an autonomous system registration
pub fn render_autnum(autnum: &Autnum) -> String {
    let mut out = String::new();

    line(&mut out, "ASHandle", &autnum.handle);
    line(&mut out, "ASNumber", &autnum.range_label().unwrap_or_default());
    line(&mut out, "ASName", &autnum.name);
    line(&mut out, "Country", &autnum.country);
    line(&mut out, "Status", &autnum.status.join(", "));
    event_line(&mut out, "RegDate", autnum.event("registration"));
    event_line(&mut out, "Updated", autnum.event("last changed"));

    if let Some(abuse) = autnum.entity_with_role("abuse").and_then(|e| e.vcard.as_ref()) {
        line(&mut out, "AbuseEmail", &abuse.email);
    }

    contacts(&mut out, &autnum.entities);
    out
}

/// Render a list of candidate RDAP servers
pub fn render_servers(query: &str, servers: &[Url]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RDAP servers for {}:", query);
    for server in servers {
        let _ = writeln!(out, "  {}", server);
    }
    out
}

pub fn print_domain(domain: &Domain) {
    print!("{}", render_domain(domain));
}

pub fn print_ip_network(network: &IpNetwork) {
    print!("{}", render_ip_network(network));
}

pub fn print_autnum(autnum: &Autnum) {
    print!("{}", render_autnum(autnum));
}

pub fn print_servers(query: &str, servers: &[Url]) {
    print!("{}", render_servers(query, servers));
}

fn contacts(out: &mut String, entities: &[Entity]) {
    for (role, prefix) in CONTACT_ROLES {
        let vcard = entities
            .iter()
            .find_map(|entity| entity.vcard_for_role(role));
        if let Some(vcard) = vcard {
            contact(out, prefix, vcard);
        }
    }
}

fn contact(out: &mut String, prefix: &str, vcard: &VCard) {
    line(out, &format!("{}Name", prefix), &vcard.full_name);
    line(out, &format!("{}Organization", prefix), &vcard.org);
    line(out, &format!("{}Street", prefix), &vcard.address.street_address);
    line(out, &format!("{}City", prefix), &vcard.address.locality);
    line(out, &format!("{}State", prefix), &vcard.address.region);
    line(out, &format!("{}PostalCode", prefix), &vcard.address.postal_code);
    line(out, &format!("{}Country", prefix), &vcard.address.country_name);
    line(out, &format!("{}Email", prefix), &vcard.email);
    line(out, &format!("{}Phone", prefix), &vcard.telephone);
}

// empty values are left out
fn line(out: &mut String, key: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{}: {}", key, value);
    }
}

fn event_line(out: &mut String, key: &str, event: Option<&Event>) {
    if let Some(event) = event {
        line(out, key, &event.event_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_domain_contacts() {
        let domain: Domain = serde_json::from_str(r#"{
            "handle": "D1", "ldhName": "EXAMPLE.COM",
            "events": [{"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"}],
            "entities": [
                {"roles": ["registrar"], "handle": "376",
                 "publicIds": [{"type": "IANA Registrar ID", "identifier": "376"}],
                 "vcardArray": ["vcard", [["fn", {}, "text", "RESERVED-Internet Assigned Numbers Authority"]]],
                 "entities": [{"roles": ["abuse"], "vcardArray": ["vcard", [["email", {}, "text", "abuse@iana.org"]]]}]},
                {"roles": ["registrant"],
                 "vcardArray": ["vcard", [["org", {}, "text", "IANA"],
                    ["adr", {}, "text", ["", "", "12025 Waterfront Dr", "Los Angeles", "CA", "90094", "US"]]]]}
            ]
        }"#)
        .unwrap();

        let text = render_domain(&domain);
        assert!(text.contains("DomainName: EXAMPLE.COM\n"));
        assert!(text.contains("CreatedDate: 1995-08-14T04:00:00Z\n"));
        assert!(text.contains("Registrar: RESERVED-Internet Assigned Numbers Authority\n"));
        assert!(text.contains("RegistrarIanaID: 376\n"));
        assert!(text.contains("RegistrarAbuseContactEmail: abuse@iana.org\n"));
        assert!(text.contains("RegistrantOrganization: IANA\n"));
        assert!(text.contains("RegistrantState: CA\n"));
        assert!(!text.contains("AdminOrganization"));
        assert!(!text.contains("UpdatedDate"));
    }

    #[test]
    fn test_render_servers() {
        let servers = vec![Url::parse("https://rdap.nic.io/").unwrap()];
        assert_eq!(render_servers("nic.io", &servers), "RDAP servers for nic.io:\n  https://rdap.nic.io/\n");
    }

    #[test]
    fn test_render_autnum() {
        let autnum: Autnum = serde_json::from_str(
            r#"{"handle": "AS15169", "startAutnum": 15169, "endAutnum": 15169, "name": "GOOGLE"}"#,
        )
        .unwrap();
        let text = render_autnum(&autnum);
        assert!(text.contains("ASNumber: AS15169\n"));
        assert!(text.contains("ASName: GOOGLE\n"));
    }
}
