//! Entity: an organisation or person attached to another object.

use super::common::{Event, Link, Notice, PublicId, Remark};
use super::network::{Autnum, IpNetwork};
use crate::jcard::{deserialize_vcard, VCard};
use serde::Deserialize;

/// Entity (RFC 9083 section 5.1). Also a topmost response object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    pub lang: String,
    pub rdap_conformance: Vec<String>,
    pub object_class_name: String,
    pub notices: Vec<Notice>,

    pub handle: String,
    #[serde(rename = "vcardArray", deserialize_with = "deserialize_vcard")]
    pub vcard: Option<VCard>,
    pub roles: Vec<String>,
    pub public_ids: Vec<PublicId>,
    pub entities: Vec<Entity>,
    pub remarks: Vec<Remark>,
    pub links: Vec<Link>,
    pub events: Vec<Event>,
    pub as_event_actor: Vec<Event>,
    pub status: Vec<String>,
    pub port43: String,
    pub networks: Vec<IpNetwork>,
    pub autnums: Vec<Autnum>,
}

impl Entity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// vCard of this entity or of the first nested entity holding `role`
    pub fn vcard_for_role(&self, role: &str) -> Option<&VCard> {
        if self.has_role(role) {
            if let Some(vcard) = &self.vcard {
                return Some(vcard);
            }
        }
        self.entities
            .iter()
            .find_map(|entity| entity.vcard_for_role(role))
    }

    /// Display name: the vCard full name, else the handle
    pub fn display_name(&self) -> &str {
        match &self.vcard {
            Some(vcard) if !vcard.full_name.is_empty() => &vcard.full_name,
            _ => &self.handle,
        }
    }
}

/// First entity (searching nested entities too) holding `role`
pub fn find_entity<'a>(entities: &'a [Entity], role: &str) -> Option<&'a Entity> {
    entities.iter().find(|e| e.has_role(role)).or_else(|| {
        entities
            .iter()
            .find_map(|e| find_entity(&e.entities, role))
    })
}
