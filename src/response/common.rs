//! Structures shared by all RDAP response objects (RFC 9083 section 4).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link to another resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    pub value: String,
    pub rel: String,
    pub href: String,
    pub hreflang: Vec<String>,
    pub title: String,
    pub media: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Information about the whole response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notice {
    pub title: String,
    #[serde(rename = "type")]
    pub notice_type: String,
    pub description: Vec<String>,
    pub links: Vec<Link>,
}

/// Information about the containing object. Same shape as a notice.
pub type Remark = Notice;

/// Something that happened (or will) to an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub event_action: String,
    pub event_actor: String,
    pub event_date: String,
    pub links: Vec<Link>,
}

impl Event {
    /// Parsed event date, if it is RFC 3339
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.event_date.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A public identifier such as an IANA registrar ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicId {
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

/// Find an event by action name (`registration`, `expiration`, ...)
pub fn find_event<'a>(events: &'a [Event], action: &str) -> Option<&'a Event> {
    events
        .iter()
        .find(|event| event.event_action.eq_ignore_ascii_case(action))
}
