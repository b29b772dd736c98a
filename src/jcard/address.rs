//! Postal address reconstruction for the jCard `adr` property.

use super::property::Component;
use serde::{Deserialize, Serialize};

/// A postal address (RFC 6350 section 6.3.1)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Free-text label exactly as the server sent it
    pub label: String,
    pub post_office_box: String,
    /// Apartment or suite number
    pub extended_address: String,
    pub street_address: String,
    /// City
    pub locality: String,
    /// State or province
    pub region: String,
    pub postal_code: String,
    pub country_name: String,
}

impl Address {
    /// Decode the 7-component structured form:
    /// PO box, extended, street, locality, region, postal code, country.
    ///
    /// Missing trailing components are empty. Returns `None` when every
    /// component is empty.
    pub fn from_components(components: &[Component]) -> Option<Self> {
        let part = |i: usize| {
            components
                .get(i)
                .map(|c| c.to_text().trim().to_string())
                .unwrap_or_default()
        };

        let address = Self {
            label: String::new(),
            post_office_box: part(0),
            extended_address: part(1),
            street_address: part(2),
            locality: part(3),
            region: part(4),
            postal_code: part(5),
            country_name: part(6),
        };

        if address.has_fields() {
            Some(address)
        } else {
            None
        }
    }

    /// Best-effort decode of a newline-separated label.
    ///
    /// Lines run from most to least specific, so fields are assigned from the
    /// last line upward: country, postal code, region, locality, then street
    /// and extended lines, with anything above that treated as a PO box.
    /// Addresses that do not follow this layout come out wrong; the label is
    /// always kept verbatim so nothing is lost.
    pub fn from_label(label: &str) -> Self {
        let lines: Vec<&str> = label
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut address = Self {
            label: label.to_string(),
            ..Self::default()
        };
        let mut po_box_lines: Vec<&str> = Vec::new();

        for (position, line) in lines.iter().rev().enumerate() {
            let upper = line.to_uppercase();
            match position {
                0 => address.country_name = line.to_string(),
                1 => address.postal_code = line.to_string(),
                2 => address.region = line.to_string(),
                3 => address.locality = line.to_string(),
                4 => {
                    if mentions_po_box(&upper) {
                        po_box_lines.push(line);
                    } else if upper.starts_with("SUITE") || upper.starts_with("APT") {
                        address.extended_address = line.to_string();
                    } else {
                        address.street_address = line.to_string();
                    }
                }
                5 => {
                    if mentions_po_box(&upper) {
                        po_box_lines.push(line);
                    } else if !address.extended_address.is_empty() {
                        address.street_address = line.to_string();
                    } else {
                        address.extended_address = line.to_string();
                    }
                }
                _ => po_box_lines.push(line),
            }
        }

        // collected bottom-up
        po_box_lines.reverse();
        address.post_office_box = po_box_lines.join(", ");

        address
    }

    /// Whether any fielded component (not the label) is set
    pub fn has_fields(&self) -> bool {
        [
            &self.post_office_box,
            &self.extended_address,
            &self.street_address,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country_name,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && !self.has_fields()
    }

    /// Single-line rendering of the fielded components
    pub fn one_line(&self) -> String {
        [
            &self.post_office_box,
            &self.extended_address,
            &self.street_address,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country_name,
        ]
        .iter()
        .filter(|field| !field.is_empty())
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// `PO` or `P.O` anywhere in the uppercased line (`PO BOX 12`, `P.O.Box 12`, `POBox 12`)
fn mentions_po_box(upper: &str) -> bool {
    upper.contains("PO") || upper.contains("P.O")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(parts: &[&str]) -> Vec<Component> {
        parts.iter().map(|s| Component::Text(s.to_string())).collect()
    }

    #[test]
    fn test_structured_full() {
        let parts = text(&["", "Suite D2-630", "2875 Laurier", "Quebec", "QC", "G1V 2M2", "Canada"]);
        let first = Address::from_components(&parts).unwrap();
        let second = Address::from_components(&parts).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.extended_address, "Suite D2-630");
        assert_eq!(first.street_address, "2875 Laurier");
        assert_eq!(first.country_name, "Canada");
        assert!(first.label.is_empty());
    }

    #[test]
    fn test_structured_short_and_empty() {
        let short = Address::from_components(&text(&["PO Box 1", "", "1 Main St"])).unwrap();
        assert_eq!(short.post_office_box, "PO Box 1");
        assert_eq!(short.street_address, "1 Main St");
        assert!(short.country_name.is_empty());

        assert!(Address::from_components(&text(&["", "", "", "", "", "", ""])).is_none());
        assert!(Address::from_components(&[]).is_none());
    }

    #[test]
    fn test_label_six_lines() {
        let label = "123 Maple Ave\nSuite 901\nVancouver\nBC\nA1B 2C9\nCanada";
        let address = Address::from_label(label);
        assert_eq!(address.label, label);
        assert_eq!(address.street_address, "123 Maple Ave");
        assert_eq!(address.extended_address, "Suite 901");
        assert_eq!(address.locality, "Vancouver");
        assert_eq!(address.region, "BC");
        assert_eq!(address.postal_code, "A1B 2C9");
        assert_eq!(address.country_name, "Canada");
        assert!(address.post_office_box.is_empty());
    }

    #[test]
    fn test_label_five_lines_street() {
        let address = Address::from_label("1 Infinite Loop\nCupertino\nCA\n95014\nUS");
        assert_eq!(address.street_address, "1 Infinite Loop");
        assert_eq!(address.locality, "Cupertino");
        assert!(address.extended_address.is_empty());
    }

    #[test]
    fn test_label_po_box_override() {
        let address = Address::from_label("P.O. Box 1234\nAnytown\nNY\n10001\nUnited States");
        assert_eq!(address.post_office_box, "P.O. Box 1234");
        assert!(address.street_address.is_empty());

        let address = Address::from_label("POBox 12\nWinnipeg\nMB\nR3C 0A1\nCanada");
        assert_eq!(address.post_office_box, "POBox 12");
        assert!(address.street_address.is_empty());

        let address = Address::from_label("P.O.Box 12\nSuite 4\nWinnipeg\nMB\nR3C 0A1\nCanada");
        assert_eq!(address.post_office_box, "P.O.Box 12");
        assert_eq!(address.extended_address, "Suite 4");

        // plain substring match, so a street name containing PO counts too
        let address = Address::from_label("12 Portage Ave\nWinnipeg\nMB\nR3C 0A1\nCanada");
        assert_eq!(address.post_office_box, "12 Portage Ave");
        assert!(address.street_address.is_empty());
    }

    #[test]
    fn test_label_extended_without_suite_prefix() {
        let address = Address::from_label("Building 7\n500 Main St\nSpringfield\nIL\n62701\nUS");
        assert_eq!(address.street_address, "500 Main St");
        assert_eq!(address.extended_address, "Building 7");
    }

    #[test]
    fn test_label_extra_lines_become_po_box() {
        let address = Address::from_label("Attn: Legal\nPO Box 9\n10 Downing St\nSuite 1\nLondon\nENG\nSW1A 2AA\nUK");
        assert_eq!(address.extended_address, "Suite 1");
        assert_eq!(address.street_address, "10 Downing St");
        assert_eq!(address.post_office_box, "Attn: Legal, PO Box 9");
    }

    #[test]
    fn test_label_few_lines() {
        let address = Address::from_label("Canada");
        assert_eq!(address.country_name, "Canada");
        assert!(address.postal_code.is_empty());
        assert!(address.locality.is_empty());

        let address = Address::from_label("Berlin\r\n\r\nDE\n");
        assert_eq!(address.postal_code, "Berlin");
        assert_eq!(address.country_name, "DE");
        assert_eq!(address.label, "Berlin\r\n\r\nDE\n");
    }

    #[test]
    fn test_one_line() {
        let address = Address::from_label("1 Infinite Loop\nCupertino\nCA\n95014\nUS");
        assert_eq!(address.one_line(), "1 Infinite Loop, Cupertino, CA, 95014, US");
        assert!(Address::default().is_empty());
    }
}
