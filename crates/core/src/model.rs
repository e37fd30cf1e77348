//! Ledger entities: locations, items, per-location quantities and scan events.
//!
//! Serde names follow the snapshot bundle format (`upc`, `additional_info`,
//! `item_upc`, `workstation_id`), so these types are read and written directly
//! by the bundle layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LedgerError;
use crate::id::{ItemCode, LocationId, WorkstationId};
use crate::time::{Timestamp, serde_lenient};

/// A named place where items are counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(with = "serde_lenient")]
    pub created_at: Timestamp,
}

/// Descriptive record for a scannable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "upc")]
    pub code: ItemCode,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "additional_info", default, with = "attributes_blob")]
    pub attributes: Attributes,
    #[serde(with = "serde_lenient")]
    pub created_at: Timestamp,
    #[serde(with = "serde_lenient")]
    pub updated_at: Timestamp,
}

impl Item {
    /// An item first seen by a scan: no description, no attributes.
    pub fn first_seen(code: ItemCode, at: Timestamp) -> Self {
        Self {
            code,
            description: String::new(),
            attributes: Attributes::default(),
            created_at: at,
            updated_at: at,
        }
    }
}

/// Quantity of one item at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "item_upc")]
    pub item_code: ItemCode,
    pub location_id: LocationId,
    pub quantity: i64,
    #[serde(with = "serde_lenient")]
    pub last_scanned: Timestamp,
}

/// Append-only audit entry for one quantity-changing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    #[serde(rename = "item_upc")]
    pub item_code: ItemCode,
    pub location_id: LocationId,
    pub action: ScanAction,
    pub quantity_change: i64,
    #[serde(with = "serde_lenient")]
    pub scanned_at: Timestamp,
    #[serde(rename = "workstation_id")]
    pub workstation: WorkstationId,
}

impl ScanEvent {
    pub fn scan(
        item_code: ItemCode,
        location_id: LocationId,
        quantity_change: i64,
        scanned_at: Timestamp,
        workstation: WorkstationId,
    ) -> Self {
        Self {
            item_code,
            location_id,
            action: ScanAction::Scan,
            quantity_change,
            scanned_at,
            workstation,
        }
    }
}

/// Tag of a scan event. Unknown tags from other workstations are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScanAction {
    Scan,
    Other(String),
}

impl ScanAction {
    pub fn as_str(&self) -> &str {
        match self {
            ScanAction::Scan => "scan",
            ScanAction::Other(tag) => tag,
        }
    }
}

impl From<String> for ScanAction {
    fn from(value: String) -> Self {
        if value == "scan" {
            ScanAction::Scan
        } else {
            ScanAction::Other(value)
        }
    }
}

impl From<ScanAction> for String {
    fn from(value: ScanAction) -> Self {
        match value {
            ScanAction::Scan => "scan".to_string(),
            ScanAction::Other(tag) => tag,
        }
    }
}

/// Open-ended string attributes of an item (brand, size, lookup results...).
///
/// Reconciliation treats the map as one opaque value: it is replaced whole,
/// never merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as a JSON object string (the form kept in storage and bundles).
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| String::from("{}"))
    }

    /// Decode from a JSON object string.
    ///
    /// Blank input and `null` decode to an empty map; non-string values are
    /// kept as their JSON text.
    pub fn from_json(raw: &str) -> Result<Self, LedgerError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| LedgerError::validation(format!("attributes are not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, LedgerError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map) => Ok(Self(
                map.into_iter()
                    .map(|(key, value)| {
                        let text = match value {
                            serde_json::Value::String(s) => s,
                            serde_json::Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (key, text)
                    })
                    .collect(),
            )),
            other => Err(LedgerError::validation(format!(
                "attributes must be a JSON object, found {other}"
            ))),
        }
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `additional_info` is carried as a string holding a JSON object.
mod attributes_blob {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Attributes;

    pub fn serialize<S: Serializer>(attributes: &Attributes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&attributes.to_json())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Attributes, D::Error> {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Ok(Attributes::default()),
            Some(serde_json::Value::String(raw)) => {
                Attributes::from_json(&raw).map_err(serde::de::Error::custom)
            }
            Some(inline) => Attributes::from_value(inline).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn ts(raw: &str) -> Timestamp {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn item_uses_bundle_field_names() {
        let mut attributes = Attributes::new();
        attributes.insert("brand", "Acme");
        let item = Item {
            code: ItemCode::parse("012345678905").unwrap(),
            description: "Widget".to_string(),
            attributes,
            created_at: ts("2024-01-01T00:00:00Z"),
            updated_at: ts("2024-01-02T00:00:00Z"),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["upc"], "012345678905");
        assert_eq!(json["additional_info"], "{\"brand\":\"Acme\"}");
        assert_eq!(json["updated_at"], "2024-01-02T00:00:00.000000Z");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn legacy_item_rows_are_read_leniently() {
        let raw = r#"{
            "upc": "4006381333931",
            "description": null,
            "additional_info": "{\"size\": 12, \"color\": \"red\", \"note\": null}",
            "created_at": "2024-03-05T10:11:12.345678",
            "updated_at": "2024-03-05T10:11:12.345678"
        }"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.attributes.get("size"), Some("12"));
        assert_eq!(item.attributes.get("color"), Some("red"));
        assert_eq!(item.attributes.get("note"), Some(""));

        let missing: Item = serde_json::from_str(
            r#"{"upc": "1", "additional_info": null,
                "created_at": "2024-01-01", "updated_at": "2024-01-01"}"#,
        )
        .unwrap();
        assert!(missing.attributes.is_empty());
    }

    #[test]
    fn unknown_fields_and_actions_are_tolerated() {
        let raw = r#"{
            "id": 17,
            "item_upc": "1",
            "location_id": "loc",
            "action": "recount",
            "quantity_change": -2,
            "scanned_at": "2024-01-01T08:00:00",
            "workstation_id": "DESK-7"
        }"#;
        let event: ScanEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.action, ScanAction::Other("recount".to_string()));
        assert_eq!(event.action.as_str(), "recount");
        assert_eq!(event.quantity_change, -2);
    }

    #[test]
    fn attributes_reject_non_objects() {
        assert!(Attributes::from_json("[1, 2]").is_err());
        assert!(Attributes::from_json("null").unwrap().is_empty());
        assert!(Attributes::from_json("").unwrap().is_empty());
    }
}
