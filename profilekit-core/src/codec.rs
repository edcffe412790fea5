//! Encoding between property lists and the stored account blob.
//!
//! The blob is a JSON object keyed by attribute name. Scalar attributes map
//! to `{value, scope, verified, verificationData}`, collection attributes to
//! an array of such objects. The avatar marker is stored without `value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::account::{Property, PropertyName, Scope, VerificationStatus};
use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Serialize, Deserialize)]
struct StoredProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    verified: VerificationStatus,
    #[serde(default, rename = "verificationData")]
    verification_data: String,
}

impl StoredProperty {
    fn from_property(property: &Property) -> Self {
        let value = (property.name != PropertyName::Avatar).then(|| property.value.clone());
        Self {
            value,
            scope: Some(property.scope.as_str().to_string()),
            verified: property.verified,
            verification_data: property.verification_data.clone(),
        }
    }

    fn into_property(self, name: PropertyName) -> Property {
        let value = if name == PropertyName::Avatar {
            String::new()
        } else {
            self.value.unwrap_or_default()
        };
        // Stored data is read permissively, which never fails.
        let scope = Scope::parse(self.scope.as_deref().unwrap_or_default(), false)
            .unwrap_or(Scope::Local);
        Property {
            name,
            value,
            scope,
            verified: self.verified,
            verification_data: self.verification_data,
        }
    }
}

/// Encodes `properties` into the stored blob.
///
/// Attribute groups appear once each; collection entries keep their order.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if the blob cannot be rendered.
pub fn encode(properties: &[Property]) -> StorageResult<String> {
    let mut blob = Map::new();
    for property in properties {
        let stored = serde_json::to_value(StoredProperty::from_property(property))
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let key = property.name.as_str().to_string();
        if property.name.is_collection() {
            let slot = blob
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(entries) = slot {
                entries.push(stored);
            }
        } else {
            blob.insert(key, stored);
        }
    }
    serde_json::to_string(&Value::Object(blob))
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decodes a stored blob back into a property list.
///
/// Returns `None` for a blob that cannot be parsed; the failure is logged
/// with the owner so the record can be repaired. Unknown attribute names are
/// skipped.
#[must_use]
pub fn decode(blob: &str, owner: &str) -> Option<Vec<Property>> {
    match try_decode(blob) {
        Ok(properties) => Some(properties),
        Err(err) => {
            tracing::error!(owner, error = %err, "unable to decode stored account data");
            None
        }
    }
}

fn try_decode(blob: &str) -> StorageResult<Vec<Property>> {
    let map: Map<String, Value> =
        serde_json::from_str(blob).map_err(|err| StorageError::Serialization(err.to_string()))?;
    let mut properties = Vec::new();
    for (key, raw) in map {
        let Ok(name) = key.parse::<PropertyName>() else {
            tracing::warn!(attribute = %key, "skipping unknown stored attribute");
            continue;
        };
        match (name.is_collection(), raw) {
            (true, Value::Array(entries)) => {
                for entry in entries {
                    properties.push(decode_entry(name, entry)?);
                }
            }
            (_, raw @ Value::Object(_)) => properties.push(decode_entry(name, raw)?),
            (_, other) => {
                return Err(StorageError::Serialization(format!(
                    "unexpected shape for {name}: {other}"
                )));
            }
        }
    }
    Ok(properties)
}

fn decode_entry(name: PropertyName, raw: Value) -> StorageResult<Property> {
    let stored: StoredProperty = serde_json::from_value(raw)
        .map_err(|err| StorageError::Serialization(format!("{name}: {err}")))?;
    Ok(stored.into_property(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn grouped(properties: &[Property]) -> BTreeMap<PropertyName, Vec<Property>> {
        let mut groups: BTreeMap<PropertyName, Vec<Property>> = BTreeMap::new();
        for property in properties {
            groups.entry(property.name).or_default().push(property.clone());
        }
        groups
    }

    fn sample() -> Vec<Property> {
        vec![
            Property::new(PropertyName::DisplayName, "Alice", Scope::Federated),
            Property::new(PropertyName::Email, "alice@example.com", Scope::Federated)
                .with_verified(VerificationStatus::InProgress),
            Property::new(PropertyName::Avatar, "", Scope::Local),
            Property::new(PropertyName::Website, "https://alice.example", Scope::Published)
                .with_verified(VerificationStatus::Verified)
                .with_verification_data("proof-123"),
            Property::new(PropertyName::AdditionalMail, "z@example.com", Scope::Local),
            Property::new(PropertyName::AdditionalMail, "a@example.com", Scope::Private),
        ]
    }

    #[test]
    fn test_roundtrip_preserves_groups_and_collection_order() {
        let properties = sample();
        let blob = encode(&properties).unwrap();
        let decoded = decode(&blob, "alice").unwrap();
        assert_eq!(grouped(&decoded), grouped(&properties));

        let mails: Vec<_> = decoded
            .iter()
            .filter(|property| property.name == PropertyName::AdditionalMail)
            .map(|property| property.value.as_str())
            .collect();
        assert_eq!(mails, vec!["z@example.com", "a@example.com"]);
    }

    #[test]
    fn test_encoded_shape() {
        let blob = encode(&sample()).unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["displayname"]["value"], "Alice");
        assert_eq!(value["displayname"]["scope"], "v2-federated");
        assert_eq!(value["email"]["verified"], 1);
        assert_eq!(value["website"]["verificationData"], "proof-123");
        assert!(value["avatar"].get("value").is_none());
        assert!(value["displayname"].get("name").is_none());
        assert_eq!(value["additional_mail"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_decode_invalid_returns_none() {
        assert!(decode("{not json", "alice").is_none());
        assert!(decode("[1, 2]", "alice").is_none());
    }

    #[test]
    fn test_decode_fills_missing_fields_and_migrates_scope() {
        let blob = r#"{
            "displayname": {"value": "Alice", "scope": "contacts"},
            "phone": {"value": "+14155552671", "scope": "private", "verified": "2"},
            "address": {"value": "Main St"}
        }"#;
        let decoded = decode(blob, "alice").unwrap();
        let by_name = grouped(&decoded);

        let display = &by_name[&PropertyName::DisplayName][0];
        assert_eq!(display.scope, Scope::Federated);
        assert_eq!(display.verified, VerificationStatus::NotVerified);
        assert_eq!(display.verification_data, "");

        let phone = &by_name[&PropertyName::Phone][0];
        assert_eq!(phone.scope, Scope::Local);
        assert_eq!(phone.verified, VerificationStatus::Verified);

        assert_eq!(by_name[&PropertyName::Address][0].scope, Scope::Local);
    }

    #[test]
    fn test_decode_skips_unknown_attributes() {
        let blob = r#"{"fax": {"value": "123"}, "twitter": {"value": "@alice", "scope": "v2-local"}}"#;
        let decoded = decode(blob, "alice").unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, PropertyName::Twitter);
    }

    #[test]
    fn test_decode_empty_object() {
        assert_eq!(decode("{}", "alice"), Some(Vec::new()));
    }
}
