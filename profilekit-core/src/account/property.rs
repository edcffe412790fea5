use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::scope::Scope;

/// Catalog of attribute names an account can hold.
///
/// Every name is either a scalar attribute (exactly one [`Property`]) or a
/// collection attribute (any number of properties, see
/// [`PropertyName::is_collection`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
    Serialize,
    Deserialize,
)]
pub enum PropertyName {
    /// Display name shown across the instance.
    #[strum(serialize = "displayname")]
    #[serde(rename = "displayname")]
    DisplayName,
    /// Postal address.
    #[strum(serialize = "address")]
    #[serde(rename = "address")]
    Address,
    /// Personal website, `http` or `https` only.
    #[strum(serialize = "website")]
    #[serde(rename = "website")]
    Website,
    /// Primary email address.
    #[strum(serialize = "email")]
    #[serde(rename = "email")]
    Email,
    /// Avatar marker. Carries no value; its presence is the signal.
    #[strum(serialize = "avatar")]
    #[serde(rename = "avatar")]
    Avatar,
    /// Phone number in international form.
    #[strum(serialize = "phone")]
    #[serde(rename = "phone")]
    Phone,
    /// Social media handle.
    #[strum(serialize = "twitter")]
    #[serde(rename = "twitter")]
    Twitter,
    /// Additional email addresses (collection).
    #[strum(serialize = "additional_mail")]
    #[serde(rename = "additional_mail")]
    AdditionalMail,
}

impl PropertyName {
    /// Returns `true` for attributes that hold a list of properties.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::AdditionalMail)
    }

    /// Returns the stored attribute key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns `true` for attributes the external lookup process can verify.
    #[must_use]
    pub const fn is_lookup_verifiable(self) -> bool {
        matches!(self, Self::Website | Self::Twitter | Self::Email)
    }
}

/// Trust state of a property as attested by the external lookup process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum VerificationStatus {
    /// Initial state; nothing has been attested.
    #[default]
    NotVerified = 0,
    /// A re-verification request has been scheduled and not yet resolved.
    InProgress = 1,
    /// Confirmed by the external lookup process.
    Verified = 2,
}

impl VerificationStatus {
    /// Returns the stored integer code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Maps a stored integer code back to a status.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::NotVerified),
            1 => Some(Self::InProgress),
            2 => Some(Self::Verified),
            _ => None,
        }
    }
}

impl Serialize for VerificationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for VerificationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older records store the code as a numeric string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Text(String),
        }

        let code = match Raw::deserialize(deserializer)? {
            Raw::Code(code) => code,
            Raw::Text(text) => text.trim().parse::<u8>().map_err(|_| {
                serde::de::Error::custom(format!("invalid verification status {text:?}"))
            })?,
        };
        Self::from_u8(code).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid verification status {code}"))
        })
    }
}

/// A single attribute value with its privacy and trust metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Attribute this value belongs to.
    pub name: PropertyName,
    /// The value itself; always empty for [`PropertyName::Avatar`].
    pub value: String,
    /// Visibility of the value.
    pub scope: Scope,
    /// Trust state issued by the lookup process.
    pub verified: VerificationStatus,
    /// Opaque proof material attached by the lookup process.
    pub verification_data: String,
}

impl Property {
    /// Creates an unverified property without verification data.
    #[must_use]
    pub fn new(name: PropertyName, value: impl Into<String>, scope: Scope) -> Self {
        Self {
            name,
            value: value.into(),
            scope,
            verified: VerificationStatus::NotVerified,
            verification_data: String::new(),
        }
    }

    /// Sets the verification status, builder style.
    #[must_use]
    pub const fn with_verified(mut self, verified: VerificationStatus) -> Self {
        self.verified = verified;
        self
    }

    /// Sets the verification data, builder style.
    #[must_use]
    pub fn with_verification_data(mut self, data: impl Into<String>) -> Self {
        self.verification_data = data.into();
        self
    }
}

/// Ordered list of properties sharing one collection attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCollection {
    name: PropertyName,
    properties: Vec<Property>,
}

impl PropertyCollection {
    /// Creates an empty collection for `name`.
    #[must_use]
    pub const fn new(name: PropertyName) -> Self {
        Self {
            name,
            properties: Vec::new(),
        }
    }

    /// Attribute name shared by every entry.
    #[must_use]
    pub const fn name(&self) -> PropertyName {
        self.name
    }

    /// Appends `property`, forcing its name to the collection's name.
    pub fn add(&mut self, mut property: Property) {
        property.name = self.name;
        self.properties.push(property);
    }

    /// Removes every entry holding `value`. Returns whether anything was removed.
    pub fn remove_by_value(&mut self, value: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|property| property.value != value);
        before != self.properties.len()
    }

    /// Returns the first entry holding `value`.
    #[must_use]
    pub fn get_by_value(&self, value: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.value == value)
    }

    /// Returns the first entry holding `value`, mutably.
    pub fn get_by_value_mut(&mut self, value: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|property| property.value == value)
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyCollection {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_property_name_roundtrip() {
        for name in PropertyName::iter() {
            let parsed: PropertyName = name.as_str().parse().unwrap();
            assert_eq!(parsed, name);
            let serialized = serde_json::to_string(&name).unwrap();
            assert_eq!(serialized, format!("\"{}\"", name.as_str()));
        }
    }

    #[test]
    fn test_only_additional_mail_is_collection() {
        let collections: Vec<_> = PropertyName::iter()
            .filter(|name| name.is_collection())
            .collect();
        assert_eq!(collections, vec![PropertyName::AdditionalMail]);
    }

    #[test]
    fn test_verification_status_accepts_numeric_strings() {
        let status: VerificationStatus = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(status, VerificationStatus::Verified);
        let status: VerificationStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, VerificationStatus::InProgress);
        assert!(serde_json::from_str::<VerificationStatus>("7").is_err());
        assert!(serde_json::from_str::<VerificationStatus>("\"yes\"").is_err());
    }

    #[test]
    fn test_verification_status_display() {
        assert_eq!(VerificationStatus::NotVerified.to_string(), "not-verified");
        assert_eq!(VerificationStatus::InProgress.to_string(), "in-progress");
    }

    #[test]
    fn test_collection_remove_by_value() {
        let mut collection = PropertyCollection::new(PropertyName::AdditionalMail);
        collection.add(Property::new(PropertyName::Email, "a@example.com", Scope::Local));
        collection.add(Property::new(
            PropertyName::AdditionalMail,
            "b@example.com",
            Scope::Local,
        ));
        // Name is forced to the collection's.
        assert!(collection
            .iter()
            .all(|property| property.name == PropertyName::AdditionalMail));

        assert!(collection.remove_by_value("a@example.com"));
        assert!(!collection.remove_by_value("a@example.com"));
        assert_eq!(collection.len(), 1);
        assert!(collection.get_by_value("b@example.com").is_some());
    }
}
