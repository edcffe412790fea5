use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::{InvalidValueKind, ProfileError, ProfileResult};

/// Legacy encodings written before scopes were versioned.
const LEGACY_PRIVATE: &str = "private";
const LEGACY_CONTACTS: &str = "contacts";
const LEGACY_PUBLIC: &str = "public";

/// Visibility tier attached to a property value.
///
/// Stored as `v2-*` strings. Records written by older releases carry the
/// legacy `private`/`contacts`/`public` encoding, which [`map_scope`] migrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
pub enum Scope {
    /// Only visible to the owner.
    #[strum(serialize = "v2-private")]
    Private,
    /// Visible to users of the same instance.
    #[strum(serialize = "v2-local")]
    Local,
    /// Shared with trusted federated servers.
    #[strum(serialize = "v2-federated")]
    Federated,
    /// Published to the public lookup directory.
    #[strum(serialize = "v2-published")]
    Published,
}

/// Maps a stored scope string onto the current encoding.
///
/// Current values map to themselves and unrecognized strings are returned
/// unchanged, so `map_scope(map_scope(s)) == map_scope(s)` for every `s`.
#[must_use]
pub fn map_scope(raw: &str) -> &str {
    match raw {
        LEGACY_PRIVATE | "" => "v2-local",
        LEGACY_CONTACTS => "v2-federated",
        LEGACY_PUBLIC => "v2-published",
        other => other,
    }
}

impl Scope {
    /// Parses a stored or user-supplied scope, migrating legacy values.
    ///
    /// Unrecognized strings are rejected in strict mode and floored to
    /// [`Scope::Local`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidValue`] with [`InvalidValueKind::Scope`]
    /// for an unrecognized scope when `strict` is set.
    pub fn parse(raw: &str, strict: bool) -> ProfileResult<Self> {
        match map_scope(raw).parse::<Self>() {
            Ok(scope) => Ok(scope),
            Err(_) if strict => Err(ProfileError::InvalidValue(InvalidValueKind::Scope)),
            Err(_) => Ok(Self::Local),
        }
    }

    /// Returns the stored encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "v2-private",
            Self::Local => "v2-local",
            Self::Federated => "v2-federated",
            Self::Published => "v2-published",
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // Stored data is read permissively; unknown scopes are floored.
        Self::parse(&raw, false).map_err(serde::de::Error::custom)
    }
}
