//! In-memory property model of a single account.
//!
//! An [`Account`] is a plain value owned by the caller for one
//! read-modify-write cycle. It performs no I/O and no validation; both are
//! applied by [`AccountStore`](crate::AccountStore) around persistence.

mod property;
mod scope;

pub use property::{Property, PropertyCollection, PropertyName, VerificationStatus};
pub use scope::{map_scope, Scope};

use crate::error::{ProfileError, ProfileResult};

/// One attribute slot of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEntry {
    /// A scalar attribute.
    Single(Property),
    /// A collection attribute.
    Collection(PropertyCollection),
}

impl AccountEntry {
    /// Attribute name of the slot.
    #[must_use]
    pub const fn name(&self) -> PropertyName {
        match self {
            Self::Single(property) => property.name,
            Self::Collection(collection) => collection.name(),
        }
    }
}

/// The attributes of one owner, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    owner: String,
    entries: Vec<AccountEntry>,
}

impl Account {
    /// Creates an empty account for `owner`.
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Builds an account from a flat property list.
    ///
    /// Scalar names replace earlier values; collection names append.
    #[must_use]
    pub fn from_properties(owner: impl Into<String>, properties: Vec<Property>) -> Self {
        let mut account = Self::new(owner);
        for property in properties {
            if property.name.is_collection() {
                account.push_to_collection(property);
            } else {
                account.put_scalar(property);
            }
        }
        account
    }

    /// Identity of the owning user.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the scalar property `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::PropertyNotFound`] if the property is absent or
    /// `name` is a collection attribute.
    pub fn get_property(&self, name: PropertyName) -> ProfileResult<&Property> {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                AccountEntry::Single(property) if property.name == name => Some(property),
                _ => None,
            })
            .ok_or_else(|| ProfileError::PropertyNotFound(name.to_string()))
    }

    /// Returns the scalar property `name`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::PropertyNotFound`] if the property is absent.
    pub fn get_property_mut(&mut self, name: PropertyName) -> ProfileResult<&mut Property> {
        self.entries
            .iter_mut()
            .find_map(|entry| match entry {
                AccountEntry::Single(property) if property.name == name => Some(property),
                _ => None,
            })
            .ok_or_else(|| ProfileError::PropertyNotFound(name.to_string()))
    }

    /// Inserts or replaces the scalar property `name`.
    ///
    /// A replaced property keeps its position in the attribute order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotAScalar`] if `name` is a collection attribute.
    pub fn set_property(
        &mut self,
        name: PropertyName,
        value: impl Into<String>,
        scope: Scope,
        verified: VerificationStatus,
    ) -> ProfileResult<()> {
        if name.is_collection() {
            return Err(ProfileError::NotAScalar(name.to_string()));
        }
        self.put_scalar(Property::new(name, value, scope).with_verified(verified));
        Ok(())
    }

    /// Returns the collection `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::PropertyNotFound`] if no collection `name` exists.
    pub fn get_property_collection(&self, name: PropertyName) -> ProfileResult<&PropertyCollection> {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                AccountEntry::Collection(collection) if collection.name() == name => {
                    Some(collection)
                }
                _ => None,
            })
            .ok_or_else(|| ProfileError::PropertyNotFound(name.to_string()))
    }

    /// Returns the collection `name`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::PropertyNotFound`] if no collection `name` exists.
    pub fn get_property_collection_mut(
        &mut self,
        name: PropertyName,
    ) -> ProfileResult<&mut PropertyCollection> {
        self.entries
            .iter_mut()
            .find_map(|entry| match entry {
                AccountEntry::Collection(collection) if collection.name() == name => {
                    Some(collection)
                }
                _ => None,
            })
            .ok_or_else(|| ProfileError::PropertyNotFound(name.to_string()))
    }

    /// Appends `property` to the collection named by `property.name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotACollection`] for scalar attribute names.
    pub fn add_to_collection(&mut self, property: Property) -> ProfileResult<()> {
        if !property.name.is_collection() {
            return Err(ProfileError::NotACollection(property.name.to_string()));
        }
        self.push_to_collection(property);
        Ok(())
    }

    /// All properties in attribute insertion order, collections expanded in place.
    #[must_use]
    pub fn all_properties(&self) -> Vec<Property> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                AccountEntry::Single(property) => out.push(property.clone()),
                AccountEntry::Collection(collection) => out.extend(collection.iter().cloned()),
            }
        }
        out
    }

    /// [`all_properties`](Self::all_properties) restricted to a scope and/or status.
    #[must_use]
    pub fn filtered_properties(
        &self,
        scope: Option<Scope>,
        verified: Option<VerificationStatus>,
    ) -> Vec<Property> {
        self.all_properties()
            .into_iter()
            .filter(|property| scope.is_none_or(|scope| property.scope == scope))
            .filter(|property| verified.is_none_or(|verified| property.verified == verified))
            .collect()
    }

    /// Attribute slots in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[AccountEntry] {
        &self.entries
    }

    fn put_scalar(&mut self, property: Property) {
        let slot = self.entries.iter_mut().find_map(|entry| match entry {
            AccountEntry::Single(existing) if existing.name == property.name => Some(existing),
            _ => None,
        });
        match slot {
            Some(existing) => *existing = property,
            None => self.entries.push(AccountEntry::Single(property)),
        }
    }

    fn push_to_collection(&mut self, property: Property) {
        let slot = self.entries.iter_mut().find_map(|entry| match entry {
            AccountEntry::Collection(existing) if existing.name() == property.name => {
                Some(existing)
            }
            _ => None,
        });
        match slot {
            Some(existing) => existing.add(property),
            None => {
                let mut collection = PropertyCollection::new(property.name);
                collection.add(property);
                self.entries.push(AccountEntry::Collection(collection));
            }
        }
    }
}
