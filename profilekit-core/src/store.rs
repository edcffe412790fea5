//! Account store: read, save and delete orchestration over the storage tables.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::account::{Account, Property, PropertyName, Scope, VerificationStatus};
use crate::codec;
use crate::config::ProfileConfig;
use crate::error::ProfileResult;
use crate::events::{AccountUpdatedEvent, EventBus, ACCOUNT_UPDATED_EVENT};
use crate::identity::UserIdentity;
use crate::jobs::JobScheduler;
use crate::phone::{LibPhoneNumber, PhoneNormalizer};
use crate::search;
use crate::storage::{AccountStorage, IndexRow};
use crate::validation::{sanitize_properties, ValidationContext};
use crate::verification::track_changes;

/// Orchestrates account reads and writes across the blob and flattened tables.
///
/// The store holds no per-owner state; every call reads from storage.
pub struct AccountStore {
    storage: Arc<dyn AccountStorage>,
    scheduler: Arc<dyn JobScheduler>,
    events: Arc<dyn EventBus>,
    phone: Arc<dyn PhoneNormalizer>,
    config: ProfileConfig,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AccountStore {
    /// Creates a store that normalizes phone numbers with [`LibPhoneNumber`].
    #[must_use]
    pub fn new(
        storage: Arc<dyn AccountStorage>,
        scheduler: Arc<dyn JobScheduler>,
        events: Arc<dyn EventBus>,
        config: ProfileConfig,
    ) -> Self {
        Self {
            storage,
            scheduler,
            events,
            phone: Arc::new(LibPhoneNumber),
            config,
        }
    }

    /// Replaces the phone normalizer.
    #[must_use]
    pub fn with_phone_normalizer(mut self, phone: Arc<dyn PhoneNormalizer>) -> Self {
        self.phone = phone;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// The record a user starts with.
    #[must_use]
    pub fn default_properties(user: &impl UserIdentity) -> Vec<Property> {
        vec![
            Property::new(PropertyName::DisplayName, user.display_name(), Scope::Federated),
            Property::new(PropertyName::Address, "", Scope::Local),
            Property::new(PropertyName::Website, "", Scope::Local),
            Property::new(
                PropertyName::Email,
                user.email().unwrap_or_default(),
                Scope::Federated,
            ),
            Property::new(PropertyName::Avatar, "", Scope::Federated),
            Property::new(PropertyName::Phone, "", Scope::Local),
            Property::new(PropertyName::Twitter, "", Scope::Local),
        ]
    }

    /// Reads the stored properties of `user`.
    ///
    /// A user without a record gets the default record, which is written
    /// (without an update event) when `create_if_missing` is set. A record
    /// that cannot be decoded is logged and replaced by the defaults in the
    /// returned value only. Default attributes missing from a decoded record
    /// are filled in.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn get_properties(
        &self,
        user: &impl UserIdentity,
        create_if_missing: bool,
    ) -> ProfileResult<Vec<Property>> {
        let owner = user.id();
        let Some(blob) = self.storage.load_blob(owner)? else {
            let defaults = Self::default_properties(user);
            if create_if_missing {
                self.write(owner, &defaults)?;
                tracing::debug!(owner, "default account created");
            }
            return Ok(defaults);
        };

        match codec::decode(&blob, owner) {
            Some(properties) if !properties.is_empty() => {
                Ok(with_missing_defaults(properties, Self::default_properties(user)))
            }
            _ => Ok(Self::default_properties(user)),
        }
    }

    /// Reads the account of `user` as a model, creating the record if needed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn get_account(&self, user: &impl UserIdentity) -> ProfileResult<Account> {
        let properties = self.get_properties(user, true)?;
        Ok(Account::from_properties(user.id(), properties))
    }

    /// Validates and persists `properties` as the full record of `user`.
    ///
    /// A scalar attribute listed more than once keeps its last value.
    /// Verification statuses are reconciled against the stored snapshot and
    /// an email change schedules a re-verification job. Nothing is written
    /// and no event is published when the result equals the stored snapshot.
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidValue`](crate::ProfileError::InvalidValue)
    /// in strict mode and propagates storage and scheduler failures.
    pub fn save(
        &self,
        user: &impl UserIdentity,
        properties: Vec<Property>,
        strict: bool,
    ) -> ProfileResult<bool> {
        let owner = user.id();
        // Repeated scalar names collapse to the last value.
        let mut properties = Account::from_properties(owner, properties).all_properties();
        let ctx = ValidationContext {
            config: &self.config,
            phone: self.phone.as_ref(),
        };
        sanitize_properties(&mut properties, strict, ctx)?;

        let previous = self.get_properties(user, false)?;
        track_changes(
            &previous,
            &mut properties,
            owner,
            unix_now(),
            self.scheduler.as_ref(),
        )?;

        if grouped(&previous) == grouped(&properties) {
            tracing::debug!(owner, "account unchanged, skipping write");
            return Ok(false);
        }

        self.write(owner, &properties)?;
        self.publish(owner, properties);
        Ok(true)
    }

    /// Saves every property of `account` for `user`.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn update_account(
        &self,
        user: &impl UserIdentity,
        account: &Account,
        strict: bool,
    ) -> ProfileResult<bool> {
        self.save(user, account.all_properties(), strict)
    }

    /// Removes the record and all flattened rows of `user`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn delete(&self, user: &impl UserIdentity) -> ProfileResult<()> {
        self.storage.delete_account(user.id())?;
        tracing::debug!(owner = user.id(), "account deleted");
        Ok(())
    }

    /// Applies the outcome of a verification job.
    ///
    /// The status of `name` changes only if the stored property still holds
    /// `value`; results for a value that has since changed are ignored.
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn record_verification_result(
        &self,
        user: &impl UserIdentity,
        name: PropertyName,
        value: &str,
        verified: bool,
    ) -> ProfileResult<bool> {
        let owner = user.id();
        let status = if verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::NotVerified
        };

        let mut properties = self.get_properties(user, false)?;
        let Some(target) = properties
            .iter_mut()
            .find(|property| property.name == name && property.value == value)
        else {
            tracing::debug!(owner, attribute = %name, "stale verification result ignored");
            return Ok(false);
        };
        if target.verified == status {
            return Ok(false);
        }
        target.verified = status;

        self.write(owner, &properties)?;
        tracing::info!(owner, attribute = %name, status = %status, "verification result recorded");
        self.publish(owner, properties);
        Ok(true)
    }

    /// Maps each matching value of `name` to its owner.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn search_by_value(
        &self,
        name: PropertyName,
        candidates: &[String],
    ) -> ProfileResult<BTreeMap<String, String>> {
        Ok(search::search_by_value(
            self.storage.as_ref(),
            self.config.search_chunk_size,
            name,
            candidates,
        )?)
    }

    fn write(&self, owner: &str, properties: &[Property]) -> ProfileResult<()> {
        let blob = codec::encode(properties)?;
        let rows: Vec<IndexRow> = properties
            .iter()
            .filter(|property| property.name != PropertyName::Avatar)
            .map(|property| IndexRow {
                owner: owner.to_string(),
                name: property.name,
                value: property.value.clone(),
            })
            .collect();
        self.storage.replace_account(owner, &blob, &rows)?;
        tracing::debug!(owner, rows = rows.len(), "account written");
        Ok(())
    }

    fn publish(&self, owner: &str, properties: Vec<Property>) {
        let event = AccountUpdatedEvent {
            owner: owner.to_string(),
            properties,
        };
        self.events.publish(ACCOUNT_UPDATED_EVENT, &event);
    }
}

/// Groups properties by attribute, keeping the order within each group.
fn grouped(properties: &[Property]) -> BTreeMap<PropertyName, Vec<&Property>> {
    let mut groups: BTreeMap<PropertyName, Vec<&Property>> = BTreeMap::new();
    for property in properties {
        groups.entry(property.name).or_default().push(property);
    }
    groups
}

fn with_missing_defaults(mut properties: Vec<Property>, defaults: Vec<Property>) -> Vec<Property> {
    for default in defaults {
        if !properties.iter().any(|property| property.name == default.name) {
            properties.push(default);
        }
    }
    properties
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
