use strum::Display;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// The validation rule that rejected a value on a strict path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum InvalidValueKind {
    /// The phone number could not be parsed or is not valid for its region.
    Phone,
    /// The website is missing an `http`/`https` scheme or a host.
    Website,
    /// The value exceeds the maximum allowed length.
    Length,
    /// The scope is unknown or not allowed for the property.
    Scope,
}

/// Error outputs from profilekit.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The presented value was rejected by a strict validator.
    #[error("invalid_value: {0}")]
    InvalidValue(InvalidValueKind),
    /// The requested property is not present on the account.
    #[error("property_not_found: {0}")]
    PropertyNotFound(String),
    /// A scalar operation was attempted on a collection attribute.
    #[error("not_a_scalar: {0}")]
    NotAScalar(String),
    /// A collection operation was attempted on a scalar attribute.
    #[error("not_a_collection: {0}")]
    NotACollection(String),
    /// The storage executor failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The job scheduler refused the verification request.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Error returned by a [`JobScheduler`](crate::jobs::JobScheduler).
#[derive(Debug, Error)]
#[error("scheduler error: {0}")]
pub struct SchedulerError(pub String);
