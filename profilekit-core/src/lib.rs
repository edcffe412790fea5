#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Per-user profile attributes: validation, verification tracking,
//! persistence and reverse lookup.

pub mod account;
pub use account::*;

mod error;
pub use error::*;

pub mod codec;
pub mod config;
pub use config::{ConfigError, ProfileConfig};

pub mod events;
pub mod identity;
pub use identity::{User, UserIdentity};

pub mod jobs;
pub mod phone;
pub mod search;
pub mod storage;

mod store;
pub use store::AccountStore;

pub mod validation;
pub mod verification;

#[cfg(test)]
mod test_support;
