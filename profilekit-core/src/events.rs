//! Publish side of account change notifications.

use crate::account::Property;

/// Name under which account updates are published.
pub const ACCOUNT_UPDATED_EVENT: &str = "account.updated";

/// Emitted after an account was rewritten with changed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdatedEvent {
    /// Owner of the account.
    pub owner: String,
    /// The full property set that was persisted.
    pub properties: Vec<Property>,
}

/// Event bus the store publishes through. Subscribers are not its concern.
pub trait EventBus: Send + Sync {
    /// Publishes `event` under `name`.
    fn publish(&self, name: &str, event: &AccountUpdatedEvent);
}

/// [`EventBus`] that writes events to the trace log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn publish(&self, name: &str, event: &AccountUpdatedEvent) {
        tracing::info!(
            event = name,
            owner = %event.owner,
            properties = event.properties.len(),
            "account event published"
        );
    }
}
