//! Basic identity of the user owning an account.

/// Identity fields the store needs to build a default record.
pub trait UserIdentity {
    /// Stable owner identifier; the key of both storage tables.
    fn id(&self) -> &str;

    /// Display name shown for the user.
    fn display_name(&self) -> &str;

    /// Primary email address, if the user has one.
    fn email(&self) -> Option<&str>;
}

/// Plain [`UserIdentity`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable owner identifier.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Primary email address.
    pub email: Option<String>,
}

impl User {
    /// Creates a user whose display name defaults to its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            email: None,
        }
    }

    /// Sets the display name, builder style.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the email, builder style.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl UserIdentity for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
