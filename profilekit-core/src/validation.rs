//! Per-attribute normalization and validation rules.
//!
//! Every rule runs in one of two modes. Strict mode (user-initiated writes)
//! rejects bad input with [`ProfileError::InvalidValue`]. Permissive mode
//! (system writes and previously stored data) repairs the property instead:
//! bad values are reset to the empty string and disallowed scopes are floored.

use url::Url;

use crate::account::{Property, PropertyName, Scope};
use crate::config::ProfileConfig;
use crate::error::{InvalidValueKind, ProfileError, ProfileResult};
use crate::phone::PhoneNormalizer;

/// Collaborators and tunables the validators need.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Limits and the default phone region.
    pub config: &'a ProfileConfig,
    /// Phone parsing collaborator.
    pub phone: &'a dyn PhoneNormalizer,
}

const fn invalid(kind: InvalidValueKind) -> ProfileError {
    ProfileError::InvalidValue(kind)
}

/// Canonicalizes a phone number to its international form.
///
/// Without a configured `default_region` (a blank one counts as missing) only
/// input starting with `+` is accepted; such input is parsed without a region.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Phone`] if the number cannot be parsed or is
/// not valid for the resolved region.
pub fn parse_phone(
    raw: &str,
    default_region: Option<&str>,
    normalizer: &dyn PhoneNormalizer,
) -> ProfileResult<String> {
    let input = raw.trim();
    let region = match default_region.map(str::trim).filter(|region| !region.is_empty()) {
        Some(region) => Some(region),
        None if input.starts_with('+') => None,
        None => return Err(invalid(InvalidValueKind::Phone)),
    };
    normalizer
        .parse(input, region)
        .ok_or(invalid(InvalidValueKind::Phone))
}

/// [`parse_phone`] with the strict/permissive switch. Empty input is kept.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Phone`] in strict mode if parsing fails.
pub fn sanitize_phone(
    raw: &str,
    default_region: Option<&str>,
    strict: bool,
    normalizer: &dyn PhoneNormalizer,
) -> ProfileResult<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    match parse_phone(raw, default_region, normalizer) {
        Ok(normalized) => Ok(normalized),
        Err(err) if strict => Err(err),
        Err(_) => Ok(String::new()),
    }
}

/// Checks that `raw` is an absolute `http`/`https` URL with a host.
///
/// The input is returned unchanged; no further normalization happens.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Website`] if the scheme or host is missing.
pub fn parse_website(raw: &str) -> ProfileResult<String> {
    let url = Url::parse(raw).map_err(|_| invalid(InvalidValueKind::Website))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(InvalidValueKind::Website));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(raw.to_string()),
        _ => Err(invalid(InvalidValueKind::Website)),
    }
}

/// [`parse_website`] with the strict/permissive switch. Empty input is kept.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Website`] in strict mode if the URL is invalid.
pub fn sanitize_website(raw: &str, strict: bool) -> ProfileResult<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    match parse_website(raw) {
        Ok(website) => Ok(website),
        Err(err) if strict => Err(err),
        Err(_) => Ok(String::new()),
    }
}

/// Enforces the maximum value length, counted in characters.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Length`] in strict mode for an overlong value.
pub fn check_length(property: &mut Property, max_length: usize, strict: bool) -> ProfileResult<()> {
    if property.value.chars().count() <= max_length {
        return Ok(());
    }
    if strict {
        return Err(invalid(InvalidValueKind::Length));
    }
    property.value.clear();
    Ok(())
}

/// Display name and email must stay discoverable on the instance.
const fn forbids_private(name: PropertyName) -> bool {
    matches!(name, PropertyName::DisplayName | PropertyName::Email)
}

/// Enforces the scope floor of the display name and email.
///
/// # Errors
///
/// Returns [`InvalidValueKind::Scope`] in strict mode when a display name or
/// email is [`Scope::Private`].
pub fn check_scope(property: &mut Property, strict: bool) -> ProfileResult<()> {
    if property.scope != Scope::Private || !forbids_private(property.name) {
        return Ok(());
    }
    if strict {
        return Err(invalid(InvalidValueKind::Scope));
    }
    property.scope = Scope::Local;
    Ok(())
}

/// Runs every rule over `property`, in place.
///
/// # Errors
///
/// Returns the first rule violation in strict mode.
pub fn sanitize_property(
    property: &mut Property,
    strict: bool,
    ctx: ValidationContext<'_>,
) -> ProfileResult<()> {
    match property.name {
        PropertyName::Phone => {
            property.value = sanitize_phone(
                &property.value,
                ctx.config.phone_region(),
                strict,
                ctx.phone,
            )?;
        }
        PropertyName::Website => {
            property.value = sanitize_website(&property.value, strict)?;
        }
        PropertyName::Avatar => property.value.clear(),
        _ => {}
    }
    check_length(property, ctx.config.max_value_length, strict)?;
    check_scope(property, strict)
}

/// Runs [`sanitize_property`] over every property.
///
/// # Errors
///
/// Returns the first rule violation in strict mode.
pub fn sanitize_properties(
    properties: &mut [Property],
    strict: bool,
    ctx: ValidationContext<'_>,
) -> ProfileResult<()> {
    properties
        .iter_mut()
        .try_for_each(|property| sanitize_property(property, strict, ctx))
}
