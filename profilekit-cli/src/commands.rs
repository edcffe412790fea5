use eyre::{bail, eyre, Result};
use profilekit_core::{
    AccountStore, Property, PropertyName, Scope, User, VerificationStatus,
};
use serde_json::{json, Value};

fn parse_name(raw: &str) -> Result<PropertyName> {
    raw.parse::<PropertyName>()
        .map_err(|_| eyre!("unknown property `{raw}`"))
}

fn to_json(property: &Property) -> Value {
    json!({
        "name": property.name.as_str(),
        "value": property.value,
        "scope": property.scope.as_str(),
        "verified": property.verified.to_string(),
    })
}

pub fn show(store: &AccountStore, user: &User) -> Result<()> {
    let account = store.get_account(user)?;
    let rendered: Vec<Value> = account.all_properties().iter().map(to_json).collect();
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

pub fn set(
    store: &AccountStore,
    user: &User,
    property: &str,
    value: &str,
    scope: Option<&str>,
) -> Result<()> {
    let name = parse_name(property)?;
    if name.is_collection() {
        bail!("`{name}` is a collection; use add-mail/remove-mail");
    }
    let mut account = store.get_account(user)?;
    let (current_scope, verified) = account.get_property(name).map_or(
        (Scope::Local, VerificationStatus::NotVerified),
        |existing| (existing.scope, existing.verified),
    );
    let scope = scope.map_or(Ok(current_scope), |raw| Scope::parse(raw, true))?;
    account.set_property(name, value, scope, verified)?;
    let written = store.update_account(user, &account, true)?;
    println!("{}", if written { "updated" } else { "unchanged" });
    Ok(())
}

pub fn add_mail(store: &AccountStore, user: &User, value: &str, scope: &str) -> Result<()> {
    let scope = Scope::parse(scope, true)?;
    let mut account = store.get_account(user)?;
    account.add_to_collection(Property::new(PropertyName::AdditionalMail, value, scope))?;
    store.update_account(user, &account, true)?;
    println!("added {value}");
    Ok(())
}

pub fn remove_mail(store: &AccountStore, user: &User, value: &str) -> Result<()> {
    let mut account = store.get_account(user)?;
    let removed = account
        .get_property_collection_mut(PropertyName::AdditionalMail)
        .is_ok_and(|collection| collection.remove_by_value(value));
    if !removed {
        bail!("{value} is not an additional mail of {}", user.id);
    }
    store.update_account(user, &account, true)?;
    println!("removed {value}");
    Ok(())
}

pub fn search(store: &AccountStore, property: &str, values: &[String]) -> Result<()> {
    let name = parse_name(property)?;
    let found = store.search_by_value(name, values)?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

pub fn verify(
    store: &AccountStore,
    user: &User,
    property: &str,
    value: &str,
    verified: bool,
) -> Result<()> {
    let name = parse_name(property)?;
    if store.record_verification_result(user, name, value, verified)? {
        println!("recorded");
    } else {
        println!("no change");
    }
    Ok(())
}

pub fn delete(store: &AccountStore, user: &User) -> Result<()> {
    store.delete(user)?;
    println!("deleted {}", user.id);
    Ok(())
}
