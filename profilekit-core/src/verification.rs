//! Verification status state machine.
//!
//! A value attested by the lookup process stays attested only as long as it
//! is unchanged. The tracker compares a new property list against the
//! previously stored snapshot, downgrades statuses whose value moved, and
//! schedules a fresh lookup when the primary email changes.

use crate::account::{Property, PropertyName, VerificationStatus};
use crate::error::ProfileResult;
use crate::jobs::{JobScheduler, VerificationJob, VERIFY_USER_DATA_JOB};

fn find(properties: &[Property], name: PropertyName) -> Option<&Property> {
    properties.iter().find(|property| property.name == name)
}

/// Updates `new` in place against the `old` snapshot and schedules email
/// re-verification when needed.
///
/// Re-running with an identical pair schedules nothing. Returns the job that
/// was enqueued, if any.
///
/// # Errors
///
/// Propagates scheduler failures unchanged.
pub fn track_changes(
    old: &[Property],
    new: &mut [Property],
    owner: &str,
    now: u64,
    scheduler: &dyn JobScheduler,
) -> ProfileResult<Option<VerificationJob>> {
    for property in new.iter_mut() {
        if !property.name.is_lookup_verifiable() {
            continue;
        }
        let Some(previous) = find(old, property.name) else {
            continue;
        };
        let was_verified = previous.verified == VerificationStatus::Verified;
        if previous.value != property.value
            && (was_verified || property.verified != VerificationStatus::NotVerified)
        {
            property.verified = VerificationStatus::NotVerified;
        }
    }

    let Some(email) = new
        .iter_mut()
        .find(|property| property.name == PropertyName::Email)
    else {
        return Ok(None);
    };
    let previous_email = find(old, PropertyName::Email).map_or("", |property| property.value.as_str());
    if email.value == previous_email {
        return Ok(None);
    }

    let job = VerificationJob {
        attribute: PropertyName::Email,
        value: email.value.clone(),
        owner: owner.to_string(),
        attempt: 0,
        scheduled_at: now,
    };
    scheduler.enqueue(VERIFY_USER_DATA_JOB, &job)?;
    tracing::debug!(owner, "email changed, re-verification scheduled");
    email.verified = VerificationStatus::InProgress;
    Ok(Some(job))
}
