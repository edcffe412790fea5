//! Background job seam for third-party re-verification.

use serde::{Deserialize, Serialize};

use crate::account::PropertyName;
use crate::error::SchedulerError;

/// Job type under which verification requests are enqueued.
pub const VERIFY_USER_DATA_JOB: &str = "verify_user_data";

/// Request to look up and attest one property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationJob {
    /// Attribute to verify.
    pub attribute: PropertyName,
    /// Value the lookup must attest.
    pub value: String,
    /// Owner of the account.
    pub owner: String,
    /// Number of previous attempts.
    pub attempt: u32,
    /// Unix timestamp (seconds) of scheduling.
    pub scheduled_at: u64,
}

/// Queue that runs verification jobs outside the request.
///
/// The core never waits on a job; results come back through
/// [`AccountStore::record_verification_result`](crate::AccountStore::record_verification_result).
pub trait JobScheduler: Send + Sync {
    /// Enqueues `job` under `job_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue rejects the job.
    fn enqueue(&self, job_type: &str, job: &VerificationJob) -> Result<(), SchedulerError>;
}

/// [`JobScheduler`] that only records jobs in the trace log.
///
/// Useful for tools that run without a job runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingJobScheduler;

impl JobScheduler for TracingJobScheduler {
    fn enqueue(&self, job_type: &str, job: &VerificationJob) -> Result<(), SchedulerError> {
        let payload =
            serde_json::to_string(job).map_err(|err| SchedulerError(err.to_string()))?;
        tracing::info!(job_type, %payload, "verification job enqueued");
        Ok(())
    }
}
