//! In-memory collaborators shared by unit tests.

use std::sync::Mutex;

use crate::account::PropertyName;
use crate::error::SchedulerError;
use crate::events::{AccountUpdatedEvent, EventBus};
use crate::jobs::{JobScheduler, VerificationJob};
use crate::phone::PhoneNormalizer;
use crate::storage::{AccountStorage, IndexRow, StorageResult};

#[derive(Default)]
pub struct RecordingScheduler {
    jobs: Mutex<Vec<(String, VerificationJob)>>,
}

impl RecordingScheduler {
    pub fn jobs(&self) -> Vec<(String, VerificationJob)> {
        self.jobs.lock().unwrap().clone()
    }
}

impl JobScheduler for RecordingScheduler {
    fn enqueue(&self, job_type: &str, job: &VerificationJob) -> Result<(), SchedulerError> {
        self.jobs
            .lock()
            .unwrap()
            .push((job_type.to_string(), job.clone()));
        Ok(())
    }
}

pub struct FailingScheduler;

impl JobScheduler for FailingScheduler {
    fn enqueue(&self, _job_type: &str, _job: &VerificationJob) -> Result<(), SchedulerError> {
        Err(SchedulerError("queue unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingEventBus {
    events: Mutex<Vec<(String, AccountUpdatedEvent)>>,
}

impl RecordingEventBus {
    pub fn events(&self) -> Vec<(String, AccountUpdatedEvent)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventBus for RecordingEventBus {
    fn publish(&self, name: &str, event: &AccountUpdatedEvent) {
        self.events
            .lock()
            .unwrap()
            .push((name.to_string(), event.clone()));
    }
}

/// Returns a fixed number and remembers the region it was asked for.
pub struct FixedPhoneNormalizer {
    result: String,
    last_region: Mutex<Option<String>>,
}

impl FixedPhoneNormalizer {
    pub fn new(result: &str) -> Self {
        Self {
            result: result.to_string(),
            last_region: Mutex::new(None),
        }
    }

    pub fn last_region(&self) -> Option<String> {
        self.last_region.lock().unwrap().clone()
    }
}

impl PhoneNormalizer for FixedPhoneNormalizer {
    fn parse(&self, _raw: &str, region: Option<&str>) -> Option<String> {
        *self.last_region.lock().unwrap() = region.map(ToString::to_string);
        Some(self.result.clone())
    }
}

/// Wraps a storage and counts writes and search chunk sizes.
pub struct CountingStorage<S> {
    inner: S,
    writes: Mutex<usize>,
    search_sizes: Mutex<Vec<usize>>,
}

impl<S> CountingStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Mutex::new(0),
            search_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn search_sizes(&self) -> Vec<usize> {
        self.search_sizes.lock().unwrap().clone()
    }
}

impl<S: AccountStorage> AccountStorage for CountingStorage<S> {
    fn load_blob(&self, owner: &str) -> StorageResult<Option<String>> {
        self.inner.load_blob(owner)
    }

    fn replace_account(&self, owner: &str, blob: &str, rows: &[IndexRow]) -> StorageResult<()> {
        *self.writes.lock().unwrap() += 1;
        self.inner.replace_account(owner, blob, rows)
    }

    fn delete_account(&self, owner: &str) -> StorageResult<()> {
        self.inner.delete_account(owner)
    }

    fn search_index(&self, name: PropertyName, values: &[String]) -> StorageResult<Vec<IndexRow>> {
        self.search_sizes.lock().unwrap().push(values.len());
        self.inner.search_index(name, values)
    }
}
