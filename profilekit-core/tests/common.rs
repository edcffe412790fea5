//! Common test utilities shared across integration tests.
#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use profilekit_core::events::{AccountUpdatedEvent, EventBus};
use profilekit_core::jobs::{JobScheduler, VerificationJob};
use profilekit_core::storage::SqliteAccountStorage;
use profilekit_core::{AccountStore, ProfileConfig, SchedulerError};
use uuid::Uuid;

pub struct InMemoryScheduler {
    jobs: Mutex<Vec<VerificationJob>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<VerificationJob> {
        self.jobs.lock().expect("scheduler lock").clone()
    }
}

impl JobScheduler for InMemoryScheduler {
    fn enqueue(&self, _job_type: &str, job: &VerificationJob) -> Result<(), SchedulerError> {
        self.jobs
            .lock()
            .map_err(|_| SchedulerError("mutex poisoned".to_string()))?
            .push(job.clone());
        Ok(())
    }
}

pub struct InMemoryEventBus {
    events: Mutex<Vec<AccountUpdatedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AccountUpdatedEvent> {
        self.events.lock().expect("event lock").clone()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish(&self, _name: &str, event: &AccountUpdatedEvent) {
        self.events.lock().expect("event lock").push(event.clone());
    }
}

pub struct Harness {
    pub store: AccountStore,
    pub scheduler: Arc<InMemoryScheduler>,
    pub events: Arc<InMemoryEventBus>,
}

pub fn temp_db_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("profilekit-test-{}.sqlite", Uuid::new_v4()));
    path
}

pub fn cleanup_db(path: &Path) {
    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(path.with_extension("sqlite-journal"));
}

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn open_store(path: &Path, config: ProfileConfig) -> Harness {
    init_tracing();
    let storage = Arc::new(SqliteAccountStorage::open(path).expect("open storage"));
    let scheduler = Arc::new(InMemoryScheduler::new());
    let events = Arc::new(InMemoryEventBus::new());
    let store = AccountStore::new(storage, scheduler.clone(), events.clone(), config);
    Harness {
        store,
        scheduler,
        events,
    }
}
