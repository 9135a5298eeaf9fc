// Job registry - Background slice jobs for long-running front ends
//
// A front end enqueues a request, gets a short id back and polls it. Records
// stay in memory for the life of the registry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::app::slice_interactor::{SliceInteractor, SliceRequest};

pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Complete,
    Failed,
}

/// Snapshot of one job
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    pub message: String,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory registry of slice jobs
#[derive(Clone)]
pub struct JobRegistry {
    interactor: Arc<SliceInteractor>,
    jobs: Arc<Mutex<HashMap<JobId, JobRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl JobRegistry {
    pub fn new(interactor: Arc<SliceInteractor>) -> Self {
        Self {
            interactor,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Start `request` on the current tokio runtime and return its id
    pub fn enqueue(&self, request: SliceRequest) -> JobId {
        let id = format!("{:08x}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let now = Utc::now();
        self.lock().insert(
            id.clone(),
            JobRecord {
                status: JobStatus::Running,
                message: "Starting slice...".to_string(),
                output: None,
                error: None,
                created_at: now,
                updated_at: now,
            },
        );
        info!("Job {} queued for {}", id, request.input.display());

        let registry = self.clone();
        let job = id.clone();
        tokio::spawn(async move {
            registry.update(&job, |record| record.message = "Slicing video...".to_string());
            match registry.interactor.execute(request).await {
                Ok(report) => {
                    info!("Job {} complete: {}", job, report.output.display());
                    registry.update(&job, |record| {
                        record.status = JobStatus::Complete;
                        record.message = "Complete".to_string();
                        record.output = Some(report.output);
                    });
                }
                Err(e) => {
                    error!("Job {} failed: {}", job, e);
                    registry.update(&job, |record| {
                        record.status = JobStatus::Failed;
                        record.message = e.to_string();
                        record.error = Some(e.to_string());
                    });
                }
            }
        });

        id
    }

    /// Current state of a job; `None` for unknown ids
    pub fn poll(&self, id: &str) -> Option<JobRecord> {
        self.lock().get(id).cloned()
    }

    /// Output of a completed job
    pub fn fetch_result(&self, id: &str) -> Option<PathBuf> {
        self.lock()
            .get(id)
            .filter(|record| record.status == JobStatus::Complete)
            .and_then(|record| record.output.clone())
    }

    fn update<F: FnOnce(&mut JobRecord)>(&self, id: &str, change: F) {
        if let Some(record) = self.lock().get_mut(id) {
            change(record);
            record.updated_at = Utc::now();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, JobRecord>> {
        // A panic while holding the lock cannot leave a record half-written
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
