//! Concurrency-safe job registry.
//!
//! One explicit service object shared between the HTTP boundary and the
//! pipeline workers; every read and write takes the internal lock for the
//! duration of one whole-job operation, so observers never see a job with
//! half of an update applied. Entries are never deleted — job history lives
//! for the process lifetime.

use crate::error::{RecapError, Result};
use crate::job::types::{Job, JobStatus, JobUpdate};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct JobStore {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    // The map stays structurally valid even if a holder panicked mid-update,
    // so recover from poisoning instead of propagating it.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Job>> {
        self.jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register a new job in its initial state (`pending`, progress 0).
    pub fn create(&self, id: Uuid) -> Job {
        let job = Job::new(id);
        self.lock().insert(id, job.clone());
        job
    }

    /// Merge a partial update into a job; fields the update leaves unset
    /// keep their prior values. Creates the entry if it is absent.
    pub fn update(&self, id: Uuid, update: JobUpdate) {
        let mut jobs = self.lock();
        let job = jobs.entry(id).or_insert_with(|| Job::new(id));
        update.apply(job);
    }

    /// Point read of a job's current state.
    pub fn get(&self, id: Uuid) -> Option<Job> {
        self.lock().get(&id).cloned()
    }

    /// Apply a terminal update unless a cancellation request won the race.
    ///
    /// A cancel can arrive while the last stage is running; the check and
    /// the write share one lock acquisition so `Cancelled` can never be
    /// overwritten by a late `Completed` or `Error`. Returns false when the
    /// update was refused.
    pub fn finalize(&self, id: Uuid, update: JobUpdate) -> bool {
        let mut jobs = self.lock();
        let job = jobs.entry(id).or_insert_with(|| Job::new(id));
        if job.status == JobStatus::Cancelled {
            return false;
        }
        update.apply(job);
        true
    }

    /// Ask a running job to stop.
    ///
    /// This only flips the status to `cancelled`; the sequencer observes it
    /// at its next stage boundary and finalizes the job. Idempotent, and a
    /// no-op on jobs that already reached a terminal state.
    pub fn request_cancel(&self, id: Uuid) -> Result<()> {
        let mut jobs = self.lock();
        let job = jobs.get_mut(&id).ok_or_else(|| RecapError::JobNotFound {
            id: id.to_string(),
        })?;
        if !job.status.is_terminal() {
            job.status = JobStatus::Cancelled;
        }
        Ok(())
    }

    /// True when a cancellation request is pending or already finalized.
    pub fn is_cancelled(&self, id: Uuid) -> bool {
        self.lock()
            .get(&id)
            .is_some_and(|job| job.status == JobStatus::Cancelled)
    }
}
