//! Bounded worker pool feeding jobs to the sequencer.
//!
//! Submission goes through a fixed-capacity mpsc channel: a permit is
//! reserved up front, so a full queue is rejected before the job is ever
//! registered and no orphan store entries are left behind. A small set of
//! long-lived worker tasks shares the receiving end and processes jobs one
//! at a time each, which caps concurrent ASR and LLM load.

use crate::error::{RecapError, Result};
use crate::job::sequencer::StageSequencer;
use crate::job::types::JobFlags;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One queued unit of work.
///
/// Holds the spooled upload as a [`tempfile::TempPath`] so the audio file
/// is deleted when the request is dropped, whichever way the job ends.
pub struct JobRequest {
    pub id: Uuid,
    pub audio: tempfile::TempPath,
    pub flags: JobFlags,
}

/// Submission side of the worker pool.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<JobRequest>,
}

/// A reserved queue slot. Dropping it without sending releases the slot.
///
/// Reserving before registering the job in the store means a full queue is
/// detected before any state exists for the job.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, JobRequest>,
}

impl QueueSlot<'_> {
    pub fn send(self, request: JobRequest) {
        self.permit.send(request);
    }
}

impl JobQueue {
    /// Reserve a queue slot, or refuse immediately when the queue is full.
    pub fn reserve(&self) -> Result<QueueSlot<'_>> {
        match self.tx.try_reserve() {
            Ok(permit) => Ok(QueueSlot { permit }),
            Err(mpsc::error::TrySendError::Full(())) => Err(RecapError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(())) => Err(RecapError::Other(
                "Job queue is shut down".to_string(),
            )),
        }
    }

    /// Enqueue a job, or refuse it immediately when the queue is full.
    pub fn submit(&self, request: JobRequest) -> Result<()> {
        let slot = self.reserve()?;
        slot.send(request);
        Ok(())
    }
}

/// Start `workers` pipeline workers sharing one bounded queue.
///
/// Returns the queue handle for the HTTP layer. Workers run until every
/// queue handle is dropped.
pub fn spawn_workers(
    workers: usize,
    queue_capacity: usize,
    sequencer: Arc<StageSequencer>,
) -> JobQueue {
    let (tx, rx) = mpsc::channel::<JobRequest>(queue_capacity);
    let rx = Arc::new(Mutex::new(rx));

    for worker_id in 0..workers {
        let rx = Arc::clone(&rx);
        let sequencer = Arc::clone(&sequencer);
        tokio::spawn(async move {
            loop {
                let request = {
                    let mut rx = rx.lock().await;
                    rx.recv().await
                };
                let Some(request) = request else {
                    tracing::debug!(worker = worker_id, "job queue closed, worker exiting");
                    break;
                };

                tracing::debug!(worker = worker_id, job = %request.id, "picked up job");
                sequencer
                    .run(request.id, &request.audio, request.flags)
                    .await;
                // `request.audio` drops here and the spooled file with it.
            }
        });
    }

    JobQueue { tx }
}
