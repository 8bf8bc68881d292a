//! Background job pipeline: job model, store, sequencer, worker pool.

pub mod sequencer;
pub mod store;
pub mod types;
pub mod worker;

pub use sequencer::{Collaborators, StageSequencer};
pub use store::JobStore;
pub use types::{Job, JobFlags, JobResult, JobStatus, JobUpdate};
pub use worker::{spawn_workers, JobQueue, JobRequest};
