//! Stage-by-stage execution of one job.
//!
//! The sequencer drives a job end to end: it invokes the external
//! collaborators in a fixed order, writes a progress snapshot into the
//! [`JobStore`] at every stage boundary, and checks for a pending
//! cancellation request before starting each stage. Cancellation is
//! cooperative — a collaborator call already in flight cannot be
//! interrupted; the soonest the sequencer reacts is the next boundary.
//!
//! Every run ends in exactly one terminal store state. No fault escapes to
//! the worker: collaborator failures become `error`, an observed
//! cancellation becomes `cancelled`, anything else is `completed`.

use crate::asr::{Diarizer, Transcriber};
use crate::dialogue::{align, merge};
use crate::error::{RecapError, Result};
use crate::job::store::JobStore;
use crate::job::types::{JobFlags, JobResult, JobStatus, JobUpdate};
use crate::llm::{ActionExtractor, Summarizer};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// One named phase of job execution, with its progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    SpeechRecognition,
    SpeakerIdentification,
    Merge,
    Summarization,
    Actions,
    Done,
}

impl Stage {
    /// The step label written to the store and reported to clients.
    fn label(self) -> &'static str {
        match self {
            Self::SpeechRecognition => "speech_recognition",
            Self::SpeakerIdentification => "speaker_identification",
            Self::Merge => "merge",
            Self::Summarization => "summarization",
            Self::Actions => "actions",
            Self::Done => "done",
        }
    }

    fn progress(self) -> u8 {
        match self {
            Self::SpeechRecognition => 10,
            Self::SpeakerIdentification => 40,
            Self::Merge => 60,
            Self::Summarization => 80,
            Self::Actions => 90,
            Self::Done => 100,
        }
    }
}

/// The external ML collaborators a job needs.
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub diarizer: Arc<dyn Diarizer>,
    pub summarizer: Arc<dyn Summarizer>,
    pub action_extractor: Arc<dyn ActionExtractor>,
}

/// Drives one job through the stage pipeline.
pub struct StageSequencer {
    store: Arc<JobStore>,
    collaborators: Arc<Collaborators>,
    /// Alignment tolerance in seconds.
    tolerance: f64,
}

impl StageSequencer {
    pub fn new(store: Arc<JobStore>, collaborators: Arc<Collaborators>, tolerance: f64) -> Self {
        Self {
            store,
            collaborators,
            tolerance,
        }
    }

    /// Run a job to a terminal state. Never returns an error — all faults
    /// are converted into the job's final store state.
    pub async fn run(&self, id: Uuid, audio: &Path, flags: JobFlags) {
        // A job cancelled while still queued is finalized without entering
        // the state machine (and without clobbering its cancelled status).
        if self.store.is_cancelled(id) {
            self.finalize_cancelled(id);
            return;
        }

        self.store.update(id, JobUpdate::status(JobStatus::Processing));

        match self.execute(id, audio, flags).await {
            Ok(result) => {
                let completed = self.store.finalize(
                    id,
                    JobUpdate {
                        status: Some(JobStatus::Completed),
                        step: Some(Stage::Done.label().to_string()),
                        progress: Some(Stage::Done.progress()),
                        result: Some(result),
                        ..Default::default()
                    },
                );
                if completed {
                    tracing::info!(job = %id, "job completed");
                } else {
                    // A cancel arrived during the last stage, after its
                    // boundary check; the store refused the completion.
                    tracing::info!(job = %id, "job cancelled");
                    self.finalize_cancelled(id);
                }
            }
            Err(RecapError::Cancelled) => {
                tracing::info!(job = %id, "job cancelled");
                self.finalize_cancelled(id);
            }
            Err(e) => {
                if e.is_collaborator_fault() {
                    tracing::warn!(job = %id, error = %e, "collaborator failed");
                } else {
                    tracing::error!(job = %id, error = %e, "job failed");
                }
                let failed = self.store.finalize(
                    id,
                    JobUpdate {
                        status: Some(JobStatus::Error),
                        step: Some("failed".to_string()),
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                );
                if !failed {
                    self.finalize_cancelled(id);
                }
            }
        }
    }

    async fn execute(&self, id: Uuid, audio: &Path, flags: JobFlags) -> Result<JobResult> {
        self.enter_stage(id, Stage::SpeechRecognition)?;
        let transcript = self.collaborators.transcriber.transcribe(audio).await?;

        let mut result = JobResult::default();

        if flags.dialogue {
            self.enter_stage(id, Stage::SpeakerIdentification)?;
            let speakers = self.collaborators.diarizer.diarize(audio).await?;

            self.enter_stage(id, Stage::Merge)?;
            let aligned = align(&speakers, &transcript.segments, self.tolerance);
            let dropped = transcript.segments.len() - aligned.len();
            if dropped > 0 {
                tracing::debug!(
                    job = %id,
                    dropped,
                    "recognition segments without an eligible speaker interval"
                );
            }
            result.dialogue = Some(merge(&aligned));
        }

        if flags.summary {
            self.enter_stage(id, Stage::Summarization)?;
            result.summary = Some(
                self.collaborators
                    .summarizer
                    .summarize(&transcript.full_text)
                    .await?,
            );
        }

        if flags.actions {
            self.enter_stage(id, Stage::Actions)?;
            result.actions = Some(
                self.collaborators
                    .action_extractor
                    .extract(&transcript.full_text)
                    .await?,
            );
        }

        Ok(result)
    }

    /// Stage boundary: observe a pending cancellation request, then record
    /// the step transition. The two are deliberately separate operations —
    /// progress reporting carries no control flow.
    fn enter_stage(&self, id: Uuid, stage: Stage) -> Result<()> {
        if self.store.is_cancelled(id) {
            return Err(RecapError::Cancelled);
        }
        tracing::debug!(job = %id, step = stage.label(), "entering stage");
        self.store
            .update(id, JobUpdate::step(stage.label(), stage.progress()));
        Ok(())
    }

    fn finalize_cancelled(&self, id: Uuid) {
        // Status is already `cancelled` (that is how we got here); record
        // the terminal step, leave progress where it was, no error payload.
        self.store.update(
            id,
            JobUpdate {
                step: Some("cancelled".to_string()),
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::diarizer::{MockDiarizer, SpeakerSegment};
    use crate::asr::transcriber::{MockTranscriber, RecognitionSegment};
    use crate::llm::actions::{ActionItem, MockActionExtractor};
    use crate::llm::summarizer::MockSummarizer;
    use std::path::PathBuf;

    fn rec(start: f64, end: f64, text: &str) -> RecognitionSegment {
        RecognitionSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    fn dia(start: f64, end: f64, speaker: &str) -> SpeakerSegment {
        SpeakerSegment {
            start,
            end,
            speaker: speaker.to_string(),
        }
    }

    fn collaborators(
        transcriber: MockTranscriber,
        diarizer: MockDiarizer,
        summarizer: MockSummarizer,
        extractor: MockActionExtractor,
    ) -> Arc<Collaborators> {
        Arc::new(Collaborators {
            transcriber: Arc::new(transcriber),
            diarizer: Arc::new(diarizer),
            summarizer: Arc::new(summarizer),
            action_extractor: Arc::new(extractor),
        })
    }

    fn happy_collaborators() -> Arc<Collaborators> {
        collaborators(
            MockTranscriber::new("mock")
                .with_segments(vec![rec(0.0, 5.0, "hello "), rec(5.0, 9.0, "world")]),
            MockDiarizer::new().with_segments(vec![dia(0.0, 6.0, "A"), dia(6.0, 10.0, "B")]),
            MockSummarizer::new().with_response("## Goal\nCatch up"),
            MockActionExtractor::new().with_actions(vec![ActionItem {
                title: "Send notes".to_string(),
                deadline: None,
                responsible: None,
                details: None,
            }]),
        )
    }

    fn audio() -> PathBuf {
        PathBuf::from("call.wav")
    }

    #[tokio::test]
    async fn test_successful_run_completes_with_full_result() {
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.step.as_deref(), Some("done"));
        assert_eq!(job.progress, 100);
        assert_eq!(job.error, None);

        let result = job.result.unwrap();
        assert_eq!(result.summary.as_deref(), Some("## Goal\nCatch up"));
        let dialogue = result.dialogue.unwrap();
        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue[0].speaker, "A");
        assert_eq!(dialogue[1].speaker, "B");
        assert_eq!(result.actions.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_features_are_skipped_and_absent() {
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        let flags = JobFlags {
            summary: true,
            dialogue: false,
            actions: false,
        };
        sequencer.run(id, &audio(), flags).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let result = job.result.unwrap();
        assert!(result.summary.is_some());
        assert!(result.dialogue.is_none());
        assert!(result.actions.is_none());
    }

    #[tokio::test]
    async fn test_dialogue_disabled_skips_diarizer_entirely() {
        // A failing diarizer proves the collaborator is never invoked when
        // the dialogue feature is off.
        let store = Arc::new(JobStore::new());
        let collabs = collaborators(
            MockTranscriber::new("mock").with_segments(vec![rec(0.0, 5.0, "hello world")]),
            MockDiarizer::new().with_failure(),
            MockSummarizer::new(),
            MockActionExtractor::new(),
        );
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        let flags = JobFlags {
            summary: true,
            dialogue: false,
            actions: true,
        };
        sequencer.run(id, &audio(), flags).await;

        assert_eq!(store.get(id).unwrap().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_all_flags_disabled_completes_with_empty_result() {
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        let flags = JobFlags {
            summary: false,
            dialogue: false,
            actions: false,
        };
        sequencer.run(id, &audio(), flags).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result, Some(JobResult::default()));
    }

    #[tokio::test]
    async fn test_transcriber_failure_finalizes_as_error() {
        let store = Arc::new(JobStore::new());
        let collabs = collaborators(
            MockTranscriber::new("mock").with_failure(),
            MockDiarizer::new(),
            MockSummarizer::new(),
            MockActionExtractor::new(),
        );
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.step.as_deref(), Some("failed"));
        assert!(job.error.unwrap().contains("mock transcription failure"));
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_diarizer_failure_finalizes_as_error() {
        let store = Arc::new(JobStore::new());
        let collabs = collaborators(
            MockTranscriber::new("mock").with_segments(vec![rec(0.0, 5.0, "hello")]),
            MockDiarizer::new().with_failure(),
            MockSummarizer::new(),
            MockActionExtractor::new(),
        );
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.error.unwrap().contains("mock diarization failure"));
    }

    #[tokio::test]
    async fn test_llm_failure_finalizes_as_error() {
        let store = Arc::new(JobStore::new());
        let collabs = collaborators(
            MockTranscriber::new("mock").with_segments(vec![rec(0.0, 5.0, "hello")]),
            MockDiarizer::new().with_segments(vec![dia(0.0, 5.0, "A")]),
            MockSummarizer::new().with_failure(),
            MockActionExtractor::new(),
        );
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.step.as_deref(), Some("failed"));
    }

    #[tokio::test]
    async fn test_cancel_before_run_finalizes_without_processing() {
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);
        store.request_cancel(id).unwrap();

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.step.as_deref(), Some("cancelled"));
        assert_eq!(job.progress, 0);
        assert_eq!(job.error, None);
        assert!(job.result.is_none());
    }

    #[tokio::test]
    async fn test_cancel_observed_at_stage_boundary() {
        // The transcriber cancels the job as a side effect, simulating a
        // cancel request arriving while recognition runs. The sequencer
        // must observe it before the next stage.
        struct CancellingTranscriber {
            store: Arc<JobStore>,
            id: Uuid,
        }

        #[async_trait::async_trait]
        impl Transcriber for CancellingTranscriber {
            async fn transcribe(&self, _audio: &Path) -> crate::error::Result<crate::asr::Transcript> {
                self.store.request_cancel(self.id).unwrap();
                Ok(crate::asr::Transcript {
                    full_text: "hello world".to_string(),
                    segments: vec![RecognitionSegment {
                        start: 0.0,
                        end: 1.0,
                        text: "hello world".to_string(),
                    }],
                })
            }

            fn model_name(&self) -> &str {
                "cancelling"
            }
        }

        let store = Arc::new(JobStore::new());
        let id = Uuid::new_v4();
        store.create(id);

        let collabs = Arc::new(Collaborators {
            transcriber: Arc::new(CancellingTranscriber {
                store: Arc::clone(&store),
                id,
            }),
            diarizer: Arc::new(MockDiarizer::new().with_failure()),
            summarizer: Arc::new(MockSummarizer::new()),
            action_extractor: Arc::new(MockActionExtractor::new()),
        });
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.step.as_deref(), Some("cancelled"));
        assert_eq!(job.error, None);
        // The diarizer (configured to fail) was never reached.
        assert_eq!(job.progress, 10);
    }

    #[tokio::test]
    async fn test_cancel_during_final_stage_is_not_overwritten() {
        // The extractor cancels the job as a side effect and then succeeds;
        // there is no later stage boundary to observe the request, so the
        // completion write itself must refuse to clobber it.
        struct CancellingExtractor {
            store: Arc<JobStore>,
            id: Uuid,
        }

        #[async_trait::async_trait]
        impl ActionExtractor for CancellingExtractor {
            async fn extract(
                &self,
                _full_text: &str,
            ) -> crate::error::Result<Vec<ActionItem>> {
                self.store.request_cancel(self.id).unwrap();
                Ok(Vec::new())
            }
        }

        let store = Arc::new(JobStore::new());
        let id = Uuid::new_v4();
        store.create(id);

        let happy = happy_collaborators();
        let collabs = Arc::new(Collaborators {
            transcriber: Arc::clone(&happy.transcriber),
            diarizer: Arc::clone(&happy.diarizer),
            summarizer: Arc::clone(&happy.summarizer),
            action_extractor: Arc::new(CancellingExtractor {
                store: Arc::clone(&store),
                id,
            }),
        });
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.step.as_deref(), Some("cancelled"));
        assert!(job.result.is_none());
        assert_eq!(job.error, None);
    }

    #[tokio::test]
    async fn test_cancel_during_failing_stage_is_not_overwritten() {
        // Cancel and a collaborator fault race on the same stage; the
        // cancellation wins the terminal state.
        struct CancellingFailingSummarizer {
            store: Arc<JobStore>,
            id: Uuid,
        }

        #[async_trait::async_trait]
        impl crate::llm::Summarizer for CancellingFailingSummarizer {
            async fn summarize(&self, _full_text: &str) -> crate::error::Result<String> {
                self.store.request_cancel(self.id).unwrap();
                Err(RecapError::Llm {
                    message: "model went away".to_string(),
                })
            }
        }

        let store = Arc::new(JobStore::new());
        let id = Uuid::new_v4();
        store.create(id);

        let happy = happy_collaborators();
        let collabs = Arc::new(Collaborators {
            transcriber: Arc::clone(&happy.transcriber),
            diarizer: Arc::clone(&happy.diarizer),
            summarizer: Arc::new(CancellingFailingSummarizer {
                store: Arc::clone(&store),
                id,
            }),
            action_extractor: Arc::clone(&happy.action_extractor),
        });
        let sequencer = StageSequencer::new(Arc::clone(&store), collabs, 0.1);

        sequencer.run(id, &audio(), JobFlags::default()).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.step.as_deref(), Some("cancelled"));
        assert_eq!(job.error, None);
    }

    #[tokio::test]
    async fn test_progress_monotonic_on_success() {
        // Stage percentages are fixed and increasing; verify the terminal
        // snapshot and that skipped stages leave no stray progress.
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        let flags = JobFlags {
            summary: false,
            dialogue: true,
            actions: false,
        };
        sequencer.run(id, &audio(), flags).await;

        let job = store.get(id).unwrap();
        assert_eq!(job.progress, 100);
        assert_eq!(job.step.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_spec_alignment_example_flows_through() {
        // recognition [{0,5,hello},{5,9,world}] with diarization
        // [{0,6,A},{6,10,B}] must attribute "world" to B (overlap 3 vs 1).
        let store = Arc::new(JobStore::new());
        let sequencer = StageSequencer::new(Arc::clone(&store), happy_collaborators(), 0.1);
        let id = Uuid::new_v4();
        store.create(id);

        let flags = JobFlags {
            summary: false,
            dialogue: true,
            actions: false,
        };
        sequencer.run(id, &audio(), flags).await;

        let dialogue = store.get(id).unwrap().result.unwrap().dialogue.unwrap();
        assert_eq!(dialogue.len(), 2);
        assert_eq!(dialogue[0].speaker, "A");
        assert_eq!(dialogue[0].text, "hello ");
        assert_eq!(dialogue[1].speaker, "B");
        assert_eq!(dialogue[1].text, "world");
    }
}
