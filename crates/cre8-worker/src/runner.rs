//! Job runner.
//!
//! Drives one job through its pipeline as a detached task and reports every
//! transition through the [`Notifier`]. Nothing is returned to the HTTP
//! caller; the webhook is the only observable channel.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::Instrument;

use cre8_models::{Job, JobStatus, JobStatusEvent, JobSummary, WebhookTarget};

use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::pipeline::{VideoPipeline, STARTED_PROGRESS};
use crate::webhook::Notifier;

/// Runs accepted jobs in the background.
///
/// Each job is self-contained: the runner holds no per-job state, so any
/// number of jobs may be in flight without coordination.
#[derive(Clone)]
pub struct JobRunner {
    pipeline: Arc<dyn VideoPipeline>,
    notifier: Arc<dyn Notifier>,
}

impl JobRunner {
    pub fn new(pipeline: Arc<dyn VideoPipeline>, notifier: Arc<dyn Notifier>) -> Self {
        Self { pipeline, notifier }
    }

    /// Spawn the job as a detached task.
    ///
    /// The first stage does not start until `release` resolves; intake uses
    /// this to hold processing back until the acknowledgment is on its way.
    pub fn spawn<R>(&self, job: Job, release: R) -> JoinHandle<JobStatus>
    where
        R: Future<Output = ()> + Send + 'static,
    {
        let runner = self.clone();
        let span = JobLogger::new(&job.id, "video_processing").create_span();

        tokio::spawn(
            async move {
                release.await;
                runner.run(job).await
            }
            .instrument(span),
        )
    }

    /// Run the job to its terminal state and return that state.
    ///
    /// Exactly one terminal event is sent. A fault (error or panic) in any
    /// stage stops the sequence and is reported as `failed`.
    pub async fn run(&self, job: Job) -> JobStatus {
        let logger = JobLogger::new(&job.id, "video_processing");
        let sink = EventSink::new(Arc::clone(&self.notifier), job.webhook.clone(), logger.clone());

        logger.log_start("processing started");
        metrics::record_job_started();

        let execution = tokio::spawn(
            execute(Arc::clone(&self.pipeline), sink.clone(), job.clone())
                .instrument(tracing::Span::current()),
        );

        let fault = match execution.await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(e) if e.is_panic() => Some(WorkerError::processing_failed("pipeline panicked")),
            Err(e) => Some(WorkerError::processing_failed(e.to_string())),
        };

        match fault {
            None => {
                logger.log_completion("all stages finished");
                metrics::record_job_completed();
                JobStatus::Completed
            }
            Some(e) => {
                logger.log_error(&e.to_string());
                sink.emit(JobStatusEvent::failed(&job.id, e.to_string())).await;
                metrics::record_job_failed();
                JobStatus::Failed
            }
        }
    }
}

async fn execute(pipeline: Arc<dyn VideoPipeline>, sink: EventSink, job: Job) -> WorkerResult<()> {
    let started = Instant::now();

    sink.emit(JobStatusEvent::running(&job.id, STARTED_PROGRESS, "Video processing started"))
        .await;

    for stage in pipeline.plan().stages() {
        pipeline.run_stage(&job, stage).await?;
        sink.emit(JobStatusEvent::stage(
            &job.id,
            stage.status,
            stage.progress,
            stage.message.clone(),
        ))
        .await;
    }

    let output = pipeline.finalize(&job).await?;
    let summary = JobSummary {
        processing_time_sec: started.elapsed().as_secs(),
        input_duration: output.input_duration,
        output_clips: output.assets.clips.len() as u32,
        total_filesize: output.assets.total_filesize(),
    };

    sink.emit(JobStatusEvent::completed(&job.id, output.assets, summary))
        .await;

    Ok(())
}

/// Numbers and delivers the events of one job, in order.
#[derive(Clone)]
struct EventSink {
    notifier: Arc<dyn Notifier>,
    target: WebhookTarget,
    sequence: Arc<AtomicU32>,
    logger: JobLogger,
}

impl EventSink {
    fn new(notifier: Arc<dyn Notifier>, target: WebhookTarget, logger: JobLogger) -> Self {
        Self {
            notifier,
            target,
            sequence: Arc::new(AtomicU32::new(0)),
            logger,
        }
    }

    async fn emit(&self, event: JobStatusEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = event.with_sequence(sequence);
        self.logger.log_event(&event);
        self.notifier.notify(&self.target, &event).await;
    }
}
