//! Processing pipeline abstraction.
//!
//! The runner drives any [`VideoPipeline`] through its [`StagePlan`] and
//! reports one event per stage. [`SimulatedPipeline`] stands in for the
//! real media pipeline with fixed pauses and placeholder assets.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use cre8_models::{ClipAsset, Job, JobAssets, JobStatus};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

/// Progress reported by the initial "started" event, before any stage runs.
pub const STARTED_PROGRESS: f64 = 0.1;

/// One discrete step of the processing sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Stable identifier used in logs and errors
    pub name: String,
    /// Status reported once the stage finishes (`running` or `exporting`)
    pub status: JobStatus,
    /// Progress reported once the stage finishes
    pub progress: f64,
    /// Human-readable message sent with the event
    pub message: String,
}

impl Stage {
    pub fn new(
        name: impl Into<String>,
        status: JobStatus,
        progress: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            progress,
            message: message.into(),
        }
    }
}

/// Ordered, validated list of stages.
///
/// Progress values lie in `[STARTED_PROGRESS, 1.0)` and never decrease, and
/// no stage carries a terminal status. Only the runner emits terminal events.
#[derive(Debug, Clone)]
pub struct StagePlan {
    stages: Vec<Stage>,
}

impl StagePlan {
    pub fn new(stages: Vec<Stage>) -> WorkerResult<Self> {
        let mut previous = STARTED_PROGRESS;
        for stage in &stages {
            if stage.status.is_terminal() {
                return Err(WorkerError::invalid_plan(format!(
                    "stage '{}' uses terminal status {}",
                    stage.name, stage.status
                )));
            }
            if !(0.0..1.0).contains(&stage.progress) {
                return Err(WorkerError::invalid_plan(format!(
                    "stage '{}' progress {} outside [0, 1)",
                    stage.name, stage.progress
                )));
            }
            if stage.progress < previous {
                return Err(WorkerError::invalid_plan(format!(
                    "stage '{}' progress {} is below previous {}",
                    stage.name, stage.progress, previous
                )));
            }
            previous = stage.progress;
        }
        Ok(Self { stages })
    }

    /// The reference plan: five `running` updates then `exporting`.
    pub fn reference() -> Self {
        Self {
            stages: vec![
                Stage::new("download", JobStatus::Running, 0.2, "Downloading source video..."),
                Stage::new("analyze", JobStatus::Running, 0.4, "Analyzing video content..."),
                Stage::new("transform", JobStatus::Running, 0.6, "Applying transformations..."),
                Stage::new("effects", JobStatus::Running, 0.8, "Adding effects and audio..."),
                Stage::new("thumbnails", JobStatus::Running, 0.9, "Generating thumbnails..."),
                Stage::new("export", JobStatus::Exporting, 0.95, "Finalizing and uploading..."),
            ],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// What a finished pipeline hands back to the runner.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub assets: JobAssets,
    /// Duration of the source video in seconds
    pub input_duration: u32,
}

/// A video processing pipeline driven stage by stage.
#[async_trait]
pub trait VideoPipeline: Send + Sync {
    /// Stages to execute, in order.
    fn plan(&self) -> &StagePlan;

    /// Perform the work of one stage. An error aborts the job.
    async fn run_stage(&self, job: &Job, stage: &Stage) -> WorkerResult<()>;

    /// Produce the final assets after every stage has run.
    async fn finalize(&self, job: &Job) -> WorkerResult<PipelineOutput>;
}

/// Stand-in pipeline with fixed delays and placeholder outputs.
#[derive(Debug, Clone)]
pub struct SimulatedPipeline {
    plan: StagePlan,
    stage_delay: Duration,
    export_delay: Duration,
    finalize_delay: Duration,
}

impl SimulatedPipeline {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            plan: StagePlan::reference(),
            stage_delay: config.stage_delay,
            export_delay: config.export_delay,
            finalize_delay: config.finalize_delay,
        }
    }

    fn placeholder_assets(job: &Job) -> JobAssets {
        JobAssets {
            clips: vec![ClipAsset {
                url_mp4: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_5mb.mp4".into(),
                url_hls: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_5mb.m3u8".into(),
                thumbs: vec![
                    "https://via.placeholder.com/1080x1920/4A90E2/FFFFFF?text=Cre8+Video+1".into(),
                    "https://via.placeholder.com/1080x1920/50C878/FFFFFF?text=Cre8+Video+2".into(),
                    "https://via.placeholder.com/1080x1920/FF6B6B/FFFFFF?text=Cre8+Video+3".into(),
                ],
                subtitle_vtt: Some("https://example.com/subtitles.vtt".into()),
                duration_sec: 60,
                aspect: job.params.aspect_or_default().to_string(),
                filesize_bytes: 15_728_640,
            }],
        }
    }
}

#[async_trait]
impl VideoPipeline for SimulatedPipeline {
    fn plan(&self) -> &StagePlan {
        &self.plan
    }

    async fn run_stage(&self, job: &Job, stage: &Stage) -> WorkerResult<()> {
        let delay = match stage.status {
            JobStatus::Exporting => self.export_delay,
            _ => self.stage_delay,
        };
        debug!(job_id = %job.id, stage = %stage.name, ?delay, "Simulating stage");
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn finalize(&self, job: &Job) -> WorkerResult<PipelineOutput> {
        tokio::time::sleep(self.finalize_delay).await;
        Ok(PipelineOutput {
            assets: Self::placeholder_assets(job),
            input_duration: 120,
        })
    }
}
