//! Result payloads carried by `completed` events.

use serde::{Deserialize, Serialize};

/// Artifacts produced by a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAssets {
    pub clips: Vec<ClipAsset>,
}

impl JobAssets {
    pub fn total_filesize(&self) -> u64 {
        self.clips.iter().map(|c| c.filesize_bytes).sum()
    }
}

/// One rendered output clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAsset {
    /// Progressive MP4 download
    pub url_mp4: String,
    /// HLS playlist
    pub url_hls: String,
    /// Thumbnail image URLs
    pub thumbs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_vtt: Option<String>,
    pub duration_sec: u32,
    /// Output aspect ratio, e.g. "9:16"
    pub aspect: String,
    pub filesize_bytes: u64,
}

/// Summary metrics reported alongside the assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub processing_time_sec: u64,
    /// Duration of the source video in seconds
    pub input_duration: u32,
    pub output_clips: u32,
    pub total_filesize: u64,
}
