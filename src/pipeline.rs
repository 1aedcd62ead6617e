//! Request pipeline: URL → video ID → metadata → transcript → prepared text → summary.
//!
//! Stages run strictly in order and the first failure ends the request.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::metadata::{MetadataLookup, MetadataSource};
use crate::prepare::{self, PrepareError};
use crate::summarize::{SummaryType, Summarizer};
use crate::youtube::TranscriptSource;
use crate::{Segment, VideoId, VideoMetadata, extract_video_id};

/// Everything returned for a successfully processed video
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,
    pub transcript: Vec<Segment>,
    pub summary: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no URL given")]
    MissingUrl,

    #[error("no video ID in {0:?}")]
    InvalidUrl(String),

    #[error("video {0} not found in catalog")]
    VideoNotFound(VideoId),

    #[error("catalog lookup failed: {0}")]
    CatalogUnavailable(String),

    #[error("transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Transcript text is empty")]
    EmptyTranscriptText,

    #[error("Failed to generate summary: {0}")]
    SummarizationFailed(String),

    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    /// HTTP status code for this failure
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::MissingUrl | PipelineError::InvalidUrl(_) => 400,
            PipelineError::VideoNotFound(_)
            | PipelineError::CatalogUnavailable(_)
            | PipelineError::TranscriptUnavailable(_) => 404,
            PipelineError::EmptyTranscriptText
            | PipelineError::SummarizationFailed(_)
            | PipelineError::Unexpected(_) => 500,
        }
    }

    /// Message shown to the caller
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::MissingUrl => "YouTube URL is required",
            PipelineError::InvalidUrl(_) => "Invalid YouTube URL",
            PipelineError::VideoNotFound(_) | PipelineError::CatalogUnavailable(_) => {
                "Video not found or API key invalid"
            }
            PipelineError::TranscriptUnavailable(_) => {
                "No transcript available for this video. The video may not have captions enabled."
            }
            PipelineError::EmptyTranscriptText
            | PipelineError::SummarizationFailed(_)
            | PipelineError::Unexpected(_) => "An error occurred processing the video",
        }
    }

    /// Short diagnostic string, only for server-side failures
    pub fn details(&self) -> Option<String> {
        (self.status() == 500).then(|| self.to_string())
    }
}

impl From<PrepareError> for PipelineError {
    fn from(e: PrepareError) -> Self {
        match e {
            PrepareError::EmptyTranscriptText => PipelineError::EmptyTranscriptText,
        }
    }
}

/// Runs one video through every stage, holding the clients shared by all requests
pub struct Pipeline {
    metadata: Arc<dyn MetadataSource>,
    transcripts: Arc<dyn TranscriptSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        transcripts: Arc<dyn TranscriptSource>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            metadata,
            transcripts,
            summarizer,
        }
    }

    pub async fn process(&self, url: Option<&str>, summary_type: SummaryType) -> Result<PipelineResult, PipelineError> {
        let url = url.map(str::trim).filter(|u| !u.is_empty()).ok_or(PipelineError::MissingUrl)?;
        info!("Processing {url} (summary: {summary_type})");

        let video_id = extract_video_id(url).ok_or_else(|| PipelineError::InvalidUrl(url.to_string()))?;
        info!("stage=extract video_id={video_id}");

        let metadata = self.fetch_metadata(&video_id).await?;
        let transcript = self.fetch_transcript(&video_id).await?;

        let prepared = prepare::prepare(&transcript).inspect_err(|e| warn!("stage=prepare outcome=failed: {e}"))?;
        info!(
            "stage=prepare chars={} truncated={}",
            prepared.original_chars, prepared.truncated
        );

        let summary = self.summarize(&prepared.text, summary_type).await?;

        Ok(PipelineResult {
            video_id,
            metadata,
            transcript,
            summary,
        })
    }

    async fn fetch_metadata(&self, video_id: &VideoId) -> Result<VideoMetadata, PipelineError> {
        let started = Instant::now();
        let lookup = self.metadata.fetch_metadata(video_id).await;
        let elapsed = started.elapsed();

        match lookup {
            MetadataLookup::Found(metadata) => {
                info!("stage=metadata outcome=found elapsed={elapsed:?} title={:?}", metadata.title);
                Ok(metadata)
            }
            MetadataLookup::NotFound => {
                warn!("stage=metadata outcome=not_found elapsed={elapsed:?}");
                Err(PipelineError::VideoNotFound(video_id.clone()))
            }
            MetadataLookup::TransportError(cause) => {
                error!("stage=metadata outcome=error elapsed={elapsed:?}: {cause}");
                Err(PipelineError::CatalogUnavailable(cause))
            }
        }
    }

    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Vec<Segment>, PipelineError> {
        let started = Instant::now();
        let result = self.transcripts.fetch_transcript(video_id).await;
        let elapsed = started.elapsed();

        match result {
            Ok(segments) if !segments.is_empty() => {
                info!("stage=transcript outcome=ok elapsed={elapsed:?} segments={}", segments.len());
                Ok(segments)
            }
            Ok(_) => {
                warn!("stage=transcript outcome=empty elapsed={elapsed:?}");
                Err(PipelineError::TranscriptUnavailable("transcript has no segments".to_string()))
            }
            Err(e) => {
                error!("stage=transcript outcome=error elapsed={elapsed:?}: {e:#}");
                Err(PipelineError::TranscriptUnavailable(e.to_string()))
            }
        }
    }

    async fn summarize(&self, text: &str, summary_type: SummaryType) -> Result<String, PipelineError> {
        let started = Instant::now();
        let result = self.summarizer.summarize(text, summary_type).await;
        let elapsed = started.elapsed();

        match result {
            Ok(summary) => {
                info!("stage=summarize outcome=ok elapsed={elapsed:?} chars={}", summary.len());
                Ok(summary)
            }
            Err(e) => {
                error!("stage=summarize outcome=error elapsed={elapsed:?}: {e:#}");
                Err(PipelineError::SummarizationFailed(e.to_string()))
            }
        }
    }
}
