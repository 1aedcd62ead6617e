use async_trait::async_trait;
use eyre::{Result, bail};
use log::{debug, error, warn};
use serde::Deserialize;

use crate::{VideoId, VideoMetadata};

pub const DEFAULT_DATA_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Outcome of a catalog lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLookup {
    Found(VideoMetadata),
    NotFound,
    /// Request or response handling failed; the video may still exist
    TransportError(String),
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_id: &VideoId) -> MetadataLookup;
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

impl From<VideoItem> for VideoMetadata {
    fn from(item: VideoItem) -> Self {
        let Thumbnails { high, medium, default } = item.snippet.thumbnails;
        let thumbnail_url = high.or(medium).or(default).map(|t| t.url).unwrap_or_default();

        VideoMetadata {
            title: item.snippet.title,
            channel_title: item.snippet.channel_title,
            duration: item.content_details.duration,
            thumbnail_url,
        }
    }
}

/// YouTube Data API v3 `videos` lookup
pub struct YouTubeDataApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeDataApi {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_DATA_API_URL)
    }

    pub fn with_base_url(client: reqwest::Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn lookup(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        let url = format!("{}/videos", self.base_url);
        debug!("Fetching metadata for {video_id}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            debug!("YouTube Data API error body: {body}");
            bail!("YouTube Data API returned {}", status.as_u16());
        }

        let body: VideoListResponse = resp.json().await?;
        Ok(first_item(body))
    }
}

fn first_item(body: VideoListResponse) -> Option<VideoMetadata> {
    body.items.into_iter().next().map(VideoMetadata::from)
}

#[async_trait]
impl MetadataSource for YouTubeDataApi {
    async fn fetch_metadata(&self, video_id: &VideoId) -> MetadataLookup {
        match self.lookup(video_id).await {
            Ok(Some(metadata)) => MetadataLookup::Found(metadata),
            Ok(None) => {
                warn!("No catalog entry for video {video_id}");
                MetadataLookup::NotFound
            }
            Err(e) => {
                error!("Error fetching metadata for {video_id}: {e:#}");
                MetadataLookup::TransportError(e.to_string())
            }
        }
    }
}
