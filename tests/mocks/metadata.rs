use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ytsum::metadata::{MetadataLookup, MetadataSource};
use ytsum::{VideoId, VideoMetadata};

#[derive(Clone)]
pub struct MockMetadata {
    pub lookup: MetadataLookup,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockMetadata {
    pub fn found() -> Self {
        Self::with(MetadataLookup::Found(VideoMetadata {
            title: "Never Gonna Give You Up".to_string(),
            channel_title: "Rick Astley".to_string(),
            duration: "PT3M33S".to_string(),
            thumbnail_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string(),
        }))
    }

    pub fn not_found() -> Self {
        Self::with(MetadataLookup::NotFound)
    }

    pub fn transport_error(msg: &str) -> Self {
        Self::with(MetadataLookup::TransportError(msg.to_string()))
    }

    fn with(lookup: MetadataLookup) -> Self {
        Self {
            lookup,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl MetadataSource for MockMetadata {
    async fn fetch_metadata(&self, video_id: &VideoId) -> MetadataLookup {
        self.calls.lock().unwrap().push(video_id.to_string());
        self.lookup.clone()
    }
}
