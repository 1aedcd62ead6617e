use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ytsum::youtube::TranscriptSource;
use ytsum::{Segment, VideoId};

#[derive(Clone, Default)]
pub enum Behaviour {
    #[default]
    Succeed,
    Fail(String),
    Panic,
}

#[derive(Clone, Default)]
pub struct MockTranscripts {
    pub segments: Vec<Segment>,
    pub behaviour: Behaviour,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranscripts {
    pub fn new(texts: &[&str]) -> Self {
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Segment {
                text: text.to_string(),
                offset_ms: i as u64 * 2000,
                duration_ms: 2000,
            })
            .collect();
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            behaviour: Behaviour::Fail(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            behaviour: Behaviour::Panic,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TranscriptSource for MockTranscripts {
    async fn fetch_transcript(&self, video_id: &VideoId) -> eyre::Result<Vec<Segment>> {
        self.calls.lock().unwrap().push(video_id.to_string());
        match &self.behaviour {
            Behaviour::Succeed => Ok(self.segments.clone()),
            Behaviour::Fail(msg) => Err(eyre::eyre!("{msg}")),
            Behaviour::Panic => panic!("transcript parser exploded"),
        }
    }
}
