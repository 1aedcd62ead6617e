use async_trait::async_trait;
use eyre::{Result, bail, eyre};
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Segment, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const CLIENT_VERSION: &str = "2.20241126.01.00";

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Ordered, non-empty list of transcript segments
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Vec<Segment>>;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
}

/// One timed-text cue as YouTube reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionCue {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl From<CaptionCue> for Segment {
    fn from(cue: CaptionCue) -> Self {
        Segment {
            duration_ms: cue.end_ms.saturating_sub(cue.start_ms),
            offset_ms: cue.start_ms,
            text: cue.text,
        }
    }
}

/// An InnerTube session: the API key scraped from the home page plus the client context
pub struct InnerTube {
    client: reqwest::Client,
    api_key: String,
    lang: String,
}

/// Player details for one video
pub struct VideoInfo<'a> {
    session: &'a InnerTube,
    pub video_id: VideoId,
    pub title: String,
    pub caption_tracks: Vec<CaptionTrack>,
}

impl InnerTube {
    /// Start a session by reading the InnerTube API key off the YouTube home page
    pub async fn create(client: reqwest::Client, lang: &str) -> Result<Self> {
        debug!("Initializing InnerTube session");

        let page_html = client
            .get("https://www.youtube.com/")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        Ok(Self {
            client,
            api_key,
            lang: lang.to_string(),
        })
    }

    /// Call the player endpoint for a video
    pub async fn get_info(&self, video_id: &VideoId) -> Result<VideoInfo<'_>> {
        let player_url = format!(
            "https://www.youtube.com/youtubei/v1/player?key={}&prettyPrint=false",
            self.api_key
        );

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": CLIENT_VERSION
                }
            },
            "videoId": video_id.as_str()
        });

        debug!("Fetching video info for {video_id}");
        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let title = resp
            .video_details
            .as_ref()
            .and_then(|vd| vd.title.clone())
            .unwrap_or_default();

        let caption_tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .ok_or_else(|| eyre!("no transcript structure in player response for {video_id}"))?;

        Ok(VideoInfo {
            session: self,
            video_id: video_id.clone(),
            title,
            caption_tracks,
        })
    }
}

impl VideoInfo<'_> {
    /// Download and parse the caption track best matching the session language
    pub async fn get_transcript(&self) -> Result<Vec<CaptionCue>> {
        let track = pick_track(&self.caption_tracks, &self.session.lang)
            .ok_or_else(|| eyre!("no captions available for video {}", self.video_id))?;
        debug!("Using caption track: lang={}", track.language_code);

        let caption_xml = self
            .session
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

/// Fetches captions with a fresh InnerTube session per request
pub struct InnerTubeTranscripts {
    client: reqwest::Client,
    lang: String,
}

impl InnerTubeTranscripts {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl TranscriptSource for InnerTubeTranscripts {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Vec<Segment>> {
        let youtube = InnerTube::create(self.client.clone(), &self.lang).await?;
        let info = youtube.get_info(video_id).await?;
        let cues = info.get_transcript().await?;

        if cues.is_empty() {
            bail!("caption track for {video_id} has no cues");
        }

        let segments: Vec<Segment> = cues.into_iter().map(Segment::from).collect();
        debug!("Transcript items fetched for {video_id} ({:?}): {}", info.title, segments.len());
        Ok(segments)
    }
}

fn pick_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == lang)
        .or_else(|| tracks.first())
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from page");
}

fn seconds_to_ms(raw: &[u8]) -> Option<u64> {
    let secs = String::from_utf8_lossy(raw).parse::<f64>().ok()?;
    (secs >= 0.0).then(|| (secs * 1000.0).round() as u64)
}

fn parse_caption_xml(xml: &str) -> Result<Vec<CaptionCue>> {
    use quick_xml::Reader;
    use quick_xml::events::{BytesStart, Event};

    fn timing(e: &BytesStart) -> (Option<u64>, Option<u64>) {
        let mut start = None;
        let mut dur = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"start" => start = seconds_to_ms(&attr.value),
                b"dur" => dur = seconds_to_ms(&attr.value),
                _ => {}
            }
        }
        (start, dur)
    }

    let mut reader = Reader::from_str(xml);
    let mut cues = Vec::new();
    let mut open: Option<(u64, u64)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                open = match timing(e) {
                    (Some(start), dur) => Some((start, start.saturating_add(dur.unwrap_or(0)))),
                    (None, _) => None,
                };
                text.clear();
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"text" => {
                // Self-closing <text .../> is a cue with no words
                if let (Some(start), dur) = timing(e) {
                    cues.push(CaptionCue {
                        start_ms: start,
                        end_ms: start.saturating_add(dur.unwrap_or(0)),
                        text: String::new(),
                    });
                }
            }
            Ok(Event::Text(ref e)) if open.is_some() => {
                let raw_text = e.unescape().unwrap_or_default().to_string();
                text.push_str(&html_escape::decode_html_entities(&raw_text));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                if let Some((start_ms, end_ms)) = open.take() {
                    cues.push(CaptionCue {
                        start_ms,
                        end_ms,
                        text: std::mem::take(&mut text),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(cues)
}
