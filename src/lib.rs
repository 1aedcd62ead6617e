pub mod config;
pub mod metadata;
pub mod pipeline;
pub mod prepare;
pub mod server;
pub mod summarize;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Canonical 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Same as [`extract_video_id`]
    pub fn parse(input: &str) -> Option<Self> {
        extract_video_id(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single captioned segment, timed in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub offset_ms: u64,
    pub duration_ms: u64,
}

/// Catalog details for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub channel_title: String,
    /// ISO 8601 duration as reported by the catalog, e.g. `PT3M33S`
    pub duration: String,
    pub thumbnail_url: String,
}

// Checked in order; the first capture wins.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?(?:.*&)?v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"^([a-zA-Z0-9_-]{11})$",
    ]
    .map(|p| Regex::new(p).expect("video id pattern is valid"))
});

/// Extract video ID from a watch, short-link or embed URL, or a bare ID
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<String> {
        extract_video_id(s).map(|v| v.as_str().to_string())
    }

    #[test]
    fn test_bare_video_id() {
        assert_eq!(id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=abc"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_every_shape_round_trips() {
        let ids = ["dQw4w9WgXcQ", "a-b_c-d_e-f", "00000000000", "ZZZZZZZZZZZ", "_-_-_-_-_-_"];
        let shapes = [
            "https://www.youtube.com/watch?v={}",
            "http://youtube.com/watch?v={}&list=PL123",
            "youtube.com/watch?v={}#t=10",
            "https://youtu.be/{}",
            "youtu.be/{}?t=5",
            "https://www.youtube.com/embed/{}",
            "https://www.youtube.com/embed/{}?autoplay=1",
            "{}",
        ];
        for vid in ids {
            for shape in shapes {
                let url = shape.replace("{}", vid);
                assert_eq!(id(&url).as_deref(), Some(vid), "failed for {url}");
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(id("not a url"), None);
        assert_eq!(id("not-a-valid-id"), None);
        assert_eq!(id("dQw4w9WgXc"), None);
        assert_eq!(id("https://vimeo.com/123456789"), None);
        assert_eq!(id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), None);
        assert_eq!(id("https://www.youtube.com/watch?v=short"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(id(""), None);
        assert_eq!(id("   "), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_segment_serializes_camel_case() {
        let seg = Segment {
            text: "hi".to_string(),
            offset_ms: 1500,
            duration_ms: 250,
        };
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi", "offsetMs": 1500, "durationMs": 250}));
    }
}
