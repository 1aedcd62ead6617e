use async_trait::async_trait;
use eyre::{Result, bail};
use log::{debug, error};

pub const SUMMARY_MODEL: &str = "claude-sonnet-4-20250514";
pub const MAX_SUMMARY_TOKENS: u32 = 1500;
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Which kind of summary to ask for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryType {
    Brief,
    Keypoints,
    #[default]
    Detailed,
}

impl SummaryType {
    /// Resolve the request's `summaryType`; anything unrecognized means detailed
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some("brief") => SummaryType::Brief,
            Some("keypoints") => SummaryType::Keypoints,
            _ => SummaryType::Detailed,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryType::Brief => "Provide a brief 2-3 sentence summary of this video.",
            SummaryType::Keypoints => "Extract and list the main key points from this video as clear bullet points.",
            SummaryType::Detailed => {
                "Provide a detailed summary of this video, including main topics, key insights, and important details."
            }
        }
    }
}

impl std::fmt::Display for SummaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryType::Brief => write!(f, "brief"),
            SummaryType::Keypoints => write!(f, "keypoints"),
            SummaryType::Detailed => write!(f, "detailed"),
        }
    }
}

pub fn build_prompt(transcript_text: &str, summary_type: SummaryType) -> String {
    format!("{}\n\nVideo Transcript:\n{transcript_text}", summary_type.instruction())
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript_text: &str, summary_type: SummaryType) -> Result<String>;
}

/// Summarizes through the Anthropic Messages API
pub struct AnthropicSummarizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicSummarizer {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_API_URL)
    }

    pub fn with_base_url(client: reqwest::Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": SUMMARY_MODEL,
        "max_tokens": MAX_SUMMARY_TOKENS,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    })
}

#[async_trait]
impl Summarizer for AnthropicSummarizer {
    async fn summarize(&self, transcript_text: &str, summary_type: SummaryType) -> Result<String> {
        debug!("Summarizing via Anthropic API with model {SUMMARY_MODEL} ({summary_type})");

        let prompt = build_prompt(transcript_text, summary_type);

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request_body(&prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!("Anthropic API error body: {body}");
            bail!("Anthropic API returned {}", status.as_u16());
        }

        let json: serde_json::Value = resp.json().await?;
        extract_anthropic_text(&json)
    }
}

/// First text block of a Messages API response
fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    let text = json
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str());

    match text {
        Some(text) => Ok(text.to_string()),
        None => bail!("unexpected Anthropic API response format"),
    }
}
