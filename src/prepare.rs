use thiserror::Error;

use crate::Segment;

/// Longest transcript text (in characters) handed to the summarizer
pub const MAX_TRANSCRIPT_CHARS: usize = 100_000;

/// Appended when the transcript text is cut to `MAX_TRANSCRIPT_CHARS`
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Transcript text is empty")]
    EmptyTranscriptText,
}

/// Transcript text ready for summarization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    pub text: String,
    /// Character count before truncation
    pub original_chars: usize,
    pub truncated: bool,
}

/// Join segment texts in order with a single space
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join the transcript and cut it down to what the summarizer accepts
pub fn prepare(segments: &[Segment]) -> Result<PreparedText, PrepareError> {
    let mut text = join_segments(segments);
    if text.is_empty() {
        return Err(PrepareError::EmptyTranscriptText);
    }

    let original_chars = text.chars().count();
    let truncated = match text.char_indices().nth(MAX_TRANSCRIPT_CHARS) {
        Some((cut, _)) => {
            text.truncate(cut);
            text.push_str(TRUNCATION_MARKER);
            true
        }
        None => false,
    };

    Ok(PreparedText {
        text,
        original_chars,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            offset_ms: 0,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_join_preserves_order() {
        assert_eq!(join_segments(&[seg("A"), seg("B")]), "A B");
        assert_eq!(join_segments(&[seg("B"), seg("A")]), "B A");
    }

    #[test]
    fn test_prepare_short_text_untouched() {
        let prepared = prepare(&[seg("Hello world"), seg("This is a test")]).unwrap();
        assert_eq!(prepared.text, "Hello world This is a test");
        assert_eq!(prepared.original_chars, 26);
        assert!(!prepared.truncated);
    }

    #[test]
    fn test_prepare_no_segments_is_empty() {
        assert_eq!(prepare(&[]), Err(PrepareError::EmptyTranscriptText));
    }

    #[test]
    fn test_prepare_single_empty_segment_is_empty() {
        assert_eq!(prepare(&[seg("")]), Err(PrepareError::EmptyTranscriptText));
    }

    #[test]
    fn test_prepare_several_empty_segments_keep_separators() {
        // Two empty segments still join to a single space
        let prepared = prepare(&[seg(""), seg("")]).unwrap();
        assert_eq!(prepared.text, " ");
    }

    #[test]
    fn test_prepare_exact_limit_not_truncated() {
        let text = "a".repeat(MAX_TRANSCRIPT_CHARS);
        let prepared = prepare(&[seg(&text)]).unwrap();
        assert_eq!(prepared.text.len(), MAX_TRANSCRIPT_CHARS);
        assert!(!prepared.truncated);
    }

    #[test]
    fn test_prepare_truncates_long_text() {
        let text = "a".repeat(MAX_TRANSCRIPT_CHARS + 5_000);
        let prepared = prepare(&[seg(&text)]).unwrap();
        assert!(prepared.truncated);
        assert_eq!(prepared.original_chars, MAX_TRANSCRIPT_CHARS + 5_000);
        assert_eq!(
            prepared.text.chars().count(),
            MAX_TRANSCRIPT_CHARS + TRUNCATION_MARKER.len()
        );
        assert!(prepared.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_prepare_truncates_on_char_boundary() {
        let text = "é".repeat(MAX_TRANSCRIPT_CHARS + 1);
        let prepared = prepare(&[seg(&text)]).unwrap();
        let body = prepared.text.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_TRANSCRIPT_CHARS);
        assert!(body.chars().all(|c| c == 'é'));
    }
}
