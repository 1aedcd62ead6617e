pub mod metadata;
pub mod summarizer;
pub mod transcripts;
