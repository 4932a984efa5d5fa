use std::path::PathBuf;

/// Errors from the web/blog extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid URL scheme: {0}")]
    InvalidScheme(String),
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP error {0}")]
    Http(u16),
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

/// Errors from the video metadata/transcript pipeline.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("metadata extraction failed: {0}")]
    Metadata(String),
    #[error("audio download failed: {0}")]
    AudioDownload(String),
    #[error("audio file not found: {}", .0.display())]
    AudioFileMissing(PathBuf),
    #[error("transcription failed: {0}")]
    Transcription(String),
}

/// Request-level failure, split by who caused it. Extraction failures are
/// the caller's problem (bad URL, dead page); analysis failures are ours
/// or the LLM provider's.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("crawling failed: {0}")]
    Extraction(String),
    #[error("LLM analysis failed: {0}")]
    Analysis(String),
}
