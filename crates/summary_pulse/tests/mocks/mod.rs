pub mod audio_fetcher;
pub mod summarizer;
pub mod transcriber;
pub mod video_source;
