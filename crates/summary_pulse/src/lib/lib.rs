pub mod error;
mod llm;
mod processor;
pub mod server;
pub mod tracing;
pub mod types;
pub mod web;
pub mod yt;

pub use llm::gemini;
pub use llm::{
    summarizer::Summarizer,
    transcriber::{TranscribeResponse, Transcriber},
    whisper::{WhisperConfig, WhisperCpp},
};
pub use processor::{builder::SummaryProcessorBuilder, SummaryProcessor};
