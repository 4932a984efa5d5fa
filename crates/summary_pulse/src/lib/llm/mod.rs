pub mod gemini;
pub mod summarizer;
pub mod transcriber;
pub mod whisper;

pub use gemini::{GeminiClient, GeminiError};
pub use summarizer::Summarizer;
pub use transcriber::{TranscribeResponse, Transcriber};
pub use whisper::{WhisperConfig, WhisperCpp};
