use std::{fmt::Display, future::Future, path::Path};

pub trait Transcriber {
    type Error: Display;

    fn transcribe(
        &self,
        audio_path: &Path,
    ) -> impl Future<Output = Result<TranscribeResponse, Self::Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct TranscribeResponse {
    pub text: String,
    pub language: String,
}
