use std::path::PathBuf;

use crate::llm::Transcriber;
use crate::web::{BlogExtractor, RetryPolicy, WebExtractor};
use crate::yt::{AudioFetcher, VideoExtractor, VideoSource};
use crate::{Summarizer, SummaryProcessor};

pub struct SummaryProcessorBuilder<V = (), A = (), T = (), S = ()> {
    scratch_dir: PathBuf,
    video_source: V,
    audio_fetcher: A,
    transcriber: T,
    summarizer: S,
    languages: Vec<String>,
    retry_policy: RetryPolicy,
}

impl SummaryProcessorBuilder {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            video_source: (),
            audio_fetcher: (),
            transcriber: (),
            summarizer: (),
            languages: vec!["ko".to_string(), "en".to_string()],
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<V, A, T, S> SummaryProcessorBuilder<V, A, T, S> {
    pub fn video_source<V2: VideoSource + Send + Sync + 'static>(
        self,
        video_source: V2,
    ) -> SummaryProcessorBuilder<V2, A, T, S> {
        SummaryProcessorBuilder {
            scratch_dir: self.scratch_dir,
            video_source,
            audio_fetcher: self.audio_fetcher,
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            languages: self.languages,
            retry_policy: self.retry_policy,
        }
    }

    pub fn audio_fetcher<A2: AudioFetcher + Send + Sync + 'static>(
        self,
        audio_fetcher: A2,
    ) -> SummaryProcessorBuilder<V, A2, T, S> {
        SummaryProcessorBuilder {
            scratch_dir: self.scratch_dir,
            video_source: self.video_source,
            audio_fetcher,
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            languages: self.languages,
            retry_policy: self.retry_policy,
        }
    }

    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> SummaryProcessorBuilder<V, A, T2, S> {
        SummaryProcessorBuilder {
            scratch_dir: self.scratch_dir,
            video_source: self.video_source,
            audio_fetcher: self.audio_fetcher,
            transcriber,
            summarizer: self.summarizer,
            languages: self.languages,
            retry_policy: self.retry_policy,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> SummaryProcessorBuilder<V, A, T, S2> {
        SummaryProcessorBuilder {
            scratch_dir: self.scratch_dir,
            video_source: self.video_source,
            audio_fetcher: self.audio_fetcher,
            transcriber: self.transcriber,
            summarizer,
            languages: self.languages,
            retry_policy: self.retry_policy,
        }
    }

    /// Caption language preference order, most preferred first.
    pub fn languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}

impl<V, A, T, S> SummaryProcessorBuilder<V, A, T, S>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn build(self) -> SummaryProcessor<V, A, T, S> {
        let http_client = reqwest::Client::new();

        SummaryProcessor {
            video: VideoExtractor::new(
                self.video_source,
                self.audio_fetcher,
                self.transcriber,
                http_client.clone(),
                self.scratch_dir,
                self.languages,
            ),
            web: WebExtractor::new(http_client.clone(), self.retry_policy),
            blog: BlogExtractor::new(http_client),
            summarizer: self.summarizer,
        }
    }
}
