pub mod builder;

use crate::error::PipelineError;
use crate::llm::Transcriber;
use crate::types::{ArticleInfo, CollectionSummary, SummaryResponse, VideoInfo};
use crate::web::{BlogExtractor, WebExtractor};
use crate::yt::{AudioFetcher, VideoExtractor, VideoSource};
use crate::Summarizer;

/// The core summarization pipeline: one extractor per content family, one
/// summarizer behind them. Route handlers delegate here and only translate
/// [`PipelineError`] into status codes.
pub struct SummaryProcessor<V, A, T, S>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    video: VideoExtractor<V, A, T>,
    web: WebExtractor,
    blog: BlogExtractor,
    summarizer: S,
}

impl<V, A, T, S> SummaryProcessor<V, A, T, S>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    /// YouTube flow: extract metadata + transcript, then summarize the
    /// description and transcript together.
    #[tracing::instrument(skip(self))]
    pub async fn summarize_youtube(&self, url: &str) -> Result<SummaryResponse, PipelineError> {
        let video = self
            .video
            .extract(url)
            .await
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;

        tracing::info!(video_id = %video.video_id, "Starting LLM analysis");
        let content = format!("{}\n{}", video.description, video.transcript);
        let analysis = self
            .summarizer
            .summarize(&video.title, content)
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))?;

        Ok(SummaryResponse {
            video_info: Some(VideoInfo {
                title: video.title,
                thumbnail_url: video.thumbnail_url,
                content_url: url.to_string(),
                channel: video.channel,
                duration: video.duration_seconds,
            }),
            article_info: None,
            analysis,
        })
    }

    /// Raw title + text, no extraction step.
    #[tracing::instrument(skip_all)]
    pub async fn summarize_generic(
        &self,
        title: &str,
        content: &str,
    ) -> Result<SummaryResponse, PipelineError> {
        let analysis = self
            .summarizer
            .summarize(title, content)
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))?;

        Ok(SummaryResponse {
            video_info: None,
            article_info: None,
            analysis,
        })
    }

    /// News/web flow: crawl, optionally bias classification with the
    /// user's memo, summarize.
    #[tracing::instrument(skip(self))]
    pub async fn summarize_web(
        &self,
        url: &str,
        user_memo: Option<&str>,
    ) -> Result<SummaryResponse, PipelineError> {
        let article = self.web.extract(url).await;
        if article.is_error() {
            let message = article.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(PipelineError::Extraction(message));
        }

        tracing::info!(%url, "Starting LLM analysis");
        let analysis = self
            .summarizer
            .summarize(&article.title, apply_memo(&article.content, user_memo))
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))?;

        Ok(SummaryResponse {
            video_info: None,
            article_info: Some(ArticleInfo {
                title: article.title,
                thumbnail_url: article.thumbnail_url,
                content_url: url.to_string(),
                word_count: article.content.chars().count(),
            }),
            analysis,
        })
    }

    /// Blog flow: same shape as the web flow, different extractor.
    #[tracing::instrument(skip(self))]
    pub async fn summarize_blog(
        &self,
        url: &str,
        user_memo: Option<&str>,
    ) -> Result<SummaryResponse, PipelineError> {
        let post = self
            .blog
            .extract(url)
            .await
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;

        tracing::info!(%url, "Starting LLM analysis");
        let analysis = self
            .summarizer
            .summarize(&post.title, apply_memo(&post.content, user_memo))
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))?;

        Ok(SummaryResponse {
            video_info: None,
            article_info: Some(ArticleInfo {
                title: post.title,
                thumbnail_url: post.thumbnail_url,
                content_url: url.to_string(),
                word_count: post.content.chars().count(),
            }),
            analysis,
        })
    }

    /// Higher-level summary over a batch of already-summarized items.
    #[tracing::instrument(skip_all)]
    pub async fn summarize_collection(
        &self,
        items: &[String],
    ) -> Result<CollectionSummary, PipelineError> {
        self.summarizer
            .summarize_collection(items)
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))
    }
}

/// Prepends the user's memo as a bracketed annotation so classification
/// leans toward the user's stated intent.
fn apply_memo(content: &str, user_memo: Option<&str>) -> String {
    match user_memo {
        Some(memo) if !memo.trim().is_empty() => {
            tracing::info!(%memo, "User memo provided");
            format!("[사용자 메모: {memo}]\n\n{content}")
        }
        _ => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_memo_prepends_bracketed_annotation() {
        let content = apply_memo("Samsung announces...", Some("stock impact"));
        assert!(content.starts_with("[사용자 메모: stock impact]\n\n"));
        assert!(content.ends_with("Samsung announces..."));
    }

    #[test]
    fn test_apply_memo_absent_or_blank_leaves_content_untouched() {
        assert_eq!(apply_memo("본문", None), "본문");
        assert_eq!(apply_memo("본문", Some("   ")), "본문");
    }
}
