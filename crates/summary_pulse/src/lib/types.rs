use serde::{Deserialize, Serialize};

/// Which parser produced an [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtractionKind {
    #[serde(rename = "NAVER_NEWS")]
    NaverNews,
    #[serde(rename = "GENERAL")]
    General,
    #[serde(rename = "ERROR")]
    Error,
}

/// Outcome of crawling a news/web URL.
///
/// `content` is non-empty unless `kind == Error`; `error` is set if and
/// only if `kind == Error`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "type")]
    pub kind: ExtractionKind,
    pub url: String,
    pub title: String,
    pub content: String,
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn error(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        ExtractionResult {
            kind: ExtractionKind::Error,
            url: url.into(),
            title: title.into(),
            content: content.into(),
            thumbnail_url: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ExtractionKind::Error
    }
}

/// Where a video transcript came from. Exactly one source per extraction,
/// never a merge of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    Caption,
    SpeechRecognition,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoData {
    pub video_id: String,
    pub title: String,
    pub duration_seconds: u64,
    pub description: String,
    pub thumbnail_url: String,
    pub channel: String,
    pub transcript: String,
    pub transcript_source: TranscriptSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Structured summary returned by the LLM. Field names match the prompt's
/// output schema verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default = "default_bucket")]
    pub category: String,
    #[serde(default = "default_bucket")]
    pub topic: String,
    #[serde(default)]
    pub small_card_summary: String,
    #[serde(default)]
    pub medium_card_summary: String,
    #[serde(default)]
    pub newsletter_summary: Vec<NewsletterBlock>,
}

fn default_bucket() -> String {
    "기타".to_string()
}

/// Summary over a batch of already-summarized items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    #[serde(default)]
    pub small_card_summary: String,
    #[serde(default)]
    pub medium_card_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail_url: String,
    pub content_url: String,
    pub channel: String,
    pub duration: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleInfo {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub content_url: String,
    pub word_count: usize,
}

/// Final response shape. `video_info` and `article_info` are mutually
/// exclusive: a response describes a video or an article, never both.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_info: Option<VideoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_info: Option<ArticleInfo>,
    pub analysis: Analysis,
}
