//! HTTP surface: a thin routing shim over [`SummaryProcessor`].

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::error::PipelineError;
use crate::llm::Transcriber;
use crate::types::{CollectionSummary, SummaryResponse};
use crate::yt::{AudioFetcher, VideoSource};
use crate::{Summarizer, SummaryProcessor};

#[derive(Debug, Deserialize)]
pub struct SummarizeUrlRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeGenericRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeMemoRequest {
    pub url: String,
    #[serde(default)]
    pub user_memo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeCollectionRequest {
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Error payload at the HTTP boundary. Extraction failures are the
/// caller's fault (400), analysis and anything unexpected is ours (500).
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let status = match e {
            PipelineError::Extraction(_) => StatusCode::BAD_REQUEST,
            PipelineError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

pub fn router<V, A, T, S>(processor: SummaryProcessor<V, A, T, S>) -> Router
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/summarize/youtube", post(summarize_youtube))
        .route("/api/v1/summarize/generic", post(summarize_generic))
        .route("/api/v1/summarize/naver-news", post(summarize_naver_news))
        .route("/api/v1/summarize/blog", post(summarize_blog))
        .route("/api/v1/summarize/collection", post(summarize_collection))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(processor))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "summary-pulse is running",
    })
}

async fn summarize_youtube<V, A, T, S>(
    State(processor): State<Arc<SummaryProcessor<V, A, T, S>>>,
    Json(request): Json<SummarizeUrlRequest>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    tracing::info!(url = %request.url, "Received YouTube summarization request");
    let response = processor.summarize_youtube(&request.url).await?;
    Ok(Json(response))
}

async fn summarize_generic<V, A, T, S>(
    State(processor): State<Arc<SummaryProcessor<V, A, T, S>>>,
    Json(request): Json<SummarizeGenericRequest>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    tracing::info!(title = %request.title, "Received generic summarization request");
    let response = processor
        .summarize_generic(&request.title, &request.content)
        .await?;
    Ok(Json(response))
}

async fn summarize_naver_news<V, A, T, S>(
    State(processor): State<Arc<SummaryProcessor<V, A, T, S>>>,
    Json(request): Json<SummarizeMemoRequest>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    tracing::info!(url = %request.url, "Received news summarization request");
    let response = processor
        .summarize_web(&request.url, request.user_memo.as_deref())
        .await?;
    Ok(Json(response))
}

async fn summarize_blog<V, A, T, S>(
    State(processor): State<Arc<SummaryProcessor<V, A, T, S>>>,
    Json(request): Json<SummarizeMemoRequest>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    tracing::info!(url = %request.url, "Received blog summarization request");
    let response = processor
        .summarize_blog(&request.url, request.user_memo.as_deref())
        .await?;
    Ok(Json(response))
}

async fn summarize_collection<V, A, T, S>(
    State(processor): State<Arc<SummaryProcessor<V, A, T, S>>>,
    Json(request): Json<SummarizeCollectionRequest>,
) -> Result<Json<CollectionSummary>, ApiError>
where
    V: VideoSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    tracing::info!(items = request.items.len(), "Received collection summarization request");
    let summary = processor.summarize_collection(&request.items).await?;
    Ok(Json(summary))
}
