pub mod blog;
pub mod naver;
pub mod readable;

use std::sync::LazyLock;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use reqwest::{header, StatusCode};
use url::Url;

use crate::error::ExtractError;
use crate::types::ExtractionResult;

pub use blog::{BlogContent, BlogExtractor};

/// Placeholder used when a page fetched fine but no body container matched.
/// Parse failures degrade to this rather than failing the whole request.
pub(crate) const MISSING_CONTENT: &str = "본문을 찾을 수 없습니다.";

pub(crate) const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

pub(crate) fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

/// Collapses repeated newlines and spaces the same way on every parse path.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let text = NEWLINES.replace_all(text, "\n");
    let text = SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

/// Backoff settings for rate-limited fetches. Only HTTP 429 is retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        let jitter_ms = rand::thread_rng().gen_range(0..=self.max_jitter.as_millis() as u64);
        self.base_delay * 2u32.pow(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Crawls news/web URLs: Naver News gets a site-specific parser, everything
/// else goes through readability.
#[derive(Debug, Clone)]
pub struct WebExtractor {
    client: reqwest::Client,
    retry: RetryPolicy,
    timeout: Duration,
}

impl WebExtractor {
    pub fn new(client: reqwest::Client, retry: RetryPolicy) -> Self {
        WebExtractor {
            client,
            retry,
            timeout: Duration::from_secs(10),
        }
    }

    /// Crawls `url` and extracts title/content/thumbnail. Never panics or
    /// returns a raw error: every failure mode becomes an `Error`-kind
    /// result with a human-readable message.
    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, url_str: &str) -> ExtractionResult {
        let url = match Url::parse(url_str) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => {
                return ExtractionResult::error(
                    url_str,
                    "Invalid URL",
                    "",
                    ExtractError::InvalidScheme(url_str.to_string()).to_string(),
                )
            }
        };

        let html = match self.fetch_html(&url).await {
            Ok(html) => html,
            Err(ExtractError::Timeout) => {
                tracing::error!(%url, "Timeout while fetching");
                return ExtractionResult::error(
                    url_str,
                    "Timeout Error",
                    "요청 시간이 초과되었습니다.",
                    ExtractError::Timeout.to_string(),
                );
            }
            Err(e) => {
                tracing::error!(%url, error = %e, "Request error");
                return ExtractionResult::error(
                    url_str,
                    "Request Error",
                    format!("콘텐츠를 가져올 수 없습니다: {e}"),
                    e.to_string(),
                );
            }
        };

        if is_naver_news(&url) {
            naver::parse(&html, url_str)
        } else {
            readable::parse(&html, &url)
        }
    }

    /// GET with a realistic browser header set and a fresh random
    /// user-agent per attempt. 429 responses back off exponentially with
    /// jitter; all other non-success statuses fail immediately.
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractError> {
        let mut attempt = 0u32;
        loop {
            let response = self
                .client
                .get(url.clone())
                .header(header::USER_AGENT, random_user_agent())
                .header(
                    header::ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header(header::ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.5")
                .timeout(self.timeout)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.retry.max_retries {
                    return Err(ExtractError::RateLimited {
                        attempts: attempt + 1,
                    });
                }
                let delay = self.retry.delay(attempt);
                tracing::warn!(
                    %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                return Err(ExtractError::Http(status.as_u16()));
            }

            return response.text().await.map_err(map_reqwest_error);
        }
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> ExtractError {
    if e.is_timeout() {
        ExtractError::Timeout
    } else {
        ExtractError::Request(e.to_string())
    }
}

pub(crate) fn is_naver_news(url: &Url) -> bool {
    matches!(url.host_str(), Some("news.naver.com") | Some("n.news.naver.com"))
}
