//! Tistory-style blog parser: Open-Graph metadata plus an ordered list of
//! known body containers.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::error::ExtractError;
use crate::web::{map_reqwest_error, random_user_agent, MISSING_CONTENT};

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='og:title']").unwrap());
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='og:description']").unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='og:image']").unwrap());
static PUBLISHED_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='article:published_time']").unwrap());

/// Body containers in priority order, most specific layout first.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["div.entry-content", "div.contents_style", "div.article_view", "article"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

static CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());
static BACKSLASH_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\([\\"'abfnrtv])"#).unwrap());
static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})|\\x([0-9a-fA-F]{2})").unwrap());

#[derive(Debug, Clone, Serialize)]
pub struct BlogContent {
    pub title: String,
    pub content: String,
    pub thumbnail_url: Option<String>,
    pub description: String,
    pub published_time: String,
}

#[derive(Debug, Clone)]
pub struct BlogExtractor {
    client: reqwest::Client,
    timeout: Duration,
}

impl BlogExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        BlogExtractor {
            client,
            timeout: Duration::from_secs(10),
        }
    }

    /// Fetches a blog post and extracts metadata + body text. Network
    /// failures come back as typed errors; a missing body container does
    /// not — that degrades to a placeholder with a warning.
    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, url_str: &str) -> Result<BlogContent, ExtractError> {
        let url = match Url::parse(url_str) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => return Err(ExtractError::InvalidScheme(url_str.to_string())),
        };

        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, random_user_agent())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Http(status.as_u16()));
        }

        let charset = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| CHARSET.captures(ct))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase());

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let html = decode_body(&body, charset.as_deref());

        Ok(parse(&html, url_str))
    }
}

/// Decodes with the response's declared charset, defaulting to utf-8.
/// Undecodable bytes are replaced, not treated as fatal.
fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

pub(crate) fn parse(html: &str, url: &str) -> BlogContent {
    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE);
    let description = meta_content(&document, &OG_DESCRIPTION);
    let thumbnail_url = {
        let img = meta_content(&document, &OG_IMAGE);
        (!img.is_empty()).then_some(img)
    };
    let published_time = meta_content(&document, &PUBLISHED_TIME);

    let content = extract_body(&document);
    if content.is_empty() {
        tracing::warn!(%url, "Content area not found");
    }

    BlogContent {
        title: if title.is_empty() { "제목 없음".to_string() } else { title },
        content: if content.is_empty() { MISSING_CONTENT.to_string() } else { content },
        thumbnail_url,
        description,
        published_time,
    }
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn extract_body(document: &Html) -> String {
    for selector in CONTENT_SELECTORS.iter() {
        if let Some(node) = document.select(selector).next() {
            let text = node
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return remove_escape(&text);
        }
    }
    String::new()
}

/// De-escapes blog text. HTML entities are always decoded; backslash
/// escapes only when a backslash is actually present; `\uXXXX`/`\xXX`
/// only when those literal sequences appear — a bare backslash inside
/// multi-byte text must not trigger unicode decoding.
pub(crate) fn remove_escape(text: &str) -> String {
    let mut s = html_escape::decode_html_entities(text).into_owned();

    if s.contains('\\') {
        s = BACKSLASH_ESCAPE
            .replace_all(&s, |caps: &regex::Captures| {
                match caps.get(1).map(|m| m.as_str()) {
                    Some("\\") => "\\".to_string(),
                    Some("\"") => "\"".to_string(),
                    Some("'") => "'".to_string(),
                    Some("a") => "\u{07}".to_string(),
                    Some("b") => "\u{08}".to_string(),
                    Some("f") => "\u{0c}".to_string(),
                    Some("n") => "\n".to_string(),
                    Some("r") => "\r".to_string(),
                    Some("t") => "\t".to_string(),
                    Some("v") => "\u{0b}".to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned();
    }

    if s.contains("\\u") || s.contains("\\x") {
        s = UNICODE_ESCAPE
            .replace_all(&s, |caps: &regex::Captures| {
                let hex = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
    }

    s
}
