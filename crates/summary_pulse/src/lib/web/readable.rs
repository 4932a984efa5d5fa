//! Generic article parser for unknown sites, built on readability-style
//! main-content extraction.

use std::sync::LazyLock;

use readability::extractor;
use scraper::{Html, Selector};
use url::Url;

use crate::types::{ExtractionKind, ExtractionResult};
use crate::web::{normalize_whitespace, MISSING_CONTENT};

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

pub(crate) fn parse(html: &str, url: &Url) -> ExtractionResult {
    let product = match extractor::extract(&mut html.as_bytes(), url) {
        Ok(product) => product,
        Err(e) => {
            tracing::error!(%url, error = %e, "Readability parsing failed");
            return ExtractionResult::error(
                url.as_str(),
                "Parse Error",
                format!("본문 추출 실패: {e}"),
                e.to_string(),
            );
        }
    };

    // readability returns the isolated article fragment; the first image
    // in it doubles as the thumbnail.
    let fragment = Html::parse_fragment(&product.content);
    let thumbnail_url = fragment
        .select(&IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    let content = normalize_whitespace(&product.text);
    let content = if content.is_empty() {
        tracing::warn!(%url, "Readability produced no text");
        MISSING_CONTENT.to_string()
    } else {
        content
    };

    ExtractionResult {
        kind: ExtractionKind::General,
        url: url.as_str().to_string(),
        title: product.title,
        content,
        thumbnail_url,
        error: None,
    }
}
