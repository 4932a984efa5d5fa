//! Naver News article parser.
//!
//! Naver serves a stable DOM (`#title_area`, `#dic_area`) that the generic
//! readability pass handles poorly, so it gets dedicated selectors.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::types::{ExtractionKind, ExtractionResult};
use crate::web::{normalize_whitespace, MISSING_CONTENT};

static TITLE_PRIMARY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#title_area span").unwrap());
static TITLE_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2#title_area").unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='og:image']").unwrap());
static MAIN_IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#img1").unwrap());
static PHOTO_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".end_photo_org img").unwrap());
static CONTENT_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#dic_area img").unwrap());
static CONTENT_PRIMARY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#dic_area").unwrap());
static CONTENT_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article#dic_area").unwrap());

/// Photo captions, ads and embedded junk that must not leak into the body
/// text.
static EXCLUDED: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".end_photo_org, .img_desc, .nbd_im_w, script, iframe, style, .ad_area")
        .unwrap()
});

pub(crate) fn parse(html: &str, url: &str) -> ExtractionResult {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_PRIMARY)
        .next()
        .or_else(|| document.select(&TITLE_FALLBACK).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| "제목 없음".to_string());

    let thumbnail_url = find_thumbnail(&document);

    let content = match document
        .select(&CONTENT_PRIMARY)
        .next()
        .or_else(|| document.select(&CONTENT_FALLBACK).next())
    {
        Some(area) => {
            let mut text = String::new();
            collect_text_excluding(area, &EXCLUDED, &mut text);
            normalize_whitespace(&text)
        }
        None => {
            tracing::warn!(%url, "Content area not found");
            MISSING_CONTENT.to_string()
        }
    };

    ExtractionResult {
        kind: ExtractionKind::NaverNews,
        url: url.to_string(),
        title,
        content,
        thumbnail_url,
        error: None,
    }
}

/// Thumbnail waterfall: og:image meta, the lead image (lazy-load attribute
/// before the real src), photo containers, then any image in the body.
fn find_thumbnail(document: &Html) -> Option<String> {
    if let Some(meta) = document.select(&OG_IMAGE).next() {
        if let Some(content) = meta.value().attr("content") {
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }

    if let Some(img) = document.select(&MAIN_IMAGE).next() {
        if let Some(src) = img.value().attr("data-src").or_else(|| img.value().attr("src")) {
            return Some(src.to_string());
        }
    }

    for selector in [&*PHOTO_IMAGE, &*CONTENT_IMAGE] {
        if let Some(img) = document.select(selector).next() {
            if let Some(src) = img.value().attr("src") {
                return Some(src.to_string());
            }
        }
    }

    None
}

/// Depth-first text collection that skips entire subtrees matching
/// `excluded`. scraper's tree is immutable, so filtering happens during
/// the walk instead of decomposing nodes.
fn collect_text_excluding(element: ElementRef<'_>, excluded: &Selector, out: &mut String) {
    if excluded.matches(&element) {
        return;
    }
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            collect_text_excluding(child_el, excluded, out);
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
            out.push('\n');
        }
    }
}
