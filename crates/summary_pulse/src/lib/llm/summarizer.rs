use std::{fmt::Display, future::Future};

use crate::types::{Analysis, CollectionSummary};

/// Fixed category → topic taxonomy embedded in every analysis prompt. Each
/// category ends with a catch-all so the model never has to invent a topic.
pub(crate) const CATEGORY_MAP: &[(&str, &[&str])] = &[
    (
        "IT/과학",
        &["인공지능", "백엔드/인프라", "프론트/모바일", "데이터/보안", "테크 트렌드", "기타"],
    ),
    (
        "국제",
        &["지정학/외교", "미국/중국", "글로벌 비즈니스", "기후/에너지", "기타"],
    ),
    (
        "경제",
        &["주식/투자", "부동산", "가상 화폐", "창업/스타트업", "브랜드/마케팅", "거시경제", "기타"],
    ),
    (
        "문화",
        &["영화/OTT", "음악", "도서/아티클", "팝컬쳐/트렌드", "공간/플레이스", "디자인/예술", "기타"],
    ),
    (
        "생활",
        &["주니어/취업", "업무 생산성", "리더십/조직", "심리/마인드", "건강/리빙", "기타"],
    ),
];

pub trait Summarizer {
    const SUMMARIZER_MODEL: &str;

    type Error: Display;

    fn summarize(
        &self,
        title: impl Into<String> + Send,
        content: impl Into<String> + Send,
    ) -> impl Future<Output = Result<Analysis, Self::Error>> + Send;

    fn summarize_collection(
        &self,
        items: &[String],
    ) -> impl Future<Output = Result<CollectionSummary, Self::Error>> + Send;
}

fn taxonomy_block() -> String {
    let categories = CATEGORY_MAP
        .iter()
        .map(|(category, _)| format!("'{category}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut block = format!("1. 아래 카테고리 중 딱 하나를 선택: [{categories}]\n");
    block.push_str("2. 해당 카테고리의 토픽 중 하나 선택 (없으면 '기타'):\n");
    for (category, topics) in CATEGORY_MAP {
        block.push_str(&format!("   - {category}: {}\n", topics.join(", ")));
    }
    block
}

/// One-shot analysis prompt: classification rules, the output schema with
/// exact field names, then the caller's title/content verbatim.
pub(crate) fn build_analysis_prompt(title: &str, content: &str) -> String {
    format!(
        "당신은 전문 콘텐츠 분석가입니다. 제공된 콘텐츠의 제목과 내용을 분석하여 다음 JSON 형식으로만 답변하세요.\n\
         \n\
         ### 분류 규칙:\n\
         {taxonomy}\
         \n\
         ### 요약 규칙:\n\
         1. small_card_summary: 20자 내외의 아주 짧은 한 줄 요약\n\
         2. medium_card_summary: 핵심 내용 위주의 2~3문장 요약\n\
         3. newsletter_summary: 상세 요약. 반드시 정확히 3개의 객체를 가진 리스트여야 하며, 각 객체는 'title'(소제목)과 'content'(문단 내용)를 포함해야 함.\n\
         \n\
         [콘텐츠 제목]: {title}\n\
         [콘텐츠 원문]: {content}\n",
        taxonomy = taxonomy_block(),
    )
}

/// Collection prompt over already-summarized items: a 3~4 word title for
/// the batch plus one descriptive sentence.
pub(crate) fn build_collection_prompt(items: &[String]) -> String {
    let listing = items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "당신은 전문 콘텐츠 큐레이터입니다. 아래는 이미 요약된 콘텐츠 목록입니다. 목록 전체를 아우르는 요약을 다음 JSON 형식으로만 답변하세요.\n\
         \n\
         ### 출력 규칙:\n\
         1. small_card_summary: 모음 전체를 대표하는 3~4단어 제목\n\
         2. medium_card_summary: 모음 전체를 설명하는 한 문장\n\
         \n\
         [콘텐츠 목록]:\n\
         {listing}\n",
    )
}
