//! Readability-style main content detection.
//!
//! Every `article`, `main`, `section`, `div` and `body` is scored on how much
//! paragraph prose it holds versus how much of its text sits inside links.
//! Script, style and template text never counts. The best scoring subtree is
//! returned as HTML; callers decide what to do when nothing qualifies.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const MIN_CANDIDATE_TEXT: usize = 140;
const MIN_PARAGRAPH_TEXT: usize = 20;
const MAX_LINK_DENSITY: f32 = 0.75;

/// Text under these is never prose.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

const POSITIVE_KEYWORDS: &[&str] = &[
    "article", "body", "content", "entry", "main", "page", "post", "read", "story", "text",
];
const NEGATIVE_KEYWORDS: &[&str] = &[
    "advert",
    "banner",
    "comment",
    "cookie",
    "footer",
    "header",
    "masthead",
    "menu",
    "nav",
    "newsletter",
    "pagination",
    "popup",
    "promo",
    "related",
    "share",
    "sidebar",
    "social",
    "sponsor",
    "subscribe",
    "widget",
];

static CANDIDATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article, main, section, div, body").expect("Failed to parse candidate selector")
});
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("Failed to parse paragraph selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to parse link selector"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadabilityError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("no element looked like article content")]
    NoCandidate,
}

/// Locate the main content block of `html` and return its outer HTML.
pub fn extract_main_html(html: &str) -> Result<String, ReadabilityError> {
    if html.trim().is_empty() {
        return Err(ReadabilityError::EmptyDocument);
    }

    let document = Html::parse_document(html);
    let mut best: Option<(f32, ElementRef<'_>)> = None;

    for candidate in document.select(&CANDIDATE_SELECTOR) {
        if is_unlikely_candidate(&candidate) {
            continue;
        }

        let score = score_candidate(&candidate);
        if score <= 0.0 {
            continue;
        }

        match &best {
            Some((best_score, _)) if score <= *best_score => {}
            _ => best = Some((score, candidate)),
        }
    }

    best.map(|(score, element)| {
        tracing::debug!(
            tag = element.value().name(),
            score,
            "readability picked content block"
        );
        element.html()
    })
    .ok_or(ReadabilityError::NoCandidate)
}

fn score_candidate(candidate: &ElementRef<'_>) -> f32 {
    let total_len = text_len(candidate);
    if total_len < MIN_CANDIDATE_TEXT {
        return 0.0;
    }

    let link_text_len: usize = candidate.select(&LINK_SELECTOR).map(|a| text_len(&a)).sum();
    let link_density = (link_text_len as f32 / total_len as f32).min(1.0);
    if link_density > MAX_LINK_DENSITY {
        return 0.0;
    }

    // `body` only gets credit for paragraphs written directly under it, so it
    // does not absorb the score of the blocks it contains.
    let paragraphs: Vec<ElementRef<'_>> = if candidate.value().name() == "body" {
        candidate
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "p")
            .collect()
    } else {
        candidate.select(&PARAGRAPH_SELECTOR).collect()
    };

    let mut paragraph_count = 0usize;
    let mut paragraph_text_len = 0usize;
    let mut comma_count = 0usize;
    for p in &paragraphs {
        let len = text_len(p);
        if len < MIN_PARAGRAPH_TEXT {
            continue;
        }
        paragraph_count += 1;
        paragraph_text_len += len;
        comma_count += count_commas(*p);
    }

    let tag_bonus = match candidate.value().name() {
        "article" => 800.0,
        "main" => 650.0,
        "section" => 250.0,
        _ => 0.0,
    };

    let mut score = tag_bonus;
    score += class_weight(candidate) as f32 * 25.0;
    score += paragraph_text_len as f32 * (1.0 - link_density);
    score += paragraph_count as f32 * 120.0;
    score += comma_count as f32 * 20.0;

    if link_density > 0.5 {
        score *= 0.6;
    }

    score
}

/// Text nodes under `element` that are not inside a script-like subtree.
fn prose<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element.descendants().filter_map(move |node| {
        let text = node.value().as_text()?;
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
            });
        (!hidden).then_some(&**text)
    })
}

/// Visible characters, not bytes, so thresholds mean the same for CJK text.
fn text_len(element: &ElementRef<'_>) -> usize {
    prose(*element).map(|t| t.trim().chars().count()).sum()
}

fn count_commas(element: ElementRef<'_>) -> usize {
    prose(element)
        .flat_map(str::chars)
        .filter(|ch| *ch == ',' || *ch == '，')
        .count()
}

/// Lowercased id/class/role tokens, split on whitespace, `-` and `_`.
fn id_class_role_tokens(element: &ElementRef<'_>) -> Vec<String> {
    let value = element.value();
    [value.attr("id"), value.attr("class"), value.attr("role")]
        .into_iter()
        .flatten()
        .flat_map(|attr| attr.split(|c: char| c.is_whitespace() || c == '-' || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// A keyword matches a token it starts: `nav` hits `navbar` but not `canvas`.
fn matching_keywords(tokens: &[String], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|kw| tokens.iter().any(|token| token.starts_with(**kw)))
        .count()
}

fn class_weight(element: &ElementRef<'_>) -> i32 {
    let tokens = id_class_role_tokens(element);
    matching_keywords(&tokens, POSITIVE_KEYWORDS) as i32
        - matching_keywords(&tokens, NEGATIVE_KEYWORDS) as i32
}

fn is_unlikely_candidate(element: &ElementRef<'_>) -> bool {
    let tokens = id_class_role_tokens(element);
    matching_keywords(&tokens, NEGATIVE_KEYWORDS) > 0
        && matching_keywords(&tokens, POSITIVE_KEYWORDS) == 0
}
