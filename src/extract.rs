//! Main-content text extraction.
//!
//! The readability pass narrows the page to its article block, boilerplate
//! subtrees are detached from the parsed tree, and the surviving text nodes are
//! joined in document order. When the heuristic finds no block, or its block
//! has no text left after cleanup, the whole document is used instead.

use scraper::{Html, Node};

use crate::error::{AppError, Result};
use crate::readability;

/// Elements deleted together with their whole subtree before text is collected.
const REMOVED_TAGS: &[&str] = &[
    "header", "footer", "nav", "aside", "script", "style", "noscript", "meta", "link", "button",
    "form", "input", "select", "textarea", "template", "iframe", "svg",
];

/// Text directly inside these is code, not prose.
const CODE_TAGS: &[&str] = &["pre", "code"];

/// Extract the readable text of an HTML page.
pub fn extract_text(raw_html: &[u8]) -> Result<String> {
    let html = String::from_utf8_lossy(raw_html);

    match readability::extract_main_html(&html) {
        Ok(main) => {
            let text = clean_text(&main);
            if !text.is_empty() {
                tracing::debug!(chars = text.len(), "extracted visible text from content block");
                return Ok(text);
            }
            tracing::warn!("content block was empty after cleanup, using full document");
        }
        Err(e) => {
            tracing::warn!(reason = %e, "readability found no content block, using full document");
        }
    }

    let text = clean_text(&html);
    if text.is_empty() {
        return Err(AppError::NoContentFound);
    }

    tracing::debug!(chars = text.len(), "extracted visible text");
    Ok(text)
}

fn clean_text(html: &str) -> String {
    let mut document = Html::parse_document(html);
    strip_boilerplate(&mut document);
    visible_text(&document)
}

fn strip_boilerplate(document: &mut Html) {
    let doomed: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| match node.value() {
            Node::Comment(_) => true,
            Node::Element(element) => REMOVED_TAGS.contains(&element.name()),
            _ => false,
        })
        .map(|node| node.id())
        .collect();

    // Ids come from this tree, so every lookup succeeds; nested hits are
    // detached inside an already detached subtree, which is harmless.
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn visible_text(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;

            let parent_is_code = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| CODE_TAGS.contains(&name));
            if parent_is_code {
                return None;
            }

            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
