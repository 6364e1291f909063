//! Heading/ToC reconciliation.
//!
//! Generated drafts can drift: headings without ids, ToC entries pointing at
//! nothing. Reconciliation makes the content the single source of truth —
//! heading ids are adopted from the incoming ToC (or derived from the
//! heading text as a last resort), then the ToC is discarded and rebuilt as
//! the ordered projection of the heading blocks. Pure and deterministic; no
//! I/O.

use pepgen_core::content::{slugify, ContentBlock, TocEntry};

/// Reconcile heading ids with the table of contents and rebuild the ToC.
///
/// Pass 1: every heading lacking an id adopts the id of the first ToC entry
/// whose title equals the heading text (case-insensitive, trimmed); if no
/// entry matches, the id is derived by slugifying the heading text so the
/// post-condition below holds unconditionally.
///
/// Pass 2: the incoming ToC is discarded and rebuilt by scanning the patched
/// content in order, one entry per heading with an id and non-empty text,
/// `level` defaulting to 2.
///
/// Post-condition: every heading block with non-empty text has a non-empty
/// id, and the returned ToC is exactly the ordered `(id, text, level)`
/// projection of those headings.
#[must_use]
pub fn reconcile(
    content: Vec<ContentBlock>,
    toc: Vec<TocEntry>,
) -> (Vec<ContentBlock>, Vec<TocEntry>) {
    let content: Vec<ContentBlock> = content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Heading { id, level, text } => {
                let id = match id.filter(|i| !i.trim().is_empty()) {
                    Some(id) => Some(id),
                    None if text.trim().is_empty() => None,
                    None => Some(
                        toc.iter()
                            .find(|entry| titles_match(&entry.title, &text))
                            .map_or_else(|| slugify(&text), |entry| entry.id.clone()),
                    ),
                };
                ContentBlock::Heading { id, level, text }
            }
            other => other,
        })
        .collect();

    let rebuilt: Vec<TocEntry> = content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Heading {
                id: Some(id),
                level,
                text,
            } if !id.is_empty() && !text.trim().is_empty() => Some(TocEntry {
                id: id.clone(),
                title: text.clone(),
                level: level.unwrap_or(2),
            }),
            _ => None,
        })
        .collect();

    (content, rebuilt)
}

fn titles_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
