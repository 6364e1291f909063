//! Article generation: one tool-schema constrained chat call returning the
//! full structured draft, followed by explicit validation.
//!
//! The model is forced to answer through a `create_article` function call so
//! the result is directly parseable — no free-text extraction pass. A reply
//! that parses but violates the draft's semantic rules is rejected as a
//! classified validation failure rather than flowing downstream.

use pepgen_core::content::{slugify, ArticleDraft, ContentBlock, TocEntry};
use pepgen_core::schedule::TargetLength;
use pepgen_core::{Category, Peptide};
use serde::Deserialize;
use serde_json::json;

use crate::client::GenAiClient;
use crate::error::GenAiError;
use crate::topic::TopicDecision;
use crate::types::{ChatMessage, ChatRequest};

/// Tool-call arguments as the model sends them, before validation.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: String,
    summary: String,
    #[serde(default)]
    slug: String,
    category: String,
    #[serde(default)]
    category_label: String,
    #[serde(default)]
    table_of_contents: Vec<TocEntry>,
    content: Vec<ContentBlock>,
    #[serde(default)]
    read_time: String,
    #[serde(default)]
    related_peptides: Vec<String>,
    #[serde(default)]
    matched_peptide_slugs: Vec<String>,
}

fn create_article_tools() -> serde_json::Value {
    json!([{
        "type": "function",
        "function": {
            "name": "create_article",
            "description": "Submit the complete structured article.",
            "parameters": {
                "type": "object",
                "required": ["title", "summary", "category", "content"],
                "properties": {
                    "title": { "type": "string" },
                    "summary": {
                        "type": "string",
                        "description": "Two to three sentence overview of the article."
                    },
                    "slug": {
                        "type": "string",
                        "description": "URL-safe slug derived from the title."
                    },
                    "category": {
                        "type": "string",
                        "description": "Category slug. Prefer an existing one; a new slug is allowed when none fits."
                    },
                    "category_label": {
                        "type": "string",
                        "description": "Human-readable label for the category."
                    },
                    "table_of_contents": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["id", "title"],
                            "properties": {
                                "id": { "type": "string" },
                                "title": { "type": "string" },
                                "level": { "type": "integer" }
                            }
                        }
                    },
                    "content": {
                        "type": "array",
                        "description": "Ordered content blocks. Headings should carry the ids used in the table of contents.",
                        "items": {
                            "type": "object",
                            "required": ["type"],
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["heading", "paragraph", "list", "callout"]
                                },
                                "id": { "type": "string" },
                                "level": { "type": "integer" },
                                "text": { "type": "string" },
                                "items": { "type": "array", "items": { "type": "string" } },
                                "variant": {
                                    "type": "string",
                                    "enum": ["info", "warning", "note"]
                                }
                            }
                        }
                    },
                    "read_time": {
                        "type": "string",
                        "description": "Estimated reading time, e.g. \"8 min read\"."
                    },
                    "related_peptides": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Peptide names discussed in the article."
                    },
                    "matched_peptide_slugs": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Catalog slugs you are confident are contextually relevant."
                    }
                }
            }
        }
    }])
}

const SYSTEM_PROMPT: &str = "You are a science writer for an educational site about research \
peptides. Write a complete, well-structured article on the given topic and submit it with the \
create_article tool. Structure the content as heading, paragraph, list, and callout blocks; \
open with a short introduction, use level-2 headings for the main sections, and include a \
warning callout about research-use-only status where appropriate. Only list peptide slugs in \
matched_peptide_slugs when the article genuinely discusses them.";

/// Generate the full article draft for a chosen topic.
///
/// # Errors
///
/// Propagates client errors; a reply without a tool call is
/// [`GenAiError::MissingPayload`], malformed arguments are
/// [`GenAiError::Deserialize`], and a draft violating the semantic rules is
/// [`GenAiError::Invalid`]. All of these classify as an upstream generation
/// failure for the run.
pub async fn generate_article(
    client: &GenAiClient,
    topic: &TopicDecision,
    target_length: TargetLength,
    steering: Option<&str>,
    categories: &[Category],
    peptides: &[Peptide],
) -> Result<ArticleDraft, GenAiError> {
    let (min_words, max_words) = target_length.word_range();

    let mut user = format!(
        "Topic: {}\nFocus keyword: {}\nWhy this topic: {}\n\nTarget length: {min_words}-{max_words} words.\n",
        topic.title, topic.keyword, topic.reasoning
    );

    if categories.is_empty() {
        user.push_str("\nThere are no existing categories; propose one.\n");
    } else {
        user.push_str("\nExisting categories (slug — label):\n");
        for category in categories {
            user.push_str(&format!("- {} — {}\n", category.slug, category.label));
        }
    }

    if !peptides.is_empty() {
        user.push_str("\nPeptide catalog (name — slug):\n");
        for peptide in peptides {
            user.push_str(&format!("- {} — {}\n", peptide.name, peptide.slug));
        }
    }

    if let Some(context) = steering {
        if !context.trim().is_empty() {
            user.push_str("\nEditorial guidance from the site owner: ");
            user.push_str(context.trim());
            user.push('\n');
        }
    }

    let mut request = ChatRequest::new(
        client.text_model(),
        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)],
    );
    request.tools = Some(create_article_tools());
    request.tool_choice = Some(json!({
        "type": "function",
        "function": { "name": "create_article" }
    }));

    let response = client.chat(&request).await?;
    let arguments = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.tool_calls.into_iter().next())
        .map(|call| call.function.arguments)
        .ok_or_else(|| {
            GenAiError::MissingPayload("article generation returned no tool call".into())
        })?;

    let raw: RawArticle =
        serde_json::from_str(&arguments).map_err(|e| GenAiError::Deserialize {
            context: "create_article arguments".to_owned(),
            source: e,
        })?;

    validate(raw, categories, peptides)
}

/// Normalize and validate the raw tool-call payload into an [`ArticleDraft`].
fn validate(
    raw: RawArticle,
    categories: &[Category],
    peptides: &[Peptide],
) -> Result<ArticleDraft, GenAiError> {
    let title = raw.title.trim().to_owned();
    let summary = raw.summary.trim().to_owned();
    if title.is_empty() {
        return Err(GenAiError::Invalid("article title is empty".to_owned()));
    }
    if summary.is_empty() {
        return Err(GenAiError::Invalid("article summary is empty".to_owned()));
    }
    if raw.content.is_empty() {
        return Err(GenAiError::Invalid("article content is empty".to_owned()));
    }

    let slug = if raw.slug.trim().is_empty() {
        slugify(&title)
    } else {
        slugify(&raw.slug)
    };
    if slug.is_empty() {
        return Err(GenAiError::Invalid(
            "article slug is empty after normalization".to_owned(),
        ));
    }

    let category = slugify(&raw.category);
    if category.is_empty() {
        return Err(GenAiError::Invalid("article category is empty".to_owned()));
    }
    let is_new_category = !categories.iter().any(|c| c.slug == category);
    let category_label = if raw.category_label.trim().is_empty() {
        label_from_slug(&category)
    } else {
        raw.category_label.trim().to_owned()
    };

    // Heading levels outside h1–h4 are treated as unset; the reconciler
    // defaults them when the table of contents is rebuilt.
    let content: Vec<ContentBlock> = raw
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Heading { id, level, text } => ContentBlock::Heading {
                id,
                level: level.filter(|l| (1..=4).contains(l)),
                text,
            },
            other => other,
        })
        .collect();

    // Keep only slugs that exist in the catalog; the model is asked for
    // confident matches but is not trusted on them.
    let mut matched_peptide_slugs = Vec::new();
    for slug in raw.matched_peptide_slugs {
        let slug = slug.trim().to_owned();
        if peptides.iter().any(|p| p.slug == slug) && !matched_peptide_slugs.contains(&slug) {
            matched_peptide_slugs.push(slug);
        }
    }

    let read_time = if raw.read_time.trim().is_empty() {
        estimate_read_time(&content)
    } else {
        raw.read_time.trim().to_owned()
    };

    Ok(ArticleDraft {
        title,
        summary,
        slug,
        category,
        category_label,
        is_new_category,
        table_of_contents: raw.table_of_contents,
        content,
        read_time,
        related_peptides: raw.related_peptides,
        matched_peptide_slugs,
    })
}

fn label_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn estimate_read_time(content: &[ContentBlock]) -> String {
    let words: usize = content
        .iter()
        .map(|block| match block {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph { text }
            | ContentBlock::Callout { text, .. } => text.split_whitespace().count(),
            ContentBlock::List { items } => {
                items.iter().map(|i| i.split_whitespace().count()).sum()
            }
        })
        .sum();
    let minutes = words.div_ceil(200).max(1);
    format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
    use pepgen_core::content::CalloutVariant;

    use super::*;

    fn catalog() -> (Vec<Category>, Vec<Peptide>) {
        let categories = vec![Category {
            slug: "research".to_owned(),
            label: "Research".to_owned(),
        }];
        let peptides = vec![
            Peptide {
                name: "BPC-157".to_owned(),
                slug: "bpc-157".to_owned(),
            },
            Peptide {
                name: "TB-500".to_owned(),
                slug: "tb-500".to_owned(),
            },
        ];
        (categories, peptides)
    }

    fn raw_article() -> RawArticle {
        RawArticle {
            title: "BPC-157 and Tendon Recovery".to_owned(),
            summary: "What the research says.".to_owned(),
            slug: String::new(),
            category: "Research".to_owned(),
            category_label: String::new(),
            table_of_contents: vec![],
            content: vec![
                ContentBlock::Heading {
                    id: Some("overview".to_owned()),
                    level: Some(2),
                    text: "Overview".to_owned(),
                },
                ContentBlock::Paragraph {
                    text: "Peptide research continues.".to_owned(),
                },
            ],
            read_time: String::new(),
            related_peptides: vec!["BPC-157".to_owned()],
            matched_peptide_slugs: vec![
                "bpc-157".to_owned(),
                "bpc-157".to_owned(),
                "ghrp-6".to_owned(),
            ],
        }
    }

    #[test]
    fn validate_normalizes_slug_and_category() {
        let (categories, peptides) = catalog();
        let draft = validate(raw_article(), &categories, &peptides).expect("valid");
        assert_eq!(draft.slug, "bpc-157-and-tendon-recovery");
        assert_eq!(draft.category, "research");
        assert!(!draft.is_new_category);
        assert_eq!(draft.category_label, "Research");
    }

    #[test]
    fn validate_flags_unknown_category_as_new() {
        let (categories, peptides) = catalog();
        let mut raw = raw_article();
        raw.category = "Injury Science".to_owned();
        let draft = validate(raw, &categories, &peptides).expect("valid");
        assert_eq!(draft.category, "injury-science");
        assert!(draft.is_new_category);
        assert_eq!(draft.category_label, "Injury Science");
    }

    #[test]
    fn validate_drops_unknown_and_duplicate_matched_slugs() {
        let (categories, peptides) = catalog();
        let draft = validate(raw_article(), &categories, &peptides).expect("valid");
        assert_eq!(draft.matched_peptide_slugs, vec!["bpc-157".to_owned()]);
    }

    #[test]
    fn validate_rejects_empty_title() {
        let (categories, peptides) = catalog();
        let mut raw = raw_article();
        raw.title = "   ".to_owned();
        assert!(matches!(
            validate(raw, &categories, &peptides),
            Err(GenAiError::Invalid(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_content() {
        let (categories, peptides) = catalog();
        let mut raw = raw_article();
        raw.content.clear();
        assert!(matches!(
            validate(raw, &categories, &peptides),
            Err(GenAiError::Invalid(_))
        ));
    }

    #[test]
    fn validate_clears_out_of_range_heading_levels() {
        let (categories, peptides) = catalog();
        let mut raw = raw_article();
        raw.content.insert(
            0,
            ContentBlock::Heading {
                id: None,
                level: Some(9),
                text: "Way Too Deep".to_owned(),
            },
        );
        let draft = validate(raw, &categories, &peptides).expect("valid");
        assert_eq!(
            draft.content[0],
            ContentBlock::Heading {
                id: None,
                level: None,
                text: "Way Too Deep".to_owned(),
            }
        );
    }

    #[test]
    fn estimate_read_time_counts_all_block_text() {
        let content = vec![
            ContentBlock::Paragraph {
                text: "word ".repeat(400).trim().to_owned(),
            },
            ContentBlock::List {
                items: vec!["a b c".to_owned()],
            },
            ContentBlock::Callout {
                text: "careful now".to_owned(),
                variant: CalloutVariant::Warning,
            },
        ];
        // 405 words at 200 wpm rounds up to 3 minutes.
        assert_eq!(estimate_read_time(&content), "3 min read");
    }

    #[test]
    fn label_from_slug_title_cases_words() {
        assert_eq!(label_from_slug("injury-science"), "Injury Science");
        assert_eq!(label_from_slug("dosing"), "Dosing");
    }
}
