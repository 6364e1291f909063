//! Content model for generated articles.
//!
//! These types are the data contract between the generation pipeline and the
//! consumer site: `content` and `table_of_contents` are stored as JSONB in the
//! `articles` table using exactly this serde shape.

use serde::{Deserialize, Serialize};

/// Severity/styling variant for a callout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutVariant {
    Info,
    Warning,
    Note,
}

/// One typed unit of article content.
///
/// Serialized as internally-tagged JSON (`"type": "heading"` etc.). Heading
/// ids are optional on the wire because the generator may omit them; after
/// reconciliation every heading with non-empty text carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<i16>,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        items: Vec<String>,
    },
    Callout {
        text: String,
        variant: CalloutVariant,
    },
}

pub(crate) fn default_toc_level() -> i16 {
    2
}

/// One entry in the navigable article outline.
///
/// The table of contents is always rebuilt from heading blocks, so `id` and
/// `title` mirror a heading's `id` and `text` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    #[serde(default = "default_toc_level")]
    pub level: i16,
}

/// The full structured article produced by the generator, pre-persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub slug: String,
    pub category: String,
    pub category_label: String,
    pub is_new_category: bool,
    pub table_of_contents: Vec<TocEntry>,
    pub content: Vec<ContentBlock>,
    pub read_time: String,
    pub related_peptides: Vec<String>,
    pub matched_peptide_slugs: Vec<String>,
}

/// A generated image attached to one article section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentImage {
    /// Matches the `id` of a heading block in the article content.
    pub section_id: String,
    pub image_url: String,
    pub alt_text: String,
}

/// Images produced for one article. Missing images degrade gracefully:
/// the article is published without them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImages {
    pub featured_image_url: Option<String>,
    pub content_images: Vec<ContentImage>,
}

/// A fully generated article, images attached, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub category: String,
    pub table_of_contents: Vec<TocEntry>,
    pub content: Vec<ContentBlock>,
    pub read_time: String,
    pub related_peptides: Vec<String>,
    pub matched_peptide_slugs: Vec<String>,
    pub featured_image_url: Option<String>,
    pub content_images: Vec<ContentImage>,
    pub published_date: chrono::DateTime<chrono::Utc>,
    pub author_name: String,
    pub author_role: String,
}

/// Generate a URL-safe slug from arbitrary text.
///
/// Lowercases, maps spaces to hyphens, strips everything that is not
/// ASCII-alphanumeric or a hyphen, and collapses hyphen runs.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
