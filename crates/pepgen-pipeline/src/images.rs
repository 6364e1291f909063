//! Image pipeline: a featured image plus up to three section images, each
//! generated with a bounded retry budget and uploaded to object storage.
//!
//! Nothing here fails the run. An image whose generation retries are
//! exhausted, or whose upload fails, is simply omitted — the article
//! publishes without it.

use std::time::Duration;

use pepgen_core::content::{slugify, ContentImage, GeneratedImages};
use pepgen_genai::image::generate_image;
use pepgen_genai::{with_retry, GenAiClient, GenAiError, RetryOutcome, RetryPolicy};

use crate::storage::StorageClient;

/// One heading section eligible for an illustration.
#[derive(Debug, Clone)]
pub struct SectionSuggestion {
    /// Heading block id the image will be attached to.
    pub id: String,
    pub title: String,
}

/// At most this many section images per article.
pub const MAX_SECTION_IMAGES: usize = 3;

const FEATURED_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(2));
const SECTION_RETRY: RetryPolicy = RetryPolicy::new(2, Duration::from_secs(2));

/// Generate and upload the article's images.
///
/// The featured image gets three attempts, each section image two, with
/// linear back-off between retryable failures. `regenerate_featured = false`
/// skips the featured image entirely. Section order follows the suggestions;
/// images are generated sequentially — sections are independent and order
/// never affects the final structure.
pub async fn generate_images(
    genai: &GenAiClient,
    storage: &StorageClient,
    title: &str,
    summary: &str,
    sections: &[SectionSuggestion],
    regenerate_featured: bool,
    run_ts: i64,
) -> GeneratedImages {
    let prefix = slug_prefix(title);
    let mut images = GeneratedImages::default();

    if regenerate_featured {
        let prompt = featured_prompt(title, summary);
        let path = format!("articles/{prefix}-{run_ts}.png");
        images.featured_image_url =
            generate_and_upload(genai, storage, FEATURED_RETRY, &prompt, &path, "featured").await;
    }

    for section in sections.iter().take(MAX_SECTION_IMAGES) {
        let prompt = section_prompt(title, &section.title);
        let path = format!("articles/{prefix}-{run_ts}-{}.png", section.id);
        if let Some(image_url) =
            generate_and_upload(genai, storage, SECTION_RETRY, &prompt, &path, &section.id).await
        {
            images.content_images.push(ContentImage {
                section_id: section.id.clone(),
                image_url,
                alt_text: format!("Illustration for the section \"{}\"", section.title),
            });
        }
    }

    images
}

/// Run one image through generate → upload; `None` means it is omitted.
async fn generate_and_upload(
    genai: &GenAiClient,
    storage: &StorageClient,
    policy: RetryPolicy,
    prompt: &str,
    object_path: &str,
    label: &str,
) -> Option<String> {
    let payload = match with_retry(policy, GenAiError::is_retryable, || {
        generate_image(genai, prompt)
    })
    .await
    {
        RetryOutcome::Success(payload) => payload,
        RetryOutcome::Exhausted(err) => {
            tracing::warn!(
                image = label,
                error = %err,
                "image generation exhausted retries; publishing without it"
            );
            return None;
        }
    };

    match storage.upload_png(object_path, payload.bytes).await {
        Ok(url) => Some(url),
        Err(err) => {
            // Upload failures are not retried; same degradation as a failed
            // generation.
            tracing::warn!(
                image = label,
                error = %err,
                "image upload failed; publishing without it"
            );
            None
        }
    }
}

fn featured_prompt(title: &str, summary: &str) -> String {
    format!(
        "Clean editorial illustration for a science article titled \"{title}\". \
         {summary} Muted laboratory palette, no text, no people's faces."
    )
}

fn section_prompt(title: &str, section_title: &str) -> String {
    format!(
        "Minimal scientific illustration for the section \"{section_title}\" of an article \
         titled \"{title}\". Abstract molecular motif, muted palette, no text."
    )
}

/// Slugified title prefix for storage paths, bounded so object keys stay
/// reasonable for long titles.
fn slug_prefix(title: &str) -> String {
    let slug = slugify(title);
    if slug.len() <= 40 {
        slug
    } else {
        slug[..40].trim_end_matches('-').to_owned()
    }
}
