//! Pipeline orchestration.
//!
//! One invocation runs: authorization gate → due check → topic selection →
//! article generation → reconciliation → image generation → persistence →
//! schedule advancement. Every step before persistence short-circuits
//! without side effects; image generation is non-fatal.

use chrono::Utc;
use pepgen_core::content::NewArticle;
use pepgen_core::schedule::TargetLength;
use pepgen_core::GeneratedImages;
use pepgen_genai::{article, topic, GenAiClient};

use crate::error::PipelineError;
use crate::images::{self, SectionSuggestion, MAX_SECTION_IMAGES};
use crate::reconcile::reconcile;
use crate::schedule;
use crate::storage::StorageClient;
use crate::store::{ContentStore, ScheduleStore};
use crate::types::{PublishedArticle, RunOutcome, Trigger};

/// Bound on the duplicate-avoidance context passed to topic selection.
const RECENT_TITLE_LIMIT: i64 = 50;

/// Authorship stamped onto every generated article.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub author_name: String,
    pub author_role: String,
}

impl PipelineConfig {
    /// Derive pipeline settings from the loaded application config.
    #[must_use]
    pub fn from_app_config(config: &pepgen_core::AppConfig) -> Self {
        Self {
            author_name: config.author_name.clone(),
            author_role: config.author_role.clone(),
        }
    }
}

/// The article-generation pipeline, wired to its collaborators.
pub struct Pipeline<S, C> {
    genai: GenAiClient,
    storage: StorageClient,
    schedules: S,
    content: C,
    config: PipelineConfig,
}

impl<S: ScheduleStore, C: ContentStore> Pipeline<S, C> {
    pub fn new(
        genai: GenAiClient,
        storage: StorageClient,
        schedules: S,
        content: C,
        config: PipelineConfig,
    ) -> Self {
        Self {
            genai,
            storage,
            schedules,
            content,
            config,
        }
    }

    /// Run the pipeline once.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Unauthorized`] / [`PipelineError::Forbidden`] from
    ///   the manual-trigger gate, before any side effect.
    /// - [`PipelineError::Generation`] if topic selection or article
    ///   generation fails; the schedule is left untouched so the next tick
    ///   retries at the same due time.
    /// - [`PipelineError::Store`] if a collaborator read or the article
    ///   insert fails; same schedule guarantee.
    pub async fn run(&self, trigger: Trigger) -> Result<RunOutcome, PipelineError> {
        // Step 1: authorization gate. Manual runs need a resolved caller
        // holding the administrative role; scheduled runs carry no end-user
        // identity.
        if let Trigger::Manual { caller, .. } = &trigger {
            let caller = caller.as_ref().ok_or(PipelineError::Unauthorized)?;
            if !self.content.caller_is_admin(caller.user_id).await? {
                return Err(PipelineError::Forbidden);
            }
        }

        let force = trigger.force();
        let now = Utc::now();
        let schedule = self.schedules.load().await?;

        // Step 2: due check, skipped entirely when forced.
        if !force && !schedule::is_due(schedule.as_ref(), now, false) {
            let reason = match &schedule {
                None => "no schedule configured",
                Some(s) if !s.active => "schedule is inactive",
                Some(_) => "not due yet",
            };
            tracing::info!(reason, "pipeline: skipping run");
            return Ok(RunOutcome::NotDue { reason });
        }

        let target_length = schedule
            .as_ref()
            .map_or(TargetLength::Standard, |s| s.target_length);
        let steering = schedule
            .as_ref()
            .and_then(|s| s.additional_context.clone());

        // Step 3: topic selection against recent titles and the catalog.
        let existing_titles = self.content.recent_titles(RECENT_TITLE_LIMIT).await?;
        let categories = self.content.list_categories().await?;
        let peptides = self.content.list_peptides().await?;

        let topic = topic::select_topic(
            &self.genai,
            &existing_titles,
            &peptides,
            steering.as_deref(),
        )
        .await?;
        tracing::info!(title = %topic.title, keyword = %topic.keyword, "pipeline: topic selected");

        // Step 4: schema-constrained article generation.
        let draft = article::generate_article(
            &self.genai,
            &topic,
            target_length,
            steering.as_deref(),
            &categories,
            &peptides,
        )
        .await?;

        // Step 5: reconcile heading ids and rebuild the ToC from content.
        let (content_blocks, toc) = reconcile(draft.content, draft.table_of_contents);

        // Step 6: images. Failures degrade to missing images, never to a
        // failed run.
        let sections: Vec<SectionSuggestion> = toc
            .iter()
            .take(MAX_SECTION_IMAGES)
            .map(|entry| SectionSuggestion {
                id: entry.id.clone(),
                title: entry.title.clone(),
            })
            .collect();
        let images: GeneratedImages = images::generate_images(
            &self.genai,
            &self.storage,
            &draft.title,
            &draft.summary,
            &sections,
            true,
            now.timestamp(),
        )
        .await;

        // Step 7: persist. This is the first side effect of the run.
        let new_article = NewArticle {
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            summary: draft.summary,
            category: draft.category.clone(),
            table_of_contents: toc,
            content: content_blocks,
            read_time: draft.read_time,
            related_peptides: draft.related_peptides,
            matched_peptide_slugs: draft.matched_peptide_slugs,
            featured_image_url: images.featured_image_url.clone(),
            content_images: images.content_images.clone(),
            published_date: now,
            author_name: self.config.author_name.clone(),
            author_role: self.config.author_role.clone(),
        };
        let article_id = self.content.insert_article(&new_article).await?;
        tracing::info!(
            article_id,
            slug = %draft.slug,
            category = %draft.category,
            "pipeline: article persisted"
        );

        // New-category side effect. Duplicate inserts are expected when two
        // runs race; either way the article is already in.
        if draft.is_new_category {
            if let Err(err) = self
                .content
                .insert_category(&draft.category, &draft.category_label)
                .await
            {
                tracing::warn!(
                    category = %draft.category,
                    error = %err,
                    "pipeline: category insert failed; continuing"
                );
            }
        }

        // Step 8: advance the schedule — only after a successful insert.
        if let Some(s) = &schedule {
            let run = schedule::advance(s, now);
            if let Err(err) = self.schedules.save_run(s.id, &run).await {
                // The article exists; failing the run here would misreport.
                // The un-advanced schedule may produce a duplicate next tick.
                tracing::warn!(
                    schedule_id = s.id,
                    error = %err,
                    "pipeline: schedule advance failed after publish"
                );
            }
        }

        Ok(RunOutcome::Published(PublishedArticle {
            article_id,
            title: draft.title,
            slug: draft.slug,
            category: draft.category,
            featured_image: images.featured_image_url.is_some(),
            content_image_count: images.content_images.len(),
        }))
    }
}
