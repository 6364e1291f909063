//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring generation tick. The tick runs the same pipeline as the HTTP
//! trigger surfaces, un-forced: the schedule's own due check decides whether
//! anything happens.

use std::sync::Arc;

use pepgen_genai::GenAiClient;
use pepgen_pipeline::{PipelineConfig, RunOutcome, StorageClient, Trigger};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::stores::build_pipeline;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    genai: GenAiClient,
    storage: StorageClient,
    config: Arc<pepgen_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_generation_tick_job(&scheduler, pool, genai, storage, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the recurring generation tick.
///
/// Runs every five minutes by default (`0 */5 * * * *`, configurable via
/// `PEPGEN_SCHEDULE_TICK_CRON`). Each tick performs one un-forced pipeline
/// run; when the schedule is absent, inactive, or not yet due, the run is a
/// cheap no-op.
async fn register_generation_tick_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    genai: GenAiClient,
    storage: StorageClient,
    config: Arc<pepgen_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let cron = config.schedule_tick_cron.clone();
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let genai = genai.clone();
        let storage = storage.clone();
        let config = Arc::clone(&config);

        Box::pin(async move {
            run_generation_tick(&pool, genai, storage, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered generation tick job");
    Ok(())
}

/// Drive one un-forced pipeline run and log the outcome.
async fn run_generation_tick(
    pool: &PgPool,
    genai: GenAiClient,
    storage: StorageClient,
    config: &pepgen_core::AppConfig,
) {
    let pipeline = build_pipeline(
        pool.clone(),
        genai,
        storage,
        PipelineConfig::from_app_config(config),
    );

    match pipeline.run(Trigger::Scheduled { force: false }).await {
        Ok(RunOutcome::Published(published)) => {
            tracing::info!(
                article_id = published.article_id,
                slug = %published.slug,
                featured_image = published.featured_image,
                content_images = published.content_image_count,
                "scheduler: article published"
            );
        }
        Ok(RunOutcome::NotDue { reason }) => {
            tracing::debug!(reason, "scheduler: generation not due");
        }
        Err(e) => {
            // Schedule untouched on failure; the next tick retries.
            tracing::error!(error = %e, "scheduler: generation run failed");
        }
    }
}
