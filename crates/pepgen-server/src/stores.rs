//! Postgres-backed implementations of the pipeline's store seams, plus the
//! pipeline constructor shared by the API handlers and the cron tick.

use async_trait::async_trait;
use pepgen_core::{Category, NewArticle, Peptide, Schedule};
use pepgen_genai::GenAiClient;
use pepgen_pipeline::{
    ContentStore, Pipeline, PipelineConfig, RunTimestamps, ScheduleStore, StorageClient,
    StoreError,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Role granted generation rights in the `user_roles` table.
const ADMIN_ROLE: &str = "admin";

fn store_err(e: impl std::fmt::Display) -> StoreError {
    StoreError(e.to_string())
}

#[derive(Clone)]
pub struct PgScheduleStore {
    pool: PgPool,
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn load(&self) -> Result<Option<Schedule>, StoreError> {
        pepgen_db::load_schedule(&self.pool).await.map_err(store_err)
    }

    async fn save_run(&self, id: i64, run: &RunTimestamps) -> Result<(), StoreError> {
        pepgen_db::update_schedule_run(&self.pool, id, run.last_run_at, run.next_run_at)
            .await
            .map_err(store_err)
    }
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn recent_titles(&self, limit: i64) -> Result<Vec<String>, StoreError> {
        pepgen_db::list_recent_titles(&self.pool, limit)
            .await
            .map_err(store_err)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = pepgen_db::list_categories(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(rows
            .into_iter()
            .map(|row| Category {
                slug: row.slug,
                label: row.label,
            })
            .collect())
    }

    async fn list_peptides(&self) -> Result<Vec<Peptide>, StoreError> {
        let rows = pepgen_db::list_peptides(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(rows
            .into_iter()
            .map(|row| Peptide {
                name: row.name,
                slug: row.slug,
            })
            .collect())
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i64, StoreError> {
        pepgen_db::insert_article(&self.pool, article)
            .await
            .map_err(store_err)
    }

    async fn insert_category(&self, slug: &str, label: &str) -> Result<(), StoreError> {
        pepgen_db::insert_category(&self.pool, slug, label)
            .await
            .map_err(store_err)
    }

    async fn caller_is_admin(&self, user_id: Uuid) -> Result<bool, StoreError> {
        pepgen_db::user_has_role(&self.pool, user_id, ADMIN_ROLE)
            .await
            .map_err(store_err)
    }
}

/// Wire a pipeline to Postgres-backed stores.
pub fn build_pipeline(
    pool: PgPool,
    genai: GenAiClient,
    storage: StorageClient,
    config: PipelineConfig,
) -> Pipeline<PgScheduleStore, PgContentStore> {
    Pipeline::new(
        genai,
        storage,
        PgScheduleStore { pool: pool.clone() },
        PgContentStore { pool },
        config,
    )
}
