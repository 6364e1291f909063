//! Database operations for the `articles` table.

use pepgen_core::NewArticle;
use sqlx::PgPool;

use crate::DbError;

/// Insert a generated article and return its internal id.
///
/// `content`, `table_of_contents`, and `content_images` are serialized to
/// JSONB using the serde shapes defined in `pepgen-core`.
///
/// # Errors
///
/// Returns [`DbError::Json`] if a JSONB payload cannot be serialized, or
/// [`DbError::Sqlx`] if the insert fails (including slug collisions).
pub async fn insert_article(pool: &PgPool, article: &NewArticle) -> Result<i64, DbError> {
    let toc = serde_json::to_value(&article.table_of_contents)?;
    let content = serde_json::to_value(&article.content)?;
    let content_images = serde_json::to_value(&article.content_images)?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO articles \
         (title, slug, summary, category, table_of_contents, content, read_time, \
          related_peptides, matched_peptide_slugs, featured_image_url, content_images, \
          published_date, author_name, author_role) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING id",
    )
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&article.summary)
    .bind(&article.category)
    .bind(toc)
    .bind(content)
    .bind(&article.read_time)
    .bind(&article.related_peptides)
    .bind(&article.matched_peptide_slugs)
    .bind(&article.featured_image_url)
    .bind(content_images)
    .bind(article.published_date)
    .bind(&article.author_name)
    .bind(&article.author_role)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List the titles of the most recently published articles, newest first.
///
/// Used as duplicate-avoidance context for topic selection; callers pass a
/// bound of at most 50.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_titles(pool: &PgPool, limit: i64) -> Result<Vec<String>, DbError> {
    let titles: Vec<String> = sqlx::query_scalar::<_, String>(
        "SELECT title FROM articles ORDER BY published_date DESC, id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(titles)
}
