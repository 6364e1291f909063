//! Database operations for the `article_categories` table.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `article_categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub slug: String,
    pub label: String,
}

/// List all known article categories.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT slug, label FROM article_categories ORDER BY slug",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a new category definition.
///
/// A plain insert: attempting to re-insert an existing slug fails with a
/// unique-violation error. The pipeline expects that and swallows it — a
/// duplicate category is not a failure of the run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_category(pool: &PgPool, slug: &str, label: &str) -> Result<(), DbError> {
    sqlx::query("INSERT INTO article_categories (slug, label) VALUES ($1, $2)")
        .bind(slug)
        .bind(label)
        .execute(pool)
        .await?;

    Ok(())
}
