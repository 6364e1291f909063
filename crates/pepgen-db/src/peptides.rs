//! Read access to the peptide catalog.
//!
//! The catalog is owned by the product side of the system; the pipeline only
//! reads canonical names and slugs for entity matching in prompts.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `peptides` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeptideRow {
    pub name: String,
    pub slug: String,
}

/// List the full peptide catalog.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_peptides(pool: &PgPool) -> Result<Vec<PeptideRow>, DbError> {
    let rows =
        sqlx::query_as::<_, PeptideRow>("SELECT name, slug FROM peptides ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(rows)
}
