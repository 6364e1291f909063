//! Bearer-token resolution and role checks for manual triggers.
//!
//! Tokens are stored as salted SHA-256 hashes in `api_tokens`; roles live in
//! the `user_roles` assignment table.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Hash a raw bearer token with the deployment salt.
///
/// Output is lowercase hex, matching the `api_tokens.token_hash` column.
#[must_use]
pub fn hash_token(salt: &str, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Resolve a token hash to its owning user, if the token is known.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_user_by_token_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<Uuid>, DbError> {
    let user_id: Option<Uuid> =
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM api_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(pool)
            .await?;

    Ok(user_id)
}

/// Store a new API token hash for a user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including duplicate
/// token hashes).
pub async fn insert_api_token(
    pool: &PgPool,
    token_hash: &str,
    user_id: Uuid,
    label: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query("INSERT INTO api_tokens (token_hash, user_id, label) VALUES ($1, $2, $3)")
        .bind(token_hash)
        .bind(user_id)
        .bind(label)
        .execute(pool)
        .await?;

    Ok(())
}

/// Grant a role to a user. Granting an already-held role is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn grant_role(pool: &PgPool, user_id: Uuid, role: &str) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a user holds the given role in the assignment table.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn user_has_role(pool: &PgPool, user_id: Uuid, role: &str) -> Result<bool, DbError> {
    let found: Option<i32> = sqlx::query_scalar::<_, i32>(
        "SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2",
    )
    .bind(user_id)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_token_is_deterministic() {
        let a = hash_token("salt", "token-1");
        let b = hash_token("salt", "token-1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64, "SHA-256 hex digest length");
    }

    #[test]
    fn hash_token_varies_with_salt_and_token() {
        let base = hash_token("salt", "token-1");
        assert_ne!(base, hash_token("other-salt", "token-1"));
        assert_ne!(base, hash_token("salt", "token-2"));
    }

    #[test]
    fn hash_token_is_lowercase_hex() {
        let h = hash_token("s", "t");
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
