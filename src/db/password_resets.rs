use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{PasswordReset, User};

/// Insert or replace the single live reset of a user.
pub async fn upsert(
    pool: &PgPool,
    user_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<PasswordReset, sqlx::Error> {
    sqlx::query_as::<_, PasswordReset>(
        "INSERT INTO password_resets (user_id, token_hash, expires_at) VALUES ($1, $2, $3)
         ON CONFLICT (user_id) DO UPDATE
         SET token_hash = EXCLUDED.token_hash, expires_at = EXCLUDED.expires_at
         RETURNING *",
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Delete an unexpired reset matching the hash and return its user.
/// Expired rows are left in place until replaced.
pub async fn take_valid_by_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "DELETE FROM password_resets pr USING users u
         WHERE pr.user_id = u.id AND pr.token_hash = $1 AND pr.expires_at > now()
         RETURNING u.id, u.email, u.password_hash, u.created_at",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}
