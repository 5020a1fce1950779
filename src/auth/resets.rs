use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::auth::accounts::normalize_email;
use crate::auth::tokens::TokenManager;
use crate::db;
use crate::error::AppError;
use crate::models::{PasswordReset, User};

/// Start a password reset for the account behind `email`. Any earlier,
/// unconsumed reset of the same user stops working.
pub async fn create(
    pool: &PgPool,
    tokens: &TokenManager,
    email: &str,
    ttl: Duration,
) -> Result<PasswordReset, AppError> {
    let user = db::users::find_by_email(pool, &normalize_email(email))
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No account found associated with this email.".to_string())
        })?;

    let token = tokens.generate().map_err(AppError::Internal)?;
    let expires_at = Utc::now() + ttl;
    let mut reset =
        db::password_resets::upsert(pool, user.id, &tokens.hash(&token), expires_at).await?;
    reset.token = token;
    reset.email = user.email;

    tracing::info!(user_id = reset.user_id, %expires_at, "Password reset issued");
    Ok(reset)
}

/// Redeem a reset token. Succeeds once per token and only before expiry;
/// unknown and expired tokens fail alike.
pub async fn consume(pool: &PgPool, tokens: &TokenManager, token: &str) -> Result<User, AppError> {
    db::password_resets::take_valid_by_hash(pool, &tokens.hash(token))
        .await?
        .ok_or_else(|| {
            AppError::NotFound("The password reset link is invalid or has expired.".to_string())
        })
}
