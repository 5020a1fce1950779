use sqlx::PgPool;

use crate::auth::tokens::TokenManager;
use crate::db;
use crate::error::AppError;
use crate::models::{Session, User};

/// Issue a new session for the user. A user holds at most one session, so
/// this replaces and invalidates any token issued earlier.
pub async fn create(pool: &PgPool, tokens: &TokenManager, user_id: i64) -> Result<Session, AppError> {
    let token = tokens.generate().map_err(AppError::Internal)?;
    let mut session = db::sessions::upsert(pool, user_id, &tokens.hash(&token)).await?;
    session.token = token;
    Ok(session)
}

/// Resolve a presented session token to its user.
pub async fn user(pool: &PgPool, tokens: &TokenManager, token: &str) -> Result<User, AppError> {
    db::sessions::find_user_by_hash(pool, &tokens.hash(token))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session not found".to_string()))
}

/// Deleting an unknown token is not an error.
pub async fn delete(pool: &PgPool, tokens: &TokenManager, token: &str) -> Result<(), AppError> {
    db::sessions::delete_by_hash(pool, &tokens.hash(token)).await?;
    Ok(())
}
