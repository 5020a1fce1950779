use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::models::User;

/// Create an account. The email is trimmed and lowercased before storage so
/// lookups are case-insensitive.
pub async fn sign_up(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    let email = normalize_email(email);
    validate_credentials(&email, password)?;

    let password_hash = hash_password(password)?;
    db::users::create(pool, &email, &password_hash)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(
                    "That email address is already associated with an account.".to_string(),
                )
            }
            _ => AppError::Database(e),
        })
}

pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    let email = normalize_email(email);
    let user = db::users::find_by_email(pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No account found associated with this email.".to_string())
        })?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Provided password is wrong.".to_string()));
    }
    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: i64, password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password must not be empty.".to_string()));
    }
    let password_hash = hash_password(password)?;
    db::users::update_password(pool, user_id, &password_hash).await?;
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(AppError::Validation("Please enter a valid email address.".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password must not be empty.".to_string()));
    }
    Ok(())
}

/// Argon2id, 19 MiB memory, 2 iterations, parallelism 1.
fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|e| AppError::Internal(format!("Invalid argon2 params: {e}")))?;

    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let stored = hash_password("secret").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("secret", &stored).unwrap());
        assert!(!verify_password("Secret", &stored).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_internal() {
        assert!(matches!(
            verify_password("secret", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn credential_validation() {
        assert!(validate_credentials("a@b.com", "secret").is_ok());
        assert!(matches!(
            validate_credentials("ab.com", "secret"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("@b.com", "secret"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("a@b.com", ""),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }
}
