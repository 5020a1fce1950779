use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordReset {
    pub id: i64,
    pub user_id: i64,
    /// Plaintext token, set only when the reset is created.
    #[sqlx(skip)]
    pub token: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    /// Stored address of the account, set alongside `token`.
    #[sqlx(skip)]
    pub email: String,
}
