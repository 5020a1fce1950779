#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    /// Plaintext token. Only populated right after creation; lookups leave it
    /// empty because only the hash is stored.
    #[sqlx(skip)]
    pub token: String,
    pub token_hash: String,
}
