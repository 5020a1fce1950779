use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Gallery {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// An image file inside a gallery directory. There is no database row; the
/// file on disk is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub gallery_id: i64,
    pub filename: String,
    pub path: PathBuf,
}
