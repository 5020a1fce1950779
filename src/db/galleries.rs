use sqlx::PgPool;

use crate::models::Gallery;

pub async fn create(pool: &PgPool, user_id: i64, title: &str) -> Result<Gallery, sqlx::Error> {
    sqlx::query_as::<_, Gallery>(
        "INSERT INTO galleries (user_id, title, published) VALUES ($1, $2, false) RETURNING *",
    )
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Gallery>, sqlx::Error> {
    sqlx::query_as::<_, Gallery>("SELECT * FROM galleries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Gallery>, sqlx::Error> {
    sqlx::query_as::<_, Gallery>("SELECT * FROM galleries WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Owner is not updatable.
pub async fn update(
    pool: &PgPool,
    id: i64,
    title: &str,
    published: bool,
) -> Result<Gallery, sqlx::Error> {
    sqlx::query_as::<_, Gallery>(
        "UPDATE galleries SET title = $2, published = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(published)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM galleries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
