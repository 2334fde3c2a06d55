use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Summary;

/// One note per (user, date); writing again replaces the content.
pub async fn upsert_summary(
    pool: &PgPool,
    user_id: Uuid,
    date: &str,
    content: Option<&str>,
) -> Result<Summary, sqlx::Error> {
    sqlx::query_as::<_, Summary>(
        r#"
        INSERT INTO summaries (id, user_id, date, content)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, date)
        DO UPDATE SET content = $4, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn find_by_date(
    pool: &PgPool,
    user_id: Uuid,
    date: &str,
) -> Result<Option<Summary>, sqlx::Error> {
    sqlx::query_as::<_, Summary>(
        "SELECT * FROM summaries WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Summary>, sqlx::Error> {
    sqlx::query_as::<_, Summary>(
        r#"
        SELECT * FROM summaries
        WHERE user_id = $1
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
