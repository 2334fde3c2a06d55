use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Interest;

pub async fn find_interest(
    pool: &PgPool,
    user_id: Uuid,
    stock_code: &str,
) -> Result<Option<Interest>, sqlx::Error> {
    sqlx::query_as::<_, Interest>(
        "SELECT * FROM interests WHERE user_id = $1 AND stock_code = $2",
    )
    .bind(user_id)
    .bind(stock_code)
    .fetch_optional(pool)
    .await
}

/// Idempotent: a concurrent create of the same marker is swallowed by the
/// unique constraint.
pub async fn create_interest(
    pool: &PgPool,
    user_id: Uuid,
    stock_code: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO interests (id, user_id, stock_code)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, stock_code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(stock_code)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_interest(
    pool: &PgPool,
    user_id: Uuid,
    stock_code: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM interests WHERE user_id = $1 AND stock_code = $2")
        .bind(user_id)
        .bind(stock_code)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Interest>, sqlx::Error> {
    sqlx::query_as::<_, Interest>(
        r#"
        SELECT * FROM interests
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
