use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Category;

/// Find-or-create as a single upsert so concurrent calls for the same
/// (user, name) collapse onto one row.
pub async fn find_or_create(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (id, user_id, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT * FROM categories
        WHERE user_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Snapshots referencing the category are orphaned, not deleted; the schema
/// nulls their category reference.
pub async fn delete_category(
    pool: &PgPool,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
