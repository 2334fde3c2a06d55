use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{NewSnapshot, Snapshot};
use crate::services::hangul_search::{self, SearchColumn, SearchTerm};

// ==============================================================================
// Snapshot CRUD Operations
// ==============================================================================

pub async fn create_snapshot(pool: &PgPool, new: &NewSnapshot) -> Result<Snapshot, sqlx::Error> {
    sqlx::query_as::<_, Snapshot>(
        r#"
        INSERT INTO snapshots (
            id, user_id, category_id, name, code,
            current_price, previous_close, diff_price, diff_percent,
            register_date, issue
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.category_id)
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.current_price)
    .bind(&new.previous_close)
    .bind(&new.diff_price)
    .bind(&new.diff_percent)
    .bind(&new.register_date)
    .bind(&new.issue)
    .fetch_one(pool)
    .await
}

/// The pre-insert existence check for (user, stock name, register date); the
/// UNIQUE constraint backs it up under concurrency.
pub async fn find_duplicate(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    register_date: &str,
) -> Result<Option<Snapshot>, sqlx::Error> {
    sqlx::query_as::<_, Snapshot>(
        "SELECT * FROM snapshots WHERE user_id = $1 AND name = $2 AND register_date = $3",
    )
    .bind(user_id)
    .bind(name)
    .bind(register_date)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    snapshot_id: Uuid,
) -> Result<Option<Snapshot>, sqlx::Error> {
    sqlx::query_as::<_, Snapshot>(
        "SELECT * FROM snapshots WHERE id = $1 AND user_id = $2",
    )
    .bind(snapshot_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    register_date: Option<&str>,
) -> Result<Vec<Snapshot>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM snapshots WHERE user_id = ");
    builder.push_bind(user_id);

    if let Some(date) = register_date {
        builder.push(" AND register_date = ");
        builder.push_bind(date);
    }

    builder.push(" ORDER BY register_date DESC, created_at DESC");

    builder
        .build_query_as::<Snapshot>()
        .fetch_all(pool)
        .await
}

pub async fn update_snapshot(
    pool: &PgPool,
    snapshot_id: Uuid,
    user_id: Uuid,
    new: &NewSnapshot,
) -> Result<Snapshot, sqlx::Error> {
    sqlx::query_as::<_, Snapshot>(
        r#"
        UPDATE snapshots
        SET category_id = $3,
            current_price = $4,
            previous_close = $5,
            diff_price = $6,
            diff_percent = $7,
            issue = $8,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(snapshot_id)
    .bind(user_id)
    .bind(new.category_id)
    .bind(&new.current_price)
    .bind(&new.previous_close)
    .bind(&new.diff_price)
    .bind(&new.diff_percent)
    .bind(&new.issue)
    .fetch_one(pool)
    .await
}

pub async fn delete_snapshot(
    pool: &PgPool,
    user_id: Uuid,
    snapshot_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM snapshots WHERE id = $1 AND user_id = $2")
        .bind(snapshot_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// ==============================================================================
// Search
// ==============================================================================

/// Fuzzy search over the user's snapshots: the term list renders as a fully
/// parameterized predicate on the chosen column.
pub async fn search_for_user(
    pool: &PgPool,
    user_id: Uuid,
    column: SearchColumn,
    terms: &[SearchTerm],
) -> Result<Vec<Snapshot>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM snapshots WHERE user_id = ");
    builder.push_bind(user_id);
    builder.push(" AND (");
    hangul_search::push_predicate(&mut builder, column, terms);
    builder.push(") ORDER BY register_date DESC, created_at DESC");

    builder
        .build_query_as::<Snapshot>()
        .fetch_all(pool)
        .await
}
