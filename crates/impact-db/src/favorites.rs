//! Database operations for the `favorites` table.
//!
//! A favorite is either product-scoped (`product_title` set, unique per user
//! and title) or merchant-scoped (`product_title` NULL, unique per user and
//! merchant). Both constraints are enforced by partial unique indexes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `favorites` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FavoriteRow {
    pub id: i64,
    pub user_id: Uuid,
    pub merchant_id: Option<i64>,
    pub product_title: Option<String>,
    pub product_link: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Values for a favorite about to be inserted.
#[derive(Debug, Clone, Copy)]
pub struct NewFavorite<'a> {
    pub user_id: Uuid,
    pub merchant_id: Option<i64>,
    pub product_title: Option<&'a str>,
    pub product_link: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub price: Decimal,
}

/// Returns a user's favorites, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_favorites_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<FavoriteRow>, DbError> {
    let rows = sqlx::query_as::<_, FavoriteRow>(
        "SELECT id, user_id, merchant_id, product_title, product_link, image_url, price, created_at \
         FROM favorites \
         WHERE user_id = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the id of a favorite with the same business key as `favorite`,
/// if one exists.
///
/// Product favorites are keyed by `(user_id, product_title)`; merchant
/// favorites by `(user_id, merchant_id)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_existing_favorite(
    pool: &PgPool,
    favorite: &NewFavorite<'_>,
) -> Result<Option<i64>, DbError> {
    let id = if let Some(title) = favorite.product_title {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM favorites WHERE user_id = $1 AND product_title = $2",
        )
        .bind(favorite.user_id)
        .bind(title)
        .fetch_optional(pool)
        .await?
    } else {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM favorites \
             WHERE user_id = $1 AND merchant_id = $2 AND product_title IS NULL",
        )
        .bind(favorite.user_id)
        .bind(favorite.merchant_id)
        .fetch_optional(pool)
        .await?
    };

    Ok(id)
}

/// Inserts a favorite and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including unique-constraint
/// violations when a concurrent insert won the race (see
/// [`DbError::is_unique_violation`]).
pub async fn insert_favorite(
    pool: &PgPool,
    favorite: &NewFavorite<'_>,
) -> Result<FavoriteRow, DbError> {
    let row = sqlx::query_as::<_, FavoriteRow>(
        "INSERT INTO favorites (user_id, merchant_id, product_title, product_link, image_url, price) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, user_id, merchant_id, product_title, product_link, image_url, price, created_at",
    )
    .bind(favorite.user_id)
    .bind(favorite.merchant_id)
    .bind(favorite.product_title)
    .bind(favorite.product_link)
    .bind(favorite.image_url)
    .bind(favorite.price)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Deletes a favorite by id. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_favorite(pool: &PgPool, id: i64) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes a user's merchant-level favorite. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_merchant_favorite(
    pool: &PgPool,
    user_id: Uuid,
    merchant_id: i64,
) -> Result<u64, DbError> {
    let result = sqlx::query(
        "DELETE FROM favorites \
         WHERE user_id = $1 AND merchant_id = $2 AND product_title IS NULL",
    )
    .bind(user_id)
    .bind(merchant_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
