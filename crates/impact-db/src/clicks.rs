//! Database operations for the `clicks` table (referral tracking).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A click joined with the merchant's display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClickRow {
    pub id: i64,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub user_id: Option<Uuid>,
    pub product_title: Option<String>,
    /// Merchant commission rate at the time of the click.
    pub commission_rate: Decimal,
    /// `pending` until the merchant confirms or rejects the conversion.
    pub status: String,
    pub price: Option<Decimal>,
    pub estimated_gain: Option<Decimal>,
    pub actual_gain: Decimal,
    pub clicked_at: DateTime<Utc>,
}

/// Values for a click about to be recorded.
#[derive(Debug, Clone, Copy)]
pub struct NewClick<'a> {
    pub merchant_id: i64,
    pub user_id: Option<Uuid>,
    pub product_title: Option<&'a str>,
    pub commission_rate: Decimal,
    pub price: Option<Decimal>,
    pub estimated_gain: Option<Decimal>,
}

/// Aggregates shown on a user's profile dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ClickStats {
    /// Sum of confirmed gains across all clicks.
    pub total_donations: Decimal,
    /// Number of distinct merchants clicked through.
    pub merchant_count: i64,
}

/// Records a click with status `pending` and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_click(pool: &PgPool, click: &NewClick<'_>) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO clicks \
             (merchant_id, user_id, product_title, commission_rate, status, price, estimated_gain) \
         VALUES ($1, $2, $3, $4, 'pending', $5, $6) \
         RETURNING id",
    )
    .bind(click.merchant_id)
    .bind(click.user_id)
    .bind(click.product_title)
    .bind(click.commission_rate)
    .bind(click.price)
    .bind(click.estimated_gain)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns a user's click history, newest first, capped at `limit` rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_clicks_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<ClickRow>, DbError> {
    let rows = sqlx::query_as::<_, ClickRow>(
        "SELECT c.id, c.merchant_id, m.name AS merchant_name, c.user_id, c.product_title, \
                c.commission_rate, c.status, c.price, c.estimated_gain, c.actual_gain, c.clicked_at \
         FROM clicks c \
         JOIN merchants m ON m.id = c.merchant_id \
         WHERE c.user_id = $1 \
         ORDER BY c.clicked_at DESC, c.id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Computes the dashboard totals over a user's full click history.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn click_stats_for_user(pool: &PgPool, user_id: Uuid) -> Result<ClickStats, DbError> {
    let stats = sqlx::query_as::<_, ClickStats>(
        "SELECT COALESCE(SUM(actual_gain), 0) AS total_donations, \
                COUNT(DISTINCT merchant_id) AS merchant_count \
         FROM clicks \
         WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
