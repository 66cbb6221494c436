//! Database operations for the `merchants` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `merchants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MerchantRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// `"donation"` or `"cashback"`.
    pub reward_type: String,
    pub commission_rate: Decimal,
    pub search_url: Option<String>,
    pub affiliate_suffix: Option<String>,
    pub logo_url: Option<String>,
    pub url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MerchantRow> for impact_core::MerchantEntry {
    fn from(row: MerchantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            search_url: row.search_url,
            affiliate_suffix: row.affiliate_suffix,
        }
    }
}

/// Optional filters for [`list_merchants`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MerchantFilters<'a> {
    /// Exact category match.
    pub category: Option<&'a str>,
    /// Case-insensitive substring of the merchant name.
    pub name_query: Option<&'a str>,
    /// Restrict to merchants this user has a merchant-level favorite for.
    pub favorites_of: Option<Uuid>,
}

const MERCHANT_COLUMNS: &str = "m.id, m.name, m.category, m.reward_type, m.commission_rate, \
     m.search_url, m.affiliate_suffix, m.logo_url, m.url, m.is_active, m.created_at, m.updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every active merchant, ordered by id.
///
/// Id order is the matching precedence used when pairing search results with
/// merchants, so it must stay stable across calls.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_merchants(pool: &PgPool) -> Result<Vec<MerchantRow>, DbError> {
    let rows = sqlx::query_as::<_, MerchantRow>(&format!(
        "SELECT {MERCHANT_COLUMNS} FROM merchants m WHERE m.is_active ORDER BY m.id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns active merchants matching `filters`, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_merchants(
    pool: &PgPool,
    filters: MerchantFilters<'_>,
) -> Result<Vec<MerchantRow>, DbError> {
    let rows = sqlx::query_as::<_, MerchantRow>(&format!(
        "SELECT {MERCHANT_COLUMNS} \
         FROM merchants m \
         WHERE m.is_active \
           AND ($1::text IS NULL OR m.category = $1) \
           AND ($2::text IS NULL OR strpos(lower(m.name), lower($2)) > 0) \
           AND ($3::uuid IS NULL OR EXISTS ( \
                 SELECT 1 FROM favorites f \
                 WHERE f.user_id = $3 AND f.merchant_id = m.id AND f.product_title IS NULL)) \
         ORDER BY m.name"
    ))
    .bind(filters.category)
    .bind(filters.name_query)
    .bind(filters.favorites_of)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active merchant by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_merchant_by_id(pool: &PgPool, id: i64) -> Result<Option<MerchantRow>, DbError> {
    let row = sqlx::query_as::<_, MerchantRow>(&format!(
        "SELECT {MERCHANT_COLUMNS} FROM merchants m WHERE m.id = $1 AND m.is_active"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
