use impact_core::MerchantConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert merchants from config into the database, keyed by name.
///
/// Returns the number of merchants processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_merchants(pool: &PgPool, merchants: &[MerchantConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for merchant in merchants {
        sqlx::query(
            "INSERT INTO merchants \
                 (name, category, reward_type, commission_rate, search_url, affiliate_suffix, \
                  logo_url, url, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true) \
             ON CONFLICT (name) DO UPDATE SET \
                 category = EXCLUDED.category, \
                 reward_type = EXCLUDED.reward_type, \
                 commission_rate = EXCLUDED.commission_rate, \
                 search_url = EXCLUDED.search_url, \
                 affiliate_suffix = EXCLUDED.affiliate_suffix, \
                 logo_url = EXCLUDED.logo_url, \
                 url = EXCLUDED.url, \
                 is_active = true, \
                 updated_at = NOW()",
        )
        .bind(merchant.name.trim())
        .bind(merchant.category.trim())
        .bind(merchant.reward_type.to_string())
        .bind(merchant.commission_rate)
        .bind(&merchant.search_url)
        .bind(&merchant.affiliate_suffix)
        .bind(&merchant.logo_url)
        .bind(&merchant.url)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
