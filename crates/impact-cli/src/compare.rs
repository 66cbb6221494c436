//! `compare` command: one search, assembled exactly as the HTTP endpoint
//! would, printed as pretty JSON.

use impact_shopping::{
    assemble, parse_price_bound, CompareParams, Condition, MerchantEntry, PriceBounds,
    ShoppingClient, SortMode,
};

/// Builds comparison parameters from raw flag values.
///
/// Refinements are parsed leniently, so a bad `--min-price` is ignored
/// rather than rejected. Only a blank query is an error.
pub(crate) fn build_params(
    query: &str,
    sort: Option<&str>,
    min_price: Option<&str>,
    max_price: Option<&str>,
    condition: Option<&str>,
    location: Option<String>,
) -> anyhow::Result<CompareParams> {
    let query = query.trim().to_string();
    if query.is_empty() {
        anyhow::bail!("query must not be blank");
    }

    Ok(CompareParams {
        query,
        sort: SortMode::parse_lenient(sort),
        location,
        bounds: PriceBounds {
            min: parse_price_bound(min_price),
            max: parse_price_bound(max_price),
        },
        condition: Condition::parse_lenient(condition),
        tbs: None,
    })
}

/// Runs the search and merchant lookup concurrently and prints the result.
///
/// # Errors
///
/// Returns an error if `SERPAPI_KEY` is unset, the upstream search fails,
/// or merchants cannot be loaded.
pub(crate) async fn run_compare(
    pool: &sqlx::PgPool,
    config: &impact_core::AppConfig,
    params: &CompareParams,
) -> anyhow::Result<()> {
    let api_key = config
        .serpapi_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SERPAPI_KEY is not set; cannot run compare"))?;

    let client = ShoppingClient::with_base_url(
        api_key,
        config.search_locale.clone(),
        config.http_timeout_secs,
        &config.http_user_agent,
        &config.serpapi_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build shopping client: {e}"))?;

    let request = params.search_request();
    let (response, rows) = tokio::try_join!(
        async { client.search(&request).await.map_err(anyhow::Error::from) },
        async {
            impact_db::list_active_merchants(pool)
                .await
                .map_err(anyhow::Error::from)
        },
    )?;

    let merchants: Vec<MerchantEntry> = rows.into_iter().map(MerchantEntry::from).collect();
    let result = assemble(response, &merchants, params);
    tracing::info!(
        query = %params.query,
        sort = %params.sort,
        products = result.products.len(),
        "comparison assembled"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
