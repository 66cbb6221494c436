mod compare;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "impact-cli")]
#[command(about = "Impact price comparison command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Partner merchant directory
    Merchants {
        #[command(subcommand)]
        command: MerchantsCommands,
    },
    /// Run a price comparison and print the assembled JSON
    Compare {
        /// Search term
        query: String,
        /// relevance, price_asc, price_desc or rating
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        /// new or used
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
    /// Upsert merchants from the YAML directory file
    Seed {
        /// Overrides IMPACT_MERCHANTS_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum MerchantsCommands {
    List {
        #[arg(long)]
        category: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("impact-cli: nothing to do (try --help)");
        return Ok(());
    };

    let config = impact_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = impact_db::PoolConfig::from_app_config(&config);
    let pool = impact_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => run_db(&pool, &config, command).await?,
        Commands::Merchants {
            command: MerchantsCommands::List { category },
        } => run_merchants_list(&pool, category.as_deref()).await?,
        Commands::Compare {
            query,
            sort,
            min_price,
            max_price,
            condition,
            location,
        } => {
            let params = compare::build_params(
                &query,
                sort.as_deref(),
                min_price.as_deref(),
                max_price.as_deref(),
                condition.as_deref(),
                location,
            )?;
            compare::run_compare(&pool, &config, &params).await?;
        }
    }

    Ok(())
}

async fn run_db(
    pool: &sqlx::PgPool,
    config: &impact_core::AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            impact_db::ping(pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = impact_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.merchants_path.clone());
            let file = impact_core::load_merchants(&path)?;
            let count = impact_db::seed_merchants(pool, &file.merchants).await?;
            tracing::info!(count, path = %path.display(), "merchants seeded");
            println!("seeded {count} merchant(s)");
        }
    }
    Ok(())
}

async fn run_merchants_list(pool: &sqlx::PgPool, category: Option<&str>) -> anyhow::Result<()> {
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "All");
    let rows = impact_db::list_merchants(
        pool,
        impact_db::MerchantFilters {
            category,
            ..impact_db::MerchantFilters::default()
        },
    )
    .await?;

    for row in &rows {
        println!(
            "{:>4}  {:<24} {:<16} {:>6}%  {}",
            row.id,
            row.name,
            row.category,
            row.commission_rate.to_string(),
            row.search_url.as_deref().unwrap_or("-"),
        );
    }
    println!("{} merchant(s)", rows.len());
    Ok(())
}
