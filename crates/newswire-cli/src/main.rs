mod ingest;
mod query;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newswire-cli")]
#[command(about = "newswire news aggregation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ingestion pass over the configured sources.
    Ingest {
        /// Persist into an in-memory store instead of the database.
        #[arg(long)]
        dry_run: bool,
        /// Only ingest the source for this country.
        #[arg(long)]
        country: Option<String>,
        /// Also write the deduplicated batch to this JSON file.
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Print the configured sources and their endpoints.
    Sources,
    /// Print stored news items as JSON.
    Query {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        language: Option<String>,
        /// `YYYY-MM-DD` or RFC 3339 lower bound on publication time.
        #[arg(long)]
        start_date: Option<String>,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Migrate,
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("newswire-cli: no command given; see --help");
        return Ok(());
    };

    let config = newswire_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Ingest {
            dry_run,
            country,
            json_out,
        } => {
            ingest::run_ingest_command(&config, dry_run, country.as_deref(), json_out.as_deref())
                .await
        }
        Commands::Sources => query::print_sources(&config),
        Commands::Query {
            country,
            language,
            start_date,
        } => {
            let filters = query::build_filters(country, language, start_date.as_deref())?;
            let pool = connect(&config).await?;
            let result = query::run_query(&pool, &filters).await;
            pool.close().await;
            result
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            let result = run_db_command(&pool, &command).await;
            pool.close().await;
            result
        }
    }
}

async fn run_db_command(pool: &sqlx::PgPool, command: &DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Migrate => {
            let applied = newswire_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Ping => {
            newswire_db::ping(pool).await?;
            println!("database reachable");
        }
    }
    Ok(())
}

pub(crate) async fn connect(config: &newswire_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = newswire_db::PoolConfig::from_app_config(config);
    Ok(newswire_db::connect_pool(config.require_database_url()?, pool_config).await?)
}
