//! Tagging admin backend built on adminkit

mod admin;
mod config;
mod entities;
mod migrations;
mod seeder;

use anyhow::Result;
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adminkit-demo", about = "Tagging admin backend built on adminkit")]
struct Args {
    /// Path to a YAML config file
    #[arg(long, env = "ADMINKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address override
    #[arg(long)]
    bind: Option<String>,

    /// Database URL override
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(database_url) = args.database_url {
        cfg.database_url = database_url;
    }

    let db = Database::connect(&cfg.database_url).await?;
    migrations::Migrator::up(&db, None).await?;
    tracing::info!("migrations applied");
    seeder::seed(&db).await?;

    let router =
        admin::build_admin(Arc::new(db), cfg.admin.clone())?.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    tracing::info!(bind = %cfg.bind, "admin server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
