use std::net::SocketAddr;
use std::sync::Arc;

use campus::{Campus, RepositoryProvider, SqliteRepositoryProvider, TokenConfig};
use campus_axum::create_router;
use clap::Parser;
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

/// Campus HTTP server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "CAMPUS_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Database connection string
    #[arg(long, env = "CAMPUS_DB_URL")]
    db_url: String,

    /// HS256 secret used to sign access tokens
    #[arg(long, env = "CAMPUS_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// Access token lifetime in hours
    #[arg(long, env = "CAMPUS_TOKEN_LIFETIME_HOURS", default_value_t = 24)]
    token_lifetime_hours: i64,

    /// Issuer claim stamped on access tokens
    #[arg(long, env = "CAMPUS_TOKEN_ISSUER")]
    token_issuer: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let pool = SqlitePool::connect(&cli.db_url).await?;
    let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
    repositories.migrate().await?;

    let mut token_config = TokenConfig::new_hs256(cli.token_secret.into_bytes())
        .with_lifetime(chrono::Duration::hours(cli.token_lifetime_hours));
    if let Some(issuer) = cli.token_issuer {
        token_config = token_config.with_issuer(issuer);
    }

    let campus = Arc::new(Campus::new(repositories, token_config));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let cleanup = campus.start_attempt_cleanup_task(shutdown_rx);

    let router = create_router(campus)
        .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(listen = %cli.listen, "Campus server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = cleanup.await;

    Ok(())
}
