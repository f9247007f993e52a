//! Backend entry-point: configuration, tracing, and server startup.

use std::net::SocketAddr;

use backend::server::{self, ServerConfig};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Community meetup backend server.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Community meetup backend server")]
struct Cli {
    /// Socket address to bind, overriding BIND_ADDR.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// PostgreSQL connection URL, overriding DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let mut config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    if let Some(bind) = cli.bind {
        config = config.with_bind_addr(bind);
    }
    if let Some(database_url) = cli.database_url {
        config = config.with_database_url(database_url);
    }

    server::run(config).await
}
