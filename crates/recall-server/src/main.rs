use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "recall-server")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "RECALL_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "RECALL_PORT", default_value_t = 5000)]
    port: u16,

    /// SQLite database path (defaults to the user data directory)
    #[arg(long, env = "RECALL_DB")]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db = match &cli.db_path {
        Some(path) => recall_db::Db::open(path)?,
        None => recall_db::Db::open_default()?,
    };

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    eprintln!("recall-server listening on http://{addr}");

    recall_server::serve(listener, db).await?;
    Ok(())
}
