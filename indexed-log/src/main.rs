//! Query server binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use indexed_log::server::{CliArgs, QueryServer, QueryServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let opts = args.to_options();
    let config = QueryServerConfig::from(&args);

    tracing::info!(root = %opts.root.display(), port = config.port, "starting indexed-log query server");

    let server = QueryServer::new(opts, config);
    server.run().await;
}
