//! Server configuration and CLI arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::LogFileOptions;

/// Command-line arguments for the query server binary.
#[derive(Debug, Parser)]
#[command(name = "indexed-log-server", about = "Time-range query service")]
pub struct CliArgs {
    /// Directory holding the log and sidecar files.
    #[arg(long, default_value = "/tmp")]
    pub root: PathBuf,

    /// Port to listen on.
    #[arg(long, default_value_t = 2151)]
    pub port: u16,

    /// Minimum record bytes between sync points (must match the producer).
    #[arg(long, default_value_t = 32 * 1024)]
    pub bytes_per_node: i64,
}

impl CliArgs {
    /// Builds engine options from the arguments.
    pub fn to_options(&self) -> LogFileOptions {
        LogFileOptions {
            root: self.root.clone(),
            bytes_per_node: self.bytes_per_node,
            tree_depth: 2,
        }
    }
}

/// Runtime configuration for the query server.
#[derive(Debug, Clone)]
pub struct QueryServerConfig {
    /// Port to listen on.
    pub port: u16,
}

impl Default for QueryServerConfig {
    fn default() -> Self {
        Self { port: 2151 }
    }
}

impl From<&CliArgs> for QueryServerConfig {
    fn from(args: &CliArgs) -> Self {
        Self { port: args.port }
    }
}
