//! HTTP query service for the indexed log.
//!
//! A thin read-side service: it enumerates sidecars under the deployment
//! root, fans range queries out through [`query_range`](crate::query_range),
//! and returns the aggregated records as JSON. The engine itself is never
//! held open by the server; every query restores state from sealed sidecars.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod request;
mod response;

pub use config::{CliArgs, QueryServerConfig};
pub use http::QueryServer;
