//! Deluge Prometheus Exporter
//!
//! A Prometheus metrics exporter for the Deluge torrent client, talking to the
//! Deluge Web UI JSON-RPC API.
//!
//! # Overview
//!
//! On every scrape the exporter asks the Web UI for its current state, logging in
//! and connecting the Web UI to a daemon first when needed, and translates torrent
//! states, labels, session stats and per-torrent counters into Prometheus gauges.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    HTTP POST /json    ┌──────────────┐
//! │  Deluge     │ ◄───────────────────► │   Exporter   │
//! │  Web UI     │  JSON-RPC + cookie    │              │
//! └─────────────┘                       │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                       │  │Session │  │ ◄────────────► │ Prometheus │
//!                                       │  └────────┘  │   /metrics     └────────────┘
//!                                       │  ┌────────┐  │
//!                                       │  │ Mapper │  │
//!                                       │  └────────┘  │
//!                                       └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`deluge`] - JSON-RPC transport, session state machine and API types
//! - [`mapper`] - Snapshot to observation mapping
//! - [`collector`] - Per-scrape orchestration
//! - [`metrics`] - Prometheus text rendering
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use deluge_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     config.validate()?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod deluge;
pub mod error;
pub mod mapper;
pub mod metrics;
pub mod server;
