use anyhow::Result;
use clap::Parser;
use deluge_exporter::{
    config::{self, Config},
    server,
};
use std::ffi::OsString;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Deluge Web UI base URL (overrides config)
    #[arg(long, env = "DELUGE_URL")]
    deluge_url: Option<String>,

    /// Deluge Web UI password (overrides config)
    #[arg(long, env = "DELUGE_PASSWORD", hide_env_values = true)]
    deluge_password: Option<String>,

    /// Port to listen on for metrics
    #[arg(short, long, env = "LISTEN_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "LISTEN_ADDRESS")]
    addr: Option<String>,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

/// Load `.env` into the process environment, then parse the command line.
///
/// clap reads its `env` fallbacks while parsing, so the `.env` file has to be
/// applied first. Existing environment variables are never overwritten.
fn load_args<I, T>(env_file: Option<&Path>, argv: I) -> std::result::Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // A missing .env file is normal
    if let Some(path) = env_file {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
    Args::try_parse_from(argv)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments, with `.env` values visible to clap
    let args = load_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(url) = args.deluge_url {
        config.deluge.url = Some(url);
    }
    if let Some(password) = args.deluge_password {
        config.deluge.password = Some(secrecy::SecretString::new(password.into()));
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config::log_directive(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Deluge Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
