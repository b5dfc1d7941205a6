use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = qwiklink::config::load_from_env()?;
    init_tracing(&config.log_level, &config.log_format);

    config.print_summary();

    qwiklink::server::run(config).await
}

/// Installs the global subscriber. `RUST_LOG` directives take precedence over
/// the configured default level.
fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
