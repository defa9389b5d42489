//! Rental Catalog terminal client
//!
//! Reads one command per line from stdin and prints a plain-text snapshot
//! of the active page after each command. Logs go to stderr.
//!
//! Configuration is read from `--config <path>`, or from
//! `<config_dir>/rental-catalog/config.toml` when no path is given. The
//! `RENTAL_API_URL` environment variable overrides `base_url`.

mod app;
mod message;
#[cfg(test)]
mod test_mocks;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use rental_catalog_api::HttpRentalApi;
use rental_catalog_core::{ClientConfig, PageContext};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use app::App;

const CONFIG_DIR: &str = "rental-catalog";
const CONFIG_FILE: &str = "config.toml";
const URL_ENV: &str = "RENTAL_API_URL";

const USAGE: &str = "usage: rental-catalog [--config <path>]";

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the page snapshots
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = load_config(args.config.as_deref(), std::env::var(URL_ENV).ok())?;
    tracing::info!(
        "Using {} (page size {}, debounce {} ms)",
        config.base_url,
        config.page_size,
        config.search_debounce_ms
    );

    let api = HttpRentalApi::builder(config.base_url.as_str())
        .max_retries(config.max_retries)
        .timeout(config.request_timeout())
        .build()
        .context("failed to build HTTP client")?;

    let ctx = PageContext::new(Arc::new(api), config);
    let app = App::new(ctx).await;
    app::run(app).await
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
}

/// `Ok(None)` means help was requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Option<Args>> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            other => bail!("unexpected argument `{other}`\n{USAGE}"),
        }
    }
    Ok(Some(parsed))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn load_config(
    path: Option<&std::path::Path>,
    url_override: Option<String>,
) -> anyhow::Result<ClientConfig> {
    let mut config = match path.map(PathBuf::from).or_else(default_config_path) {
        Some(path) => ClientConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            tracing::warn!("No config directory on this platform, using defaults");
            ClientConfig::default()
        }
    };
    if let Some(url) = url_override.filter(|url| !url.trim().is_empty()) {
        tracing::debug!("{URL_ENV} overrides base_url");
        config.base_url = url;
    }
    Ok(config.validated())
}
