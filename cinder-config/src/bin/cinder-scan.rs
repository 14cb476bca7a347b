//! `cinder-scan`: run one filesystem scan and print the report as JSON.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cinder_config::{ContentType, ScannerConfig, ScannerConfigSource};
use cinder_core::{FilesystemScanner, ScanReport};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "cinder-scan",
    about = "Scan media folders and print the parsed titles as JSON"
)]
struct Cli {
    /// Directories to scan, replacing the configured roots
    roots: Vec<PathBuf>,
    #[arg(long, value_enum)]
    content_type: Option<ContentType>,
    /// Scanner config file (TOML or JSON); skips the environment lookup
    #[arg(long)]
    config: Option<PathBuf>,
    /// Deepest directory level below each root, 0 for no limit
    #[arg(long)]
    max_depth: Option<u32>,
    #[arg(long)]
    include_hidden: bool,
    #[arg(long)]
    follow_symlinks: bool,
    /// Additional directory name glob to prune
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,
    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn apply(&self, config: &mut ScannerConfig) {
        if !self.roots.is_empty() {
            config.roots = self.roots.clone();
        }
        if let Some(content_type) = self.content_type {
            config.content_type = content_type;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config.include_hidden |= self.include_hidden;
        config.follow_symlinks |= self.follow_symlinks;
        config.exclude_patterns.extend(self.exclude.iter().cloned());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file_loaded = dotenvy::dotenv().is_ok();

    // stdout carries the report, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if env_file_loaded {
        info!("loaded .env file");
    }

    let cli = Cli::parse();
    let (mut config, source) = match &cli.config {
        Some(path) => (
            ScannerConfig::load_from_file(path)?,
            ScannerConfigSource::File(path.clone()),
        ),
        None => ScannerConfig::load_from_env()?,
    };
    info!(source = ?source, "scanner config loaded");
    cli.apply(&mut config);

    if config.roots.is_empty() {
        bail!("nothing to scan: pass one or more directories or set `roots` in the config");
    }

    let scanner = FilesystemScanner::new(config.parser(), config.scan_options())
        .context("invalid scanner configuration")?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping scan");
                cancel.cancel();
            }
        }
    });

    let roots = config.roots.clone();
    let outcome = tokio::task::spawn_blocking(move || scanner.scan(&roots, &cancel))
        .await
        .context("scan task failed")?;
    interrupt.abort();

    match outcome {
        Ok(report) => write_report(&report, cli.pretty),
        Err(err) => {
            let message = err.to_string();
            write_report(&err.into_partial(), cli.pretty)?;
            bail!(message)
        }
    }
}

fn write_report(report: &ScanReport, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .context("failed to serialize scan report")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write scan report")?;
    Ok(())
}
