//! Sitemap link validator main entry point
//!
//! This is the command-line interface for validating every link reachable
//! from a site's sitemap.

use anyhow::Context;
use clap::Parser;
use sitemap_link_validator::config::{load_config, split_list, Config, ConfigOverrides};
use sitemap_link_validator::output::{log_report, write_report};
use sitemap_link_validator::Coordinator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap link validator
///
/// Fetches `/sitemap.xml` from the site, follows sitemap indexes, and
/// checks every listed page plus every link found on those pages. Exits
/// with status 1 when any link fails validation.
#[derive(Parser, Debug)]
#[command(name = "sitemap-link-validator")]
#[command(version = "1.0.0")]
#[command(about = "Validates every link reachable from a sitemap", long_about = None)]
struct Cli {
    /// Path to a JSON or TOML configuration file
    /// (defaults to ./validationConfig.json when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the site to validate
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Number of parallel workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Comma-separated status patterns that count as a pass (e.g. 2xx,403)
    #[arg(long, value_name = "CODES")]
    success_status_codes: Option<String>,

    /// Comma-separated URL patterns to skip (exact, *suffix, prefix*, *contains*)
    #[arg(long, value_name = "PATTERNS")]
    ignore_urls: Option<String>,

    /// Write a report of broken links to this file (.md or .csv)
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and list the sitemap pages without checking them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            site_url: self.site_url.clone(),
            workers: self.workers,
            success_status_codes: self.success_status_codes.as_deref().map(split_list),
            ignore_urls: self.ignore_urls.as_deref().map(split_list),
            report: self.report.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_link_validator=info,warn"),
            1 => EnvFilter::new("sitemap_link_validator=debug,info"),
            2 => EnvFilter::new("sitemap_link_validator=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration and runs the selected mode, returning the
/// process exit code
async fn run(cli: Cli) -> anyhow::Result<i32> {
    let overrides = cli.overrides();
    let config = load_config(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    tracing::info!(
        "Validating {} with {} workers",
        config.site_url,
        config.workers
    );

    if cli.dry_run {
        handle_dry_run(config).await?;
        return Ok(0);
    }

    handle_validate(config).await
}

/// Handles the --dry-run mode: resolves the sitemap and shows what would
/// be validated
async fn handle_dry_run(config: Config) -> anyhow::Result<()> {
    println!("=== Sitemap Link Validator Dry Run ===\n");

    println!("Configuration:");
    println!("  Site URL: {}", config.site_url);
    println!("  Workers: {}", config.workers);
    println!(
        "  Success status codes: {}",
        config.success_status_codes.join(", ")
    );
    println!("  Ignored URLs ({}):", config.ignore_urls.len());
    for pattern in &config.ignore_urls {
        println!("    - {}", pattern);
    }
    if let Some(report) = &config.report {
        println!("  Report: {}", report.display());
    }

    let coordinator = Coordinator::new(config)?;
    let pages = coordinator
        .resolve_pages()
        .await
        .context("Failed to resolve sitemap")?;

    println!("\nSitemap Pages ({}):", pages.len());
    for page in &pages {
        println!("  - {}", page);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main validation run
async fn handle_validate(config: Config) -> anyhow::Result<i32> {
    let report_path = config.report.clone();
    let coordinator = Coordinator::new(config)?;

    let report = coordinator.run().await.context("Validation failed")?;
    log_report(&report);

    if let Some(path) = report_path {
        write_report(&report, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if report.is_success() {
        tracing::info!("All links are valid");
    }

    Ok(report.exit_code())
}
