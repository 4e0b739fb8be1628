use anyhow::{anyhow, Result};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod github;
mod output;
mod stats;

use config::Config;
use github::{RepositoryIdentity, RetryPolicy, StatsFetcher};
use output::{ContributionReport, OutputFormat, Reporter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to rank (owner/repo or a GitHub URL)
    #[arg(short, long)]
    repo: String,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Output file (report.txt|json|html), stdout when omitted
    #[arg(long)]
    output_file: Option<String>,

    /// Show only the N contributors with the most changes
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    top: Option<usize>,

    /// Configuration file (toml, yaml or json)
    #[arg(short, long, env = "CONTRIBSTATS_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(level).into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let fetcher = StatsFetcher::new(&config.github)?;
    let policy = RetryPolicy::from(&config.fetch);

    if cli.no_color || !config.output.color_output {
        colored::control::set_override(false);
    }

    let format = cli.output.unwrap_or(config.output.default_format);
    let mut reporter = Reporter::new(format, cli.output_file.as_deref());

    if format == OutputFormat::Table {
        println!(
            "{}",
            "contribstats - GitHub contributor ranking"
                .bright_cyan()
                .bold()
        );
    }

    let Some(identity) = RepositoryIdentity::parse(&cli.repo) else {
        info!("'{}' does not name a GitHub repository", cli.repo);
        return reporter.generate_report(&ContributionReport::empty()).await;
    };

    info!("Fetching contributor statistics for {}", identity);

    let spinner = loading_spinner(&identity)?;
    let fetched = policy.fetch(&fetcher, &identity).await;
    spinner.finish_and_clear();

    let records = fetched.map_err(|err| anyhow!(output::error_message(&err)))?;

    let aggregated: Vec<_> = stats::aggregate(&records).collect();
    let ranked = stats::top(
        stats::rank(&aggregated),
        cli.top.or(config.output.max_contributors),
    );
    info!(
        "Ranked {} contributors ({} records without author skipped)",
        aggregated.len(),
        records.len() - aggregated.len()
    );

    reporter
        .generate_report(&ContributionReport::new(identity, ranked))
        .await?;

    if reporter.format() == OutputFormat::Table {
        println!("\n{}", "Done!".bright_green().bold());
    }

    Ok(())
}

fn loading_spinner(identity: &RepositoryIdentity) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading statistics for {}", identity));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
