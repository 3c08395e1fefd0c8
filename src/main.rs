mod build;
mod collect;
mod config;
mod fingerprint;
mod github;
mod infra;
mod report;

use build::BuildCommand;
use clap::Parser;
use github::GithubError;
use infra::{DirProbe, ProcessRunner};
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// asset-watch — compares production asset sizes between a pull request
/// branch and its base branch, then keeps a single summary comment on the
/// pull request up to date.
#[derive(Parser, Debug)]
#[command(name = "asset-watch", version, about)]
struct Cli {
    /// Path to the webhook event payload (defaults to $GITHUB_EVENT_PATH)
    #[arg(long)]
    event: Option<PathBuf>,

    /// Build command: "auto", "false", or an arbitrary command string
    #[arg(long)]
    build_command: Option<String>,

    /// Glob pattern for built assets (repeatable, overrides config)
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    /// Also list files whose size barely moved
    #[arg(long)]
    show_unchanged: bool,

    /// Print the comment body instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Optional path to a config file (defaults to .asset-watch.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    if let Some(command) = &cli.build_command {
        config.build.command = command.clone();
    }
    if !cli.patterns.is_empty() {
        config.report.patterns = cli.patterns.clone();
    }
    if cli.show_unchanged {
        config.report.show_unchanged = true;
    }

    let event_path = cli
        .event
        .clone()
        .or_else(|| std::env::var_os("GITHUB_EVENT_PATH").map(PathBuf::from))
        .ok_or(github::event::EventError::MissingPath)?;
    let payload = github::event::load_event(&event_path)?;

    let token = config.github_token().ok_or(GithubError::MissingToken)?;
    let client = github::GithubClient::new(token, config.api_url());

    info!("resolving pull request");
    let Some(pull_request) = github::resolve_pull_request(&payload, &client).await? else {
        return Ok(());
    };
    let coords = pull_request.coords();

    let _run_span = info_span!("asset_watch", pr = pull_request.number).entered();
    debug!(owner = %coords.owner, repo = %coords.repo, head = %pull_request.head.sha, base = %pull_request.base.sha, "resolved pull request");

    let runner = ProcessRunner;
    let probe = DirProbe::current_dir()?;
    let build_command = BuildCommand::parse(&config.build.command);

    // The workflow has already checked out the PR branch; measure it first,
    // then switch the same workspace to the base revision.
    info!("building assets for the pull request branch");
    build::build_assets(&build_command, &probe, &runner).await?;
    info!("measuring pull request assets");
    let head_sizes = fingerprint::normalize_fingerprint(
        &collect::collect_asset_sizes(
            &config.report.reporter_command,
            &config.report.patterns,
            &runner,
        )
        .await?,
    );

    build::checkout_git_ref(&pull_request.base.sha, &runner).await?;
    info!("building assets for the base branch");
    build::build_assets(&build_command, &probe, &runner).await?;
    info!("measuring base branch assets");
    let base_sizes = fingerprint::normalize_fingerprint(
        &collect::collect_asset_sizes(
            &config.report.reporter_command,
            &config.report.patterns,
            &runner,
        )
        .await?,
    );

    let delta = fingerprint::diff_sizes(&base_sizes, &head_sizes);
    info!(files = delta.len(), "computed size deltas");

    let body = report::build_output_text(&delta, config.report.show_unchanged);

    if cli.dry_run {
        report::print_preview(&body);
        return Ok(());
    }

    let action = github::upsert_comment(&client, &coords, &body).await?;
    info!(?action, "done");

    Ok(())
}
