mod classify;
mod config;
mod diff;
mod github;
mod llm;
mod pacing;
mod prompts;
mod review;
mod summary;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use github::{CommentSink, DryRunSink, GithubClient};
use llm::OpenAiClient;
use pacing::RateLimiter;
use review::FileReviewer;

/// swift-reviewer — AI code reviewer for Swift/iOS pull requests. Posts
/// per-line suggestions as inline review comments, then an aggregate
/// architectural summary comment.
#[derive(Parser, Debug)]
#[command(name = "swift-reviewer", version, about)]
struct Cli {
    /// Path to a .swift-reviewer.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print would-be comments to stdout instead of posting to GitHub
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Configuration problems are the only fatal errors; once validation
    // passes the run always completes with exit code 0.
    let config = config::Config::load(cli.config.as_deref())?;
    info!(
        repo = %format!("{}/{}", config.github.owner, config.github.repo),
        pr = config.github.pr_number,
        model = %config.openai.inline_model,
        dry_run = cli.dry_run,
        "starting AI code review"
    );

    run(&config, cli.dry_run).await;
    Ok(())
}

async fn run(config: &config::Config, dry_run: bool) {
    let github = GithubClient::new(config);
    let model = OpenAiClient::new(config);
    let limiter = RateLimiter::new(config.review.api_delay);
    let dry_sink = DryRunSink;
    let sink: &dyn CommentSink = if dry_run { &dry_sink } else { &github };

    let files = match github.list_changed_files().await {
        Ok(files) => files,
        Err(err) => {
            error!(%err, "failed to fetch PR files, nothing to review");
            return;
        }
    };
    if files.is_empty() {
        info!("no files found in PR");
        return;
    }
    info!(total = files.len(), "fetched changed files");

    let to_review: Vec<_> = files
        .into_iter()
        .filter(|f| review::should_review(&config.review, f))
        .collect();
    if to_review.is_empty() {
        info!("no files to review after filtering");
        summary::post_no_files_notice(sink, &limiter, config).await;
        return;
    }

    let reviewer = FileReviewer::new(&model, sink, &limiter, config);
    let mut comments_posted = 0;
    for (i, file) in to_review.iter().enumerate() {
        info!(
            file = %file.filename,
            progress = %format!("{}/{}", i + 1, to_review.len()),
            "reviewing file"
        );
        comments_posted += reviewer.review_file(file).await;
        if i + 1 < to_review.len() {
            limiter.pause().await;
        }
    }

    let summary_posted =
        summary::post_architectural_summary(&model, sink, &limiter, config, &to_review).await;
    if !summary_posted {
        warn!("no summary comment could be posted");
    }

    println!(
        "{} reviewed {} files, posted {} inline comments{}",
        "✔".green().bold(),
        to_review.len(),
        comments_posted,
        if summary_posted { ", summary posted" } else { "" }
    );
}
