use anyhow::{Context, Result};
use clap::Parser;
use hook_common::observability::{LogConfig, LogFormat, init_logging};
use hook_config::{HookConfig, HookConfigLoader};
use hook_webhook::run_once;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "mutual-hook.yaml";

/// Register for the hiring webhook, find mutual follows and post them back.
#[derive(Debug, Parser)]
#[command(name = "mutual-hook", version)]
struct Cli {
    /// YAML config file; `./mutual-hook.yaml` is used when present.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Compute and print the outcome without posting it.
    #[arg(long)]
    dry_run: bool,

    /// Log encoding for the file and stderr sinks.
    #[arg(long, env = "HOOK_LOG_FORMAT", default_value = "text", value_parser = parse_log_format)]
    log_format: LogFormat,
}

fn parse_log_format(raw: &str) -> std::result::Result<LogFormat, String> {
    raw.parse()
}

fn load_config(cli: &Cli) -> Result<HookConfig> {
    let loader = match &cli.config {
        Some(path) => HookConfigLoader::new().with_file(path),
        None => HookConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let log_path = init_logging(LogConfig {
        emit_stderr: true,
        format: cli.log_format,
        ..LogConfig::default()
    })?;
    tracing::debug!(log_path=%log_path.display(), dry_run = cli.dry_run, "run.start");

    // Workflow failures are reported, not turned into a non-zero exit.
    match run_once(&cfg, cli.dry_run).await {
        Ok(report) => {
            if cli.dry_run {
                println!("{}", serde_json::to_string(&report.outcome)?);
            }
            tracing::info!(
                users = report.users,
                mutual_pairs = report.mutual_pairs,
                fallback = report.outcome.is_fallback(),
                attempts = ?report.attempts,
                "run.finished"
            );
        }
        Err(err) => tracing::error!(error = %err, "run.failed"),
    }
    Ok(())
}
