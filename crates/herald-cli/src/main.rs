//! Herald - merged policy changes to a reviewed announcement thread
//!
//! `herald [DATE]` finds pull requests merged into the monitored repository
//! on DATE (a UTC day, `YYYY-MM-DD`) or in the last 24 hours, summarizes
//! them, drafts a post or two-post thread, has the model review the draft,
//! and prints the approved thread as a simulated publish.
//!
//! Credentials come from `GITHUB_API_TOKEN` and `GEMINI_API_KEY`.
//!
//! ## Exit codes
//!
//! - 0: published
//! - 1: no merged pull requests (or the search failed)
//! - 2: no valid summaries
//! - 3: the reviewer gave no usable verdict
//! - 4: no drafts were produced
//! - 5: drafts were rejected on every attempt
//! - 6: publishing failed part-way
//! - 70: startup or configuration error

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{warn, Level};

use herald_core::config::{DEFAULT_GEMINI_API, DEFAULT_GITHUB_API, DEFAULT_MODEL, DEFAULT_REPOSITORY};
use herald_core::{HeraldConfig, Orchestrator, RunReport, SimulatedTarget};
use herald_http::{GeminiClient, GitHubSearchClient};

/// Exit code for wiring failures (EX_SOFTWARE).
const WIRING_FAILURE: u8 = 70;

#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Announce merged policy changes as a reviewed post thread", long_about = None)]
struct Cli {
    /// UTC day to scan (YYYY-MM-DD); defaults to the last 24 hours
    date: Option<String>,

    /// Repository to monitor (owner/name)
    #[arg(long, env = "HERALD_REPO", default_value = DEFAULT_REPOSITORY)]
    repo: String,

    /// Gemini model used for every call
    #[arg(long, env = "HERALD_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature for model calls (0.0-2.0); service default when unset
    #[arg(long, env = "HERALD_TEMPERATURE")]
    temperature: Option<f64>,

    /// Compose attempts before giving up on rejected drafts
    #[arg(long, env = "HERALD_MAX_ATTEMPTS", default_value_t = 3)]
    max_attempts: u32,

    /// Summaries generated concurrently
    #[arg(long, env = "HERALD_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Include earlier rejection reasons when recomposing
    #[arg(long, env = "HERALD_FEEDBACK")]
    feedback: bool,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "HERALD_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// GitHub API base URL
    #[arg(long, env = "HERALD_GITHUB_API", default_value = DEFAULT_GITHUB_API, hide = true)]
    github_api: String,

    /// Gemini API base URL
    #[arg(long, env = "HERALD_GEMINI_API", default_value = DEFAULT_GEMINI_API, hide = true)]
    gemini_api: String,

    /// Print the full run report as JSON when done
    #[arg(long)]
    report: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Environment credentials plus every flag.
    fn config(&self) -> HeraldConfig {
        HeraldConfig {
            repository: self.repo.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            github_api_base: self.github_api.clone(),
            gemini_api_base: self.gemini_api.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
            concurrency: self.concurrency,
            feedback: self.feedback,
            ..HeraldConfig::from_env()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    herald_core::telemetry::init_tracing(cli.json, level);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(WIRING_FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.config();
    config.validate().context("Invalid configuration")?;

    // Missing credentials are reported by the stage that needs them.
    for var in config.missing_credentials() {
        warn!(var, "Credential not set; the stage that needs it will fail");
    }

    let source = GitHubSearchClient::new(config.github_config())
        .context("Failed to create GitHub client")?;
    let model =
        GeminiClient::new(config.gemini_config()).context("Failed to create Gemini client")?;

    let orchestrator = Orchestrator::new(
        &config,
        Arc::new(source),
        Arc::new(model),
        Arc::new(SimulatedTarget::new()),
    );

    println!(
        "Scanning {} for pull requests merged {}",
        config.repository,
        cli.date
            .as_deref()
            .map(|d| format!("on {d} (UTC)"))
            .unwrap_or_else(|| "in the last 24 hours".to_string())
    );

    let report = orchestrator.run(cli.date.clone()).await;
    print_summary(&report);

    if cli.report {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    }

    Ok(ExitCode::from(report.outcome.exit_code()))
}

fn print_summary(report: &RunReport) {
    let state = &report.state;
    println!();
    println!("Run:         {}", report.run_id);
    println!("Outcome:     {}", report.outcome);
    println!("Changes:     {}", state.changes.len());
    println!("Summaries:   {}", state.summaries.len());
    println!("Attempts:    {}", state.attempts);
    if let Some(verdict) = &state.verdict {
        println!("Verdict:     {} ({})", verdict.label, verdict.reason);
    }
    if let Some(publish) = &state.publish {
        let ids: Vec<&str> = publish.posted.iter().map(|id| id.as_str()).collect();
        println!("Posted:      {}", ids.join(" -> "));
        if let Some(err) = &publish.failure {
            println!("Left posted after failure: {} ({err})", ids.len());
        }
    }
    for failure in &state.failures {
        println!("  [{}:{}] {}", failure.stage, failure.kind, failure.message);
    }
}
