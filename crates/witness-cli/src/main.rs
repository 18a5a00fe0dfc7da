//! Witness CLI - browser verification runs with screenshot evidence
//!
//! Usage:
//!   witness run <suite>         Run a built-in verification suite
//!   witness run --plan <file>   Run a plan loaded from a TOML file
//!   witness list                List the built-in suites
//!   witness probe <url>         Poll a server until it responds
//!   witness init                Write a default witness.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use witness_browser::{wait_for_server, BrowserSession};
use witness_core::{Plan, RunReport, RunnerConfig, StepStatus};
use witness_runner::{builtin_suites, find_suite, Runner};

#[derive(Parser)]
#[command(name = "witness")]
#[command(author, version, about = "Browser verification runs with screenshot evidence")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a verification suite against a local server
    Run {
        /// Built-in suite name (see `witness list`)
        suite: Option<String>,

        /// Load the plan from a TOML file instead
        #[arg(long, value_name = "FILE")]
        plan: Option<PathBuf>,

        /// Override the plan's base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Override the screenshot output directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Override the plan's failure policy (fail_fast, continue_on_error)
        #[arg(long)]
        policy: Option<String>,

        /// Run with a visible browser window
        #[arg(long)]
        headed: bool,

        /// Attach to a running browser on this DevTools port instead of launching
        #[arg(long, value_name = "PORT")]
        attach: Option<u16>,

        /// Print the run report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the built-in suites
    List,

    /// Poll a server until it responds or attempts run out
    Probe {
        /// URL to probe
        url: String,

        /// Maximum connection attempts
        #[arg(long)]
        attempts: Option<u32>,

        /// Sleep between attempts in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Write a default witness.toml into a directory
    Init {
        /// Target directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            suite,
            plan,
            base_url,
            out_dir,
            policy,
            headed,
            attach,
            json,
        } => cmd_run(suite, plan, base_url, out_dir, policy, headed, attach, json).await,
        Commands::List => cmd_list(),
        Commands::Probe {
            url,
            attempts,
            interval_ms,
        } => cmd_probe(url, attempts, interval_ms).await,
        Commands::Init { path } => cmd_init(path),
    }
}

async fn cmd_run(
    suite: Option<String>,
    plan_file: Option<PathBuf>,
    base_url: Option<String>,
    out_dir: Option<PathBuf>,
    policy: Option<String>,
    headed: bool,
    attach: Option<u16>,
    json: bool,
) -> Result<()> {
    let mut config = RunnerConfig::load_or_default(Path::new("."))?;

    if let Some(dir) = out_dir {
        config.output_dir = dir;
    }
    if headed {
        config.browser.headless = false;
    }

    let mut plan = match (suite, plan_file) {
        (Some(_), Some(_)) => {
            anyhow::bail!("Pass either a suite name or --plan, not both");
        }
        (Some(name), None) => find_suite(&name)?,
        (None, Some(file)) => {
            Plan::load(&file).with_context(|| format!("Failed to load plan {:?}", file))?
        }
        (None, None) => {
            anyhow::bail!(
                "Specify a built-in suite ({}) or --plan FILE",
                suite_names().join(", ")
            );
        }
    };

    if let Some(url) = base_url {
        plan.base_url = url;
    }
    if let Some(p) = policy {
        plan.policy = p.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }

    info!("Verifying '{}' at {}", plan.name, plan.base_url);

    let session = match attach {
        Some(port) => BrowserSession::connect(port).await?,
        None => BrowserSession::launch(&config.browser).await?,
    };

    let runner = Runner::new(config);
    let report = runner.run(&plan, &session).await?;
    session.close().await?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)?;
        println!("{}", rendered);
    } else {
        print_report(&report);
    }

    if !report.passed() {
        anyhow::bail!("Verification failed: {}", report.summary());
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    println!("Run report: {} against {}", report.plan, report.base_url);

    for record in &report.steps {
        let marker = match &record.status {
            StepStatus::Passed => "PASS",
            StepStatus::Failed { .. } => "FAIL",
            StepStatus::Skipped => "SKIP",
        };
        println!("  [{}] {} ({}ms)", marker, record.step, record.duration_ms);

        if let StepStatus::Failed { message } = &record.status {
            println!("         {}", message);
        }
        if let Some(shot) = &record.screenshot {
            println!("         -> {}", shot.display());
        }
    }

    println!();
    println!("{}", report.summary());

    if let Some(url) = &report.final_url {
        println!("Final URL: {}", url);
    }
    if let Some(shot) = &report.error_screenshot {
        println!("Error screenshot: {}", shot.display());
    }
}

fn cmd_list() -> Result<()> {
    println!("Built-in suites:");

    for plan in builtin_suites() {
        println!("  {} - {}", plan.name, plan.description);
        println!("    URL: {}", plan.base_url);
        println!(
            "    Steps: {}, policy: {}{}",
            plan.steps.len(),
            plan.policy,
            if plan.wait_for_server {
                ", waits for server"
            } else {
                ""
            }
        );
    }

    Ok(())
}

async fn cmd_probe(url: String, attempts: Option<u32>, interval_ms: Option<u64>) -> Result<()> {
    let config = RunnerConfig::load_or_default(Path::new("."))?;

    let mut policy = config.readiness;
    if let Some(n) = attempts {
        policy.attempts = n;
    }
    if let Some(ms) = interval_ms {
        policy.interval_ms = ms;
    }

    wait_for_server(&url, &policy).await?;
    println!("Server at {} is responding", url);

    Ok(())
}

fn cmd_init(path: PathBuf) -> Result<()> {
    let config_path = path.join("witness.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    RunnerConfig::write_default(&path)?;

    println!("Initialized witness in {:?}", path);
    println!("Created:");
    println!("  witness.toml");
    println!();
    println!("Next steps:");
    println!("  1. Start your dev server");
    println!("  2. Run 'witness list' to see the built-in suites");
    println!("  3. Run 'witness run <suite>' to collect screenshot evidence");

    Ok(())
}

fn suite_names() -> Vec<String> {
    builtin_suites().into_iter().map(|p| p.name).collect()
}
