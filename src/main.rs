use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use version_monitor::config::{self, MonitorConfig};
use version_monitor::logging;
use version_monitor::monitor::host::{ConfiguredOperators, FsModuleHost, SystemClock};
use version_monitor::monitor::report::{Action, TerminalPresenter};
use version_monitor::monitor::scheduler::SkipReason;
use version_monitor::monitor::{Collaborators, CycleOutcome, Monitor};
use version_monitor::state::SqliteStore;
use version_monitor::version::fetcher::ReleaseFetcher;

#[derive(Parser)]
#[command(name = "version-monitor")]
#[command(version, about = "Watch installed modules for newer published releases")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a check cycle if one is due
    Check {
        /// Ignore the schedule and report on every watched module
        #[arg(long)]
        force: bool,
    },
    /// Hide the update report until a new release appears
    Hide,
    /// Snooze the update report
    Snooze,
    /// Set the check interval in hours
    Interval { hours: f64 },
    /// Print the persisted check state
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&config::log_path(), cli.verbose)?;
    let config_path = cli.config.unwrap_or_else(config::config_path);
    let config = MonitorConfig::load(&config_path)?;
    info!("Loaded configuration from {:?}", config_path);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: MonitorConfig) -> anyhow::Result<()> {
    let db_path = config::db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Arc::new(SqliteStore::new(&db_path, &config.installation)?);

    let fetcher =
        ReleaseFetcher::with_default_sources(&config.github_api_url, config.fetch_timeout())?;
    let monitor = Monitor::new(
        &config,
        Collaborators {
            host: Arc::new(FsModuleHost::new(
                config.modules_dir(),
                config.disabled_modules.clone(),
            )),
            fetcher: Arc::new(fetcher),
            store,
            clock: Arc::new(SystemClock),
            operator: Arc::new(ConfiguredOperators::from_env(config.operators.clone())),
            presenter: Arc::new(TerminalPresenter::stdout()),
        },
    );

    match command {
        Command::Check { force } => {
            let outcome = if force {
                monitor.run_manual().await
            } else {
                monitor.run_scheduled().await
            };
            match outcome {
                CycleOutcome::Completed(_) => {}
                CycleOutcome::Skipped(SkipReason::Snoozed { until }) => {
                    println!("Notifications snoozed until {}", format_ms(until));
                }
                CycleOutcome::Skipped(SkipReason::NotDue { next_at }) => {
                    println!("Next check due at {}", format_ms(next_at));
                }
                CycleOutcome::NotPermitted => {
                    anyhow::bail!("current user is not allowed to run checks")
                }
                CycleOutcome::AlreadyRunning => println!("A check is already running"),
                CycleOutcome::Failed => anyhow::bail!("update check failed, see the log"),
            }
        }
        Command::Hide => {
            monitor.on_action(Action::Hide)?;
            println!("Update report hidden until a new release appears");
        }
        Command::Snooze => {
            monitor.on_action(Action::Snooze)?;
            println!("Update report snoozed for {} minutes", config.snooze_minutes);
        }
        Command::Interval { hours } => {
            if !hours.is_finite() || hours <= 0.0 {
                anyhow::bail!("interval must be a positive number of hours, got {}", hours);
            }
            monitor.set_interval_hours(hours)?;
            println!("Check interval set to {} hours", hours);
        }
        Command::Status => {
            let state = monitor.state()?;
            println!("installation:        {}", config.installation);
            println!("last check:          {}", format_ms(state.last_check_at));
            println!("check interval:      {} hours", state.check_interval_hours);
            println!("hidden until update: {}", state.hidden_until_update);
            println!("snoozed until:       {}", format_ms(state.snoozed_until));
            println!("last fingerprint:    {}", state.last_fingerprint);
        }
    }

    Ok(())
}

fn format_ms(ms: i64) -> String {
    if ms <= 0 {
        return "never".to_string();
    }
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}
