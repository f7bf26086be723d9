use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use brewboard::analytics::AnalyticsReplay;
use brewboard::config::{Config, load_config};
use brewboard::fetch::ApiClient;
use brewboard::refresh::{RefreshLoop, RefreshPhase};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides config file)
    #[arg(long, env)]
    api_base: Option<String>,

    /// Refresh interval in seconds (overrides config file)
    #[arg(long, env)]
    interval: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", env)]
    config: String,

    /// Replay the offline analytics test cases once and exit
    #[arg(long)]
    analytics: bool,

    /// Seed the demo staff roster before starting the live loop
    #[arg(long)]
    seed: bool,
}

impl Args {
    /// Resolve configuration: file if present, defaults otherwise, CLI
    /// flags on top
    fn effective_config(&self) -> Config {
        let mut config = match load_config(&self.config) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %self.config, error = %err, "using default configuration");
                Config::default()
            }
        };
        if let Some(api_base) = &self.api_base {
            config.backend.base_url = api_base.clone();
        }
        if let Some(interval) = self.interval {
            config.refresh.interval_secs = interval;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    brewboard::logging::init_dual_logging();

    let args = Args::parse();
    let config = args.effective_config();
    info!(backend = %config.backend.base_url, "starting brewboard");

    let client = ApiClient::new(&config)?;

    match client.current_session().await {
        Ok(user) if !user.name.is_empty() => info!(user = %user.name, "session active"),
        Ok(_) => info!("session active"),
        Err(err) if err.is_unauthorized() => {
            warn!("no active session; the backend may reject live data")
        }
        Err(err) => warn!(error = %err, "could not probe session"),
    }

    if args.analytics {
        return run_analytics(&client).await;
    }

    if args.seed {
        // Action failures surface inline and do not stop the dashboard.
        match client.seed_baristas().await {
            Ok(()) => info!("seeded demo baristas"),
            Err(err) => warn!(error = %err, "could not seed baristas"),
        }
    }

    run_dashboard(client, &config).await
}

/// Replay every canned test case through the aggregator once
async fn run_analytics(client: &ApiClient) -> Result<()> {
    let replay = AnalyticsReplay::load(client).await?;
    if replay.test_cases().is_empty() {
        warn!("backend returned no test cases");
        return Ok(());
    }

    for case in replay.test_cases() {
        let stats = brewboard::DerivedStats::analytics(&case.orders);
        info!(
            case = %case.id,
            label = %case.label,
            orders = case.orders.len(),
            avg_wait_min = %format!("{:.1}", stats.avg_wait_minutes),
            complaints = stats.complaint_count,
            "replayed test case"
        );
        for row in &stats.barista_stats {
            info!(
                case = %case.id,
                barista = %row.barista,
                orders = row.orders,
                avg_wait_min = %format!("{:.1}", row.avg_wait_minutes()),
                complaints = row.complaints,
                "barista performance"
            );
        }
    }
    Ok(())
}

/// Run the live refresh loop until Ctrl-C or session expiry
async fn run_dashboard(client: ApiClient, config: &Config) -> Result<()> {
    let handle = RefreshLoop::new(client, config.refresh.interval()).spawn();
    let mut views = handle.subscribe();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutting down");
                handle.stop().await;
                return Ok(());
            }
            changed = views.changed() => {
                if changed.is_err() {
                    // Loop task exited; the last view says why.
                    anyhow::bail!("refresh loop stopped unexpectedly");
                }
                let view = views.borrow_and_update().clone();
                match view.phase {
                    RefreshPhase::Ready => info!(
                        waiting = view.queue.waiting.len(),
                        in_progress = view.queue.in_progress.len(),
                        completed = view.queue.completed.len(),
                        staff = view.baristas.len(),
                        avg_wait_min = %format!("{:.1}", view.stats.avg_wait_minutes),
                        urgent = view.stats.complaint_count,
                        "dashboard refreshed"
                    ),
                    RefreshPhase::Error => {
                        if let Some(message) = &view.error {
                            warn!("{message}");
                        }
                    }
                    RefreshPhase::Unauthorized => {
                        error!("session expired, sign in again to resume");
                        anyhow::bail!("session expired");
                    }
                    RefreshPhase::Idle | RefreshPhase::Loading => {}
                }
            }
        }
    }
}
