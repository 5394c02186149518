// crates/cli/src/main.rs
//! `plate-watch` binary.
//!
//! Submits one plate lookup to the backend, follows the job until it
//! settles, then prints the violation report. Exits non-zero when the job
//! fails or cannot be tracked.

mod render;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use plate_watch_core::{
    ApiClient, ClientConfig, JobTracker, PlateLookup, TrackerPhase, TrackerState,
};
use plate_watch_types::{JobStatus, VehicleType};
use tracing_subscriber::EnvFilter;

/// Look up traffic violations recorded against a licence plate.
#[derive(Debug, Parser)]
#[command(name = "plate-watch", version)]
struct Cli {
    /// Licence plate, e.g. "59C1-360.47". Separators are ignored.
    plate: String,

    /// Vehicle category: oto, xemay, xedapdien (or car, motorcycle, electric_bike).
    #[arg(short = 't', long, default_value_t = VehicleType::Motorcycle)]
    vehicle_type: VehicleType,

    /// Backend base URL. Overrides PLATE_WATCH_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Delay between status polls, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Captcha retry budget for the backend (1-10).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    max_retries: Option<u8>,

    /// Print the final job as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Skip the /health check before submitting.
    #[arg(long)]
    no_health_check: bool,

    /// Log tracker activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn client_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(ms) = self.interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        config
    }
}

/// Exit status for an interrupted run (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

/// Exit status for a settled tracker: 0 only when the job completed.
fn exit_code(state: &TrackerState) -> u8 {
    match state.phase {
        TrackerPhase::Completed => 0,
        TrackerPhase::Idle | TrackerPhase::Polling | TrackerPhase::Failed => 1,
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,plate_watch_core=debug,plate_watch=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.client_config(ClientConfig::from_env());
    let client = Arc::new(ApiClient::from_config(&config).context("failed to build HTTP client")?);

    if !cli.no_health_check {
        client
            .health_check()
            .await
            .with_context(|| format!("backend at {} is not healthy", client.base_url()))?;
    }

    let mut tracker = JobTracker::new(client.clone());
    tracker
        .set_interval(config.poll_interval)
        .await
        .context("invalid poll interval")?;

    let mut lookup = PlateLookup::new(client, tracker).with_max_retries(config.max_retries);
    let job_id = lookup.search(&cli.plate, cli.vehicle_type).await?;
    tracing::info!(%job_id, api_url = %config.api_url, "Tracking lookup");

    let progress = (!cli.json).then(|| {
        let mut rx = lookup.tracker().subscribe();
        rx.mark_changed();
        eprintln!("job {job_id} submitted");
        tokio::spawn(async move {
            let mut last: Option<JobStatus> = None;
            while rx.changed().await.is_ok() {
                let status = rx.borrow_and_update().job.as_ref().map(|j| j.status);
                if let Some(status) = status.filter(|s| Some(*s) != last) {
                    eprintln!("status: {status}");
                    last = Some(status);
                }
            }
        })
    });

    let settled = tokio::select! {
        state = lookup.tracker().wait_until_settled() => Some(state),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(progress) = progress {
        progress.abort();
    }

    let Some(state) = settled else {
        lookup.reset().await;
        eprintln!("interrupted");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state.job)?);
    }

    match (&state.phase, &state.job) {
        (TrackerPhase::Completed, Some(snapshot)) if !cli.json => {
            print!("{}", render::report(snapshot));
        }
        (TrackerPhase::Completed, _) => {}
        _ => eprintln!("{}", render::failure(&state)),
    }

    Ok(ExitCode::from(exit_code(&state)))
}
