use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;

use alphadesk::api::{HttpJobApi, JobApi};
use alphadesk::curve::{build_curve, layout};
use alphadesk::domain::{JobHandle, JobKind, JobRequest, JobStatus};
use alphadesk::poll::{MUTATION_REFRESH_DELAYS, PollOutcome, PollSession, PollSlot, RefreshSchedule};
use alphadesk::sweep::{SweepSpec, expand, submit_sweep};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alphadesk")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("alphadesk.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let api = HttpJobApi::new(config.api_config()).context("Failed to build API client")?;

    match &cli.command {
        Commands::Sweep {
            key,
            start,
            end,
            step,
            include_end,
            submit,
            name,
        } => {
            let spec = SweepSpec::new(key.clone(), *start, *end, *step, *include_end);
            handle_sweep_command(&api, &spec, *submit, name).await
        }
        Commands::Status { id } => handle_status_command(&api, id).await,
        Commands::Watch { id, metric } => handle_watch_command(&api, config, id, metric.as_deref()).await,
        Commands::Curve { id, width, height } => handle_curve_command(&api, config, id, *width, *height).await,
        Commands::Cancel { id } => handle_cancel_command(&api, id).await,
    }
}

fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Queued => "queued",
        JobStatus::Running => "running",
        JobStatus::Success => "success",
        JobStatus::Failed => "failed",
        JobStatus::CancelRequested => "cancel_requested",
        JobStatus::Cancelled => "cancelled",
    }
}

fn print_job_line(job: &JobHandle) {
    let label = status_label(job.status);
    let status = match job.status {
        JobStatus::Success => label.green(),
        JobStatus::Failed | JobStatus::Cancelled => label.red(),
        JobStatus::Running => label.cyan(),
        JobStatus::Queued | JobStatus::CancelRequested => label.yellow(),
    };
    match job.progress {
        Some(progress) => println!("{} {} ({:.0}%)", job.id, status, progress * 100.0),
        None => println!("{} {}", job.id, status),
    }
}

async fn handle_sweep_command(api: &HttpJobApi, spec: &SweepSpec, submit: bool, name: &str) -> Result<()> {
    info!("Expanding sweep over: {}", spec.param_key);
    let result = expand(spec);
    if let Some(error) = result.error {
        println!("{} {}", "Sweep rejected:".red(), error);
        return Ok(());
    }

    let rendered: Vec<String> = result
        .values
        .iter()
        .map(|value| format!("{:.*}", result.decimals as usize, value))
        .collect();
    println!(
        "{} {} values: {}",
        "Sweep:".green(),
        result.values.len(),
        rendered.join(", ")
    );

    if submit {
        let base = JobRequest::new(JobKind::Training, name);
        let submission = submit_sweep(api, &base, spec)
            .await
            .context("Failed to submit sweep")?;
        println!(
            "{} {} jobs as {}",
            "Submitted:".green(),
            submission.jobs.len(),
            submission.sweep_id
        );
        for job in &submission.jobs {
            println!("  {}", job.id);
        }
    }

    Ok(())
}

async fn handle_status_command(api: &HttpJobApi, id: &str) -> Result<()> {
    info!("Fetching status for job: {}", id);
    let job = api.fetch_job(id).await.context("Failed to fetch job")?;
    print_job_line(&job);
    Ok(())
}

async fn handle_watch_command(api: &HttpJobApi, config: &Config, id: &str, metric: Option<&str>) -> Result<()> {
    info!("Watching job: {}", id);
    println!("{} {}", "Watching:".cyan(), id);

    let slot = PollSlot::new();
    let session = PollSession::with_config(id, slot.issue(), config.poll_config());
    let outcome = session
        .run(api, |detail| detail.is_terminal(), print_job_line)
        .await;

    match outcome {
        PollOutcome::Ready(detail) => {
            println!("{} {}", "Settled:".green(), status_label(detail.status));
            if let Some(key) = metric {
                match detail.metric(key) {
                    Some(value) => println!("{} {} = {}", "Metric:".green(), key, value),
                    None => println!("{} {} not present in job metrics", "Metric:".yellow(), key),
                }
            }
        }
        PollOutcome::Exhausted => {
            println!("{}", "Gave up waiting; the job has not settled yet".yellow());
        }
        PollOutcome::Superseded => {
            println!("{}", "Watch superseded by a newer session".yellow());
        }
    }

    Ok(())
}

async fn handle_curve_command(
    api: &HttpJobApi,
    config: &Config,
    id: &str,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<()> {
    info!("Rendering curve geometry for job: {}", id);
    let job = api.fetch_job(id).await.context("Failed to fetch job")?;

    let Some(metrics) = job.metrics.as_ref() else {
        println!("{}", "Job has no metrics yet".yellow());
        return Ok(());
    };
    let Some(curve) = build_curve(metrics) else {
        println!("{}", "Job metrics contain nothing plottable".yellow());
        return Ok(());
    };

    let mut viewport = config.viewport();
    if let Some(w) = width {
        viewport.width = w;
    }
    if let Some(h) = height {
        viewport.height = h;
    }

    let geometry = layout(&curve, &viewport);
    let rendered = serde_json::to_string_pretty(&geometry).context("Failed to serialize geometry")?;
    println!("{}", rendered);
    Ok(())
}

async fn handle_cancel_command(api: &HttpJobApi, id: &str) -> Result<()> {
    info!("Requesting cancellation of job: {}", id);
    let job = api.cancel_job(id).await.context("Failed to request cancellation")?;
    println!("{} {}", "Cancel requested:".yellow(), job.id);

    // The backend settles cancellation asynchronously; re-check on the
    // staggered delays and report what comes back.
    let (tx, mut rx) = mpsc::channel(MUTATION_REFRESH_DELAYS.len());
    let refresh_api = api.clone();
    let job_id = id.to_string();
    let mut schedule = RefreshSchedule::new();
    schedule.schedule(&MUTATION_REFRESH_DELAYS, move || {
        let api = refresh_api.clone();
        let job_id = job_id.clone();
        let tx = tx.clone();
        async move {
            if let Ok(detail) = api.fetch_job(&job_id).await {
                let _ = tx.send(detail).await;
            }
        }
    });

    while let Some(detail) = rx.recv().await {
        print_job_line(&detail);
        if detail.is_terminal() {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
