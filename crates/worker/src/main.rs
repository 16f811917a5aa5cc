//! Caseflow Worker
//!
//! Background worker for the case-creation fan-out and notification delivery.

use anyhow::Result;
use caseflow_common::telemetry::init_tracing;
use caseflow_worker::config::ConsumersConfig;
use caseflow_worker::{WorkerConfig, WorkerPool};
use clap::Parser;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "worker")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Worker pool size
    #[arg(short, long, env = "WORKER_POOL_SIZE")]
    workers: Option<usize>,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379")]
    redis_url: String,

    /// Redis queue key prefix
    #[arg(long, env = "QUEUE_PREFIX")]
    queue_prefix: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON", action = clap::ArgAction::Set, default_value_t = true)]
    json_logging: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print metrics interval (seconds)
    #[arg(long, env = "METRICS_INTERVAL", default_value = "60")]
    metrics_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing("caseflow-worker", args.json_logging, &args.log_level)?;

    info!(redis_url = %args.redis_url, "Starting Caseflow worker");

    let mut config = WorkerConfig {
        redis_url: args.redis_url,
        consumers: ConsumersConfig::from_env()?,
        ..Default::default()
    };

    if let Some(workers) = args.workers {
        config.pool_size = workers;
    }
    if let Some(prefix) = args.queue_prefix {
        config.queue.prefix = prefix;
    }

    info!(
        pool_size = config.pool_size,
        queue_prefix = %config.queue.prefix,
        chat_webhook = config.consumers.telegram.is_some(),
        "Worker configuration loaded"
    );

    let mut pool = WorkerPool::new(config).await?;

    let shutdown_handle = pool.shutdown_handle();
    let metrics = pool.metrics().clone();

    // Graceful shutdown on ctrl-c
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Received shutdown signal");
        let _ = shutdown_handle.send(()).await;
    });

    // Periodic metrics reporting
    let metrics_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(args.metrics_interval));
        loop {
            interval.tick().await;
            let snapshot = metrics.snapshot();
            info!(
                jobs_processed = snapshot.jobs_processed,
                jobs_succeeded = snapshot.jobs_succeeded,
                jobs_failed = snapshot.jobs_failed,
                jobs_retried = snapshot.jobs_retried,
                success_rate = format!("{:.2}%", snapshot.success_rate * 100.0),
                avg_duration_ms = snapshot
                    .average_duration
                    .map(|d| d.as_millis())
                    .unwrap_or(0),
                "Worker metrics"
            );
        }
    });

    info!("Worker pool started");
    if let Err(e) = pool.start().await {
        error!(error = %e, "Worker pool error");
    }

    metrics_handle.abort();

    info!("Worker shutting down gracefully");

    Ok(())
}
