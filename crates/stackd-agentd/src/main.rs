//! stackd-agentd: stages the configured run-once applications and drives
//! them against a simulated resource manager until each has a result.
//!
//! ```text
//! stackd-agentd --config agent.json --print-metrics
//! ```
mod config;
mod driver;

use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::{debug, error, info, warn};

use stackd_core::prelude::*;
use stackd_observe::{init_local_offset, init_logger};
use stackd_prometheus::{Encoder, PrometheusMetrics, ProcessSnapshot, TextEncoder};
use stackd_state::{RedbStateStorage, StateHandle, noop_storage};

use crate::{
    config::{AgentConfig, HostConfig},
    driver::SimulatedDriver,
};

#[derive(Parser)]
#[command(name = "stackd-agentd", about = "Run-once application scheduler")]
struct Cli {
    /// JSON configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the Prometheus text exposition to stdout before exiting.
    #[arg(long)]
    print_metrics: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };

    // 1) logger; the local offset can only be read while single-threaded
    init_local_offset();
    init_logger(&cfg.logger)?;
    info!("logger initialized");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(cfg, cli.print_metrics))
}

async fn run(cfg: AgentConfig, print_metrics: bool) -> anyhow::Result<()> {
    // 2) state storage
    let storage: StateHandle = match &cfg.state_path {
        Some(path) => {
            info!(path = %path.display(), "recording state");
            Arc::new(RedbStateStorage::open(path)?)
        }
        None => noop_storage(),
    };

    // 3) metrics
    let metrics = PrometheusMetrics::new()?;

    // 4) runner
    let runner = RunOnceRunner::new().with_context(RunnerContext::new(
        storage.clone(),
        Arc::new(metrics.clone()),
    ));

    // 5) stage applications
    let mut pending = Vec::with_capacity(cfg.applications.len());
    for app in cfg.applications.iter().cloned() {
        let id = app.id.clone();
        let rx = runner.stage_application(app)?;
        info!(app = %id, "application staged");
        pending.push((id, rx));
    }

    // 6) offer rounds
    let driver = SimulatedDriver::new(
        cfg.hosts
            .iter()
            .filter(|h| h.failing)
            .map(|h| h.hostname.clone()),
    );
    let mut ticker = tokio::time::interval(cfg.tick());
    let mut round = 0;
    while !runner.is_empty() {
        if round == cfg.max_ticks {
            warn!(
                rounds = round,
                staged = ?runner.staged_applications(),
                "giving up, applications still staged"
            );
            break;
        }
        ticker.tick().await;
        offer_round(&runner, &driver, &cfg.hosts, round);
        for status in driver.drain() {
            if !runner.status_update(&status) {
                debug!(task = %status.task_id, "status for unknown application");
            }
        }
        round += 1;
    }

    // 7) results
    let mut failed = 0;
    for (id, mut rx) in pending {
        match rx.try_recv() {
            Ok(status) => match status.into_result() {
                Ok(()) => info!(app = %id, "application finished"),
                Err(e) => {
                    failed += 1;
                    error!(app = %id, error = %e, "application failed");
                }
            },
            Err(_) => {
                failed += 1;
                warn!(app = %id, "application has no result");
            }
        }
    }

    let stacks: BTreeSet<&str> = cfg
        .applications
        .iter()
        .filter_map(|a| a.parent.as_deref())
        .collect();
    for stack in stacks {
        match storage.get_stack_state(stack) {
            Ok(states) => info!(stack, ?states, "stack state"),
            Err(e) => warn!(stack, error = %e, "failed to read stack state"),
        }
    }

    // 8) metrics
    match ProcessSnapshot::capture() {
        Ok(snap) => debug!(?snap, "process usage"),
        Err(e) => warn!(error = %e, "failed to read process usage"),
    }
    metrics.observe_process();
    if print_metrics {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
        print!("{}", String::from_utf8(buf)?);
    }

    if failed > 0 {
        anyhow::bail!("{failed} application(s) did not complete");
    }
    Ok(())
}

/// Offer every host once; declined offers go back to the driver.
fn offer_round(runner: &RunOnceRunner, driver: &SimulatedDriver, hosts: &[HostConfig], round: u32) {
    for host in hosts {
        let offer = host.offer(round);
        match runner.resource_offer(driver, &offer) {
            Ok(OfferOutcome::Launched(task)) => {
                debug!(task = %task, host = %offer.hostname, "launched");
            }
            Ok(OfferOutcome::Declined(reason)) => {
                if let Err(e) = driver.decline_offer(&offer.id, &reason.to_string()) {
                    warn!(offer = %offer.id, error = %e, "decline failed");
                }
            }
            Err(e) => warn!(offer = %offer.id, error = %e, "offer not used"),
        }
    }
}
