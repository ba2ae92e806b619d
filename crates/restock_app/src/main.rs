mod config;
mod logging;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use monitor_logging::{get_run_seq, monitor_error, monitor_info, set_run_seq};
use restock_engine::{Monitor, ReqwestFetcher, RonFileStore};

use crate::logging::LogDestination;

struct CliArgs {
    config_path: PathBuf,
    once: bool,
    log_destination: LogDestination,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut config_path = None;
    let mut once = false;
    let mut log_destination = LogDestination::Terminal;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => once = true,
            "--log" => {
                let value = args.next().unwrap_or_default();
                log_destination = match value.as_str() {
                    "term" => LogDestination::Terminal,
                    "file" => LogDestination::File,
                    "both" => LogDestination::Both,
                    other => bail!("unknown log destination '{other}' (term|file|both)"),
                };
            }
            other if config_path.is_none() => config_path = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{other}'"),
        }
    }

    let Some(config_path) = config_path else {
        bail!("usage: restock <config.ron> [--once] [--log term|file|both]");
    };
    Ok(CliArgs {
        config_path,
        once,
        log_destination,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    logging::initialize(args.log_destination);

    let cfg = config::load(&args.config_path)
        .with_context(|| format!("loading {}", args.config_path.display()))?;
    monitor_info!(
        "watching {} target(s) on {} channel(s)",
        cfg.targets.len(),
        cfg.channels.len()
    );

    let monitor = Monitor::new(
        Arc::new(ReqwestFetcher::new(cfg.fetch.clone())),
        cfg.channels.clone(),
        Arc::new(RonFileStore::new(cfg.state_dir.clone())),
        cfg.probe.clone(),
        cfg.thresholds.clone(),
    );

    if args.once {
        let report = monitor.run_check(&cfg.targets).await?;
        println!("{}", report.summary);
        return Ok(());
    }

    let mut seq: u64 = 0;
    loop {
        seq += 1;
        set_run_seq(seq);
        match monitor.run_check(&cfg.targets).await {
            Ok(report) => {
                monitor_info!("run {}: {}", get_run_seq(), report.summary);
            }
            Err(err) => {
                // A store failure aborts this run but not the scheduler.
                monitor_error!("run {} aborted: {}", get_run_seq(), err);
            }
        }
        tokio::time::sleep(cfg.interval).await;
    }
}
