use std::sync::Arc;

use chrono::{DateTime, Utc};
use monitor_logging::{monitor_info, monitor_warn};
use restock_core::{apply_outcome, Effect, StateMap, Thresholds};

use crate::fetch::PageFetcher;
use crate::message::{error_message, restock_message};
use crate::notify::{notify_all, Channel};
use crate::probe::{probe, ProbeSettings};
use crate::store::{PersistError, StateStore};
use crate::target::TargetSpec;

/// Injectable wall clock, unix seconds.
pub type NowFn = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Result of one full check cycle.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// The state map as persisted at the end of the run.
    pub state: StateMap,
    /// Confirmed status changes, in target-list order.
    pub changes: Vec<String>,
    /// Human-readable, timestamped summary of the run.
    pub summary: String,
}

/// Wires probe engine, state machine, fan-out and store together for one
/// deployment. Targets are passed per call so the caller owns the list.
pub struct Monitor {
    fetcher: Arc<dyn PageFetcher>,
    channels: Vec<Arc<dyn Channel>>,
    store: Arc<dyn StateStore>,
    probe_settings: ProbeSettings,
    thresholds: Thresholds,
    now_ts: NowFn,
}

impl Monitor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        channels: Vec<Arc<dyn Channel>>,
        store: Arc<dyn StateStore>,
        probe_settings: ProbeSettings,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            fetcher,
            channels,
            store,
            probe_settings,
            thresholds,
            now_ts: Arc::new(|| Utc::now().timestamp()),
        }
    }

    /// Replaces the wall clock, so tests can drive time explicitly.
    pub fn with_clock(mut self, now_ts: NowFn) -> Self {
        self.now_ts = now_ts;
        self
    }

    /// Runs one full check cycle: load snapshot, probe every target in
    /// list order, apply the state machine, execute its effects, prune
    /// entries for removed targets, and persist the snapshot once.
    ///
    /// Per-target probe and notification failures are absorbed; only a
    /// store load/save failure aborts the run.
    pub async fn run_check(&self, targets: &[TargetSpec]) -> Result<CheckReport, PersistError> {
        let mut state = self.store.load()?;
        let mut changes = Vec::new();

        for target in targets {
            let prior = state.get(&target.name).cloned().unwrap_or_default();
            let outcome = probe(target, self.fetcher.as_ref(), &self.probe_settings).await;
            let now = (self.now_ts)();

            let (mut next, effects) =
                apply_outcome(&target.name, prior, &outcome, now, &self.thresholds);

            for effect in effects {
                match effect {
                    Effect::Changed(event) => {
                        monitor_info!("{}", event);
                        changes.push(event);
                    }
                    Effect::SendRestockAlert {
                        name,
                        url,
                        confirmations,
                    } => {
                        if self.channels.is_empty() {
                            continue;
                        }
                        let (title, body) = restock_message(&name, &url, confirmations);
                        let report = notify_all(&self.channels, &title, &body).await;
                        for error in &report.errors {
                            monitor_warn!("restock alert for {}: {}", name, error);
                        }
                        next.record_restock_alert(report.delivered(), now);
                    }
                    Effect::SendErrorAlert {
                        name,
                        reason,
                        streak,
                    } => {
                        if self.channels.is_empty() {
                            continue;
                        }
                        let (title, body) = error_message(&name, &reason, streak);
                        let report = notify_all(&self.channels, &title, &body).await;
                        for error in &report.errors {
                            monitor_warn!("error alert for {}: {}", name, error);
                        }
                        next.record_error_alert(report.delivered(), now);
                    }
                }
            }

            state.insert(target.name.clone(), next);
        }

        // Drop entries for targets no longer configured.
        state.retain(|name, _| targets.iter().any(|target| &target.name == name));

        self.store.save(&state)?;

        let summary = render_summary(&changes, (self.now_ts)());
        Ok(CheckReport {
            state,
            changes,
            summary,
        })
    }

    /// Read-only snapshot of current state, filtered to the configured
    /// target names, with zero defaults for targets never yet probed.
    pub fn status(&self, targets: &[TargetSpec]) -> Result<StateMap, PersistError> {
        let stored = self.store.load()?;
        Ok(targets
            .iter()
            .map(|target| {
                let state = stored.get(&target.name).cloned().unwrap_or_default();
                (target.name.clone(), state)
            })
            .collect())
    }
}

fn render_summary(changes: &[String], now: i64) -> String {
    let stamp = DateTime::<Utc>::from_timestamp(now, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| now.to_string());
    if changes.is_empty() {
        format!("[{stamp}] OK - no changes")
    } else {
        changes
            .iter()
            .map(|change| format!("[{stamp}] {change}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
