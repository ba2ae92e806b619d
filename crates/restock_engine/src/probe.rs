use std::time::Duration;

use monitor_logging::monitor_debug;
use restock_core::ProbeOutcome;

use crate::fetch::PageFetcher;
use crate::target::TargetSpec;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Pause before the second read of a page that looked purchasable.
    pub confirm_delay: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            confirm_delay: Duration::from_secs(8),
        }
    }
}

/// Probes one target: tries its candidate URLs in order and stops at the
/// first conclusive result.
///
/// An out-of-stock match is conclusive immediately. A page that looks
/// purchasable is only trusted after a delayed re-read of the same URL,
/// which filters stock flashing available for seconds. Fetch or sanity
/// failures advance to the next URL; only exhausting every URL yields an
/// ERROR outcome, carrying the last reason and last URL attempted.
pub async fn probe(
    target: &TargetSpec,
    fetcher: &dyn PageFetcher,
    settings: &ProbeSettings,
) -> ProbeOutcome {
    let mut last_reason = String::from("no_urls");
    let mut last_url = String::new();

    for url in &target.urls {
        last_url = url.clone();

        let first = fetcher.fetch(url).await;
        let body = match first.body {
            Some(body) => body,
            None => {
                last_reason = http_reason("", first.status);
                continue;
            }
        };
        if !passes_sanity(target, &body) {
            monitor_debug!("{}: sanity markers missing at {}", target.name, url);
            last_reason = format!("sanity_failed@{url}");
            continue;
        }
        if matches_out_of_stock(target, &body) {
            return ProbeOutcome::out(url, "out_of_stock_keyword");
        }

        // Looks purchasable. Re-read the same URL after a delay before
        // trusting it.
        tokio::time::sleep(settings.confirm_delay).await;
        let second = fetcher.fetch(url).await;
        let body = match second.body {
            Some(body) => body,
            None => {
                last_reason = http_reason("confirm_", second.status);
                continue;
            }
        };
        if !passes_sanity(target, &body) {
            last_reason = format!("confirm_sanity_failed@{url}");
            continue;
        }
        if matches_out_of_stock(target, &body) {
            return ProbeOutcome::out(url, "flap_back_to_out");
        }
        return ProbeOutcome::in_stock(url, "confirmed_in_stock");
    }

    ProbeOutcome::error(last_url, last_reason)
}

fn http_reason(prefix: &str, status: u16) -> String {
    if status == 0 {
        format!("{prefix}http_error")
    } else {
        format!("{prefix}http_{status}")
    }
}

fn passes_sanity(target: &TargetSpec, body: &str) -> bool {
    if target.must_contain_any.is_empty() {
        return true;
    }
    let lowered = body.to_lowercase();
    target
        .must_contain_any
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn matches_out_of_stock(target: &TargetSpec, body: &str) -> bool {
    target
        .out_of_stock_patterns
        .iter()
        .any(|pattern| pattern.is_match(body))
}
