/// Threshold and cooldown tunables for the state machine.
///
/// Values are validated and clamped by the config layer before they reach
/// the core; the defaults here are the fallback for an unconfigured run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Consecutive IN-leaning probes required before a restock is confirmed.
    pub in_confirmations_required: u32,
    /// Consecutive ERROR outcomes before an error alert is considered.
    pub error_streak_notify_threshold: u32,
    /// Minimum seconds between successful error alerts for one target.
    pub error_notify_cooldown_secs: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            in_confirmations_required: 2,
            error_streak_notify_threshold: 5,
            error_notify_cooldown_secs: 3600,
        }
    }
}
