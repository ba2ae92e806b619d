use crate::{Effect, ProbeOutcome, ProbeVerdict, StockStatus, TargetState, Thresholds};

/// Pure transition function: applies one probe outcome to a target's prior
/// state and returns the new state plus any effects to execute.
///
/// `status` only flips OUT -> IN through the confirmation streak; IN -> OUT
/// is immediate and unconditional. ERROR outcomes leave `status` untouched
/// and feed the error-burst alerting policy: the alert fires once the
/// streak reaches its threshold and the cooldown since the last accepted
/// alert has elapsed, while the streak itself keeps climbing.
pub fn apply_outcome(
    name: &str,
    prior: TargetState,
    outcome: &ProbeOutcome,
    now: i64,
    thresholds: &Thresholds,
) -> (TargetState, Vec<Effect>) {
    let mut state = prior;
    let mut effects = Vec::new();

    match outcome.verdict {
        ProbeVerdict::Error => {
            state.err_streak = state.err_streak.saturating_add(1);
            if state.status == StockStatus::Out {
                // An inconclusive read breaks the consecutive-IN streak.
                state.in_streak = 0;
            }
            let due = state.err_streak >= thresholds.error_streak_notify_threshold;
            let cooled =
                now - state.last_err_notify_ts >= thresholds.error_notify_cooldown_secs;
            if due && cooled {
                effects.push(Effect::SendErrorAlert {
                    name: name.to_string(),
                    reason: outcome.reason.clone(),
                    streak: state.err_streak,
                });
            }
        }
        ProbeVerdict::Out => {
            state.err_streak = 0;
            state.in_streak = 0;
            state.in_since_ts = 0;
            if state.status == StockStatus::In {
                effects.push(Effect::Changed(format!("{name}: IN -> OUT")));
            }
            state.status = StockStatus::Out;
        }
        ProbeVerdict::In => {
            state.err_streak = 0;
            if state.status == StockStatus::Out {
                state.in_streak = state.in_streak.saturating_add(1);
                if state.in_streak >= thresholds.in_confirmations_required {
                    state.status = StockStatus::In;
                    state.in_since_ts = now;
                    effects.push(Effect::Changed(format!("{name}: OUT -> IN")));
                    effects.push(Effect::SendRestockAlert {
                        name: name.to_string(),
                        url: outcome.url.clone(),
                        confirmations: state.in_streak,
                    });
                }
                // Below the threshold the streak accumulates silently.
            } else {
                state.in_streak = state
                    .in_streak
                    .saturating_add(1)
                    .min(thresholds.in_confirmations_required);
                // Retry rule: keep resending the restock alert until one
                // channel has accepted it since the OUT -> IN transition.
                if state.last_in_notify_ok_ts < state.in_since_ts {
                    effects.push(Effect::SendRestockAlert {
                        name: name.to_string(),
                        url: outcome.url.clone(),
                        confirmations: state.in_streak,
                    });
                }
            }
        }
    }

    state.last_used_url = outcome.url.clone();
    state.last_reason = outcome.reason.clone();
    state.ts = now;

    (state, effects)
}
