use restock_core::TargetState;

#[test]
fn restock_delivery_stamps_attempt_and_success() {
    let mut state = TargetState::new();

    state.record_restock_alert(false, 100);
    assert_eq!(state.last_in_notify_attempt_ts, 100);
    assert_eq!(state.last_in_notify_ok_ts, 0);

    state.record_restock_alert(true, 200);
    assert_eq!(state.last_in_notify_attempt_ts, 200);
    assert_eq!(state.last_in_notify_ok_ts, 200);
}

#[test]
fn error_delivery_stamps_only_on_success() {
    let mut state = TargetState::new();

    state.record_error_alert(false, 100);
    assert_eq!(state.last_err_notify_ts, 0);

    state.record_error_alert(true, 200);
    assert_eq!(state.last_err_notify_ts, 200);
}
