use std::fs;
use std::time::Duration;

use tempfile::TempDir;

// The config module is private to the binary; exercise it through a tiny
// include-based shim so the tests stay close to what the binary runs.
#[path = "../src/config.rs"]
mod config;

use config::ConfigError;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("watch.ron");
    fs::write(&path, content).unwrap();
    path
}

const FULL_CONFIG: &str = r#"(
    state_dir: "/var/lib/restock",
    targets: [
        (
            name: "widget",
            urls: ["https://shop.example/widget", "https://mirror.example/widget"],
            must_contain_any: ["add to cart"],
            out_of_stock_patterns: ["(?i)sold out"],
        ),
    ],
    channels: (
        telegram: Some((bot_token: "t", chat_id: "42")),
        webhook: Some((url: "https://hooks.example/x", secret: "s")),
    ),
    tunables: (
        timeout_ms: 5000,
        confirm_delay_ms: 2000,
        in_confirmations_required: 3,
        error_streak_notify_threshold: 4,
        error_notify_cooldown_secs: 900,
        interval_secs: 120,
    ),
)"#;

#[test]
fn full_config_parses_and_builds_everything() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FULL_CONFIG);

    let loaded = config::load(&path).unwrap();

    assert_eq!(loaded.targets.len(), 1);
    assert_eq!(loaded.targets[0].name, "widget");
    assert_eq!(loaded.targets[0].urls.len(), 2);
    assert_eq!(loaded.channels.len(), 2);
    assert_eq!(loaded.fetch.request_timeout, Duration::from_millis(5000));
    assert_eq!(loaded.probe.confirm_delay, Duration::from_millis(2000));
    assert_eq!(loaded.thresholds.in_confirmations_required, 3);
    assert_eq!(loaded.thresholds.error_streak_notify_threshold, 4);
    assert_eq!(loaded.thresholds.error_notify_cooldown_secs, 900);
    assert_eq!(loaded.interval, Duration::from_secs(120));
    assert_eq!(loaded.state_dir, std::path::PathBuf::from("/var/lib/restock"));
}

#[test]
fn minimal_config_gets_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "(targets: [])");

    let loaded = config::load(&path).unwrap();

    assert!(loaded.targets.is_empty());
    assert!(loaded.channels.is_empty());
    assert_eq!(loaded.thresholds.in_confirmations_required, 2);
    assert_eq!(loaded.interval, Duration::from_secs(300));
}

#[test]
fn out_of_range_tunables_are_clamped() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"(
            targets: [],
            tunables: (
                timeout_ms: 999999,
                confirm_delay_ms: 999999,
                in_confirmations_required: 0,
                error_streak_notify_threshold: 0,
                error_notify_cooldown_secs: 1,
                interval_secs: 1,
            ),
        )"#,
    );

    let loaded = config::load(&path).unwrap();

    assert_eq!(loaded.fetch.request_timeout, Duration::from_millis(60_000));
    assert_eq!(loaded.probe.confirm_delay, Duration::from_millis(60_000));
    assert_eq!(loaded.thresholds.in_confirmations_required, 1);
    assert_eq!(loaded.thresholds.error_streak_notify_threshold, 1);
    assert_eq!(loaded.thresholds.error_notify_cooldown_secs, 60);
    assert_eq!(loaded.interval, Duration::from_secs(30));
}

#[test]
fn duplicate_target_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"(
            targets: [
                (name: "widget", urls: ["https://a.example"]),
                (name: "widget", urls: ["https://b.example"]),
            ],
        )"#,
    );

    let result = config::load(&path);
    assert!(matches!(result, Err(ConfigError::DuplicateTarget(name)) if name == "widget"));
}

#[test]
fn invalid_out_of_stock_pattern_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"(
            targets: [
                (
                    name: "widget",
                    urls: ["https://a.example"],
                    out_of_stock_patterns: ["(unclosed"],
                ),
            ],
        )"#,
    );

    let result = config::load(&path);
    assert!(matches!(result, Err(ConfigError::Target(_))));
}

#[test]
fn malformed_document_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "(targets: oops");

    let result = config::load(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
