use super::*;
use chrono::TimeZone;
use lrc_core::test_support::region_state;
use tempfile::tempdir;

#[test]
fn rpo_snapshot_serializes_with_expected_field_names() {
    let snapshot = RpoSnapshot {
        lag: 1_000_000_000,
        safe_time: Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap(),
    };
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["lag"], 1_000_000_000u64);
    assert!(value.get("safe-time").is_some());
    assert!(value.get("safe_time").is_none());
}

#[tokio::test]
async fn scenario_s5_rpo_baseline_through_main_loop() {
    let mut history = ApplyHistory::new();
    let query = region_state(1, "", "", 1, 5, Utc::now());
    let voter_time = history.rpo_query(&query);
    assert_eq!(voter_time, history.birth);
}

#[tokio::test]
async fn run_exits_when_cancelled_before_deadline() {
    let dir = tempdir().unwrap();
    let config = RpoConfig {
        voters: vec![],
        learners: vec![],
        tikv_ctl_path: "true".to_string(),
        history_path: dir.path().join("history.json"),
        save_path: dir.path().join("rpo.json"),
        last_for: StdDuration::from_secs(300),
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        cancel_clone.cancel();
    });

    let result = tokio::time::timeout(StdDuration::from_secs(5), run(&config, cancel)).await;
    assert!(result.is_ok(), "run() should return once cancelled");
    assert!(result.unwrap().is_ok());
    assert!(dir.path().join("history.json").exists());
}
