//! End-to-end scenarios for the AI status tracker.
//!
//! Walks the tracker through the sequences a note page goes through while a
//! summary or tag set is generated, checking the snapshot after every step.

use notewise_core::{
    classify, AiErrorKind, AiStatus, AiStatusState, AiStatusTracker, Error, ProcessType,
};

fn assert_reset_state(state: &AiStatusState) {
    assert_eq!(state.status, AiStatus::Idle);
    assert!(state.process_type.is_none());
    assert_eq!(state.message, "");
    assert!(state.error.is_none());
}

#[test]
fn test_summary_loading_success_reset() {
    let mut tracker = AiStatusTracker::new();

    tracker.set_loading(ProcessType::Summary, None);
    assert_eq!(tracker.status(), AiStatus::Loading);
    assert_eq!(tracker.state().process_type, Some(ProcessType::Summary));
    assert_eq!(tracker.state().message, "요약 생성 중...");
    let loading_at = tracker.state().timestamp.expect("loading sets a timestamp");

    tracker.set_success(ProcessType::Summary, None);
    assert_eq!(tracker.status(), AiStatus::Success);
    assert_eq!(tracker.state().message, "요약 생성 완료");
    assert!(tracker.state().error.is_none());
    assert!(tracker.state().timestamp.unwrap() >= loading_at);

    tracker.reset();
    assert_reset_state(tracker.state());
}

#[test]
fn test_tags_error_then_clear() {
    let mut tracker = AiStatusTracker::new();

    tracker.set_error(ProcessType::Tags, "network down", None);
    assert_eq!(tracker.status(), AiStatus::Error);
    assert_eq!(tracker.state().error.as_deref(), Some("network down"));
    assert_eq!(tracker.state().process_type, Some(ProcessType::Tags));
    assert_eq!(tracker.state().message, "태그 생성 실패");

    tracker.clear_error();
    assert_eq!(tracker.status(), AiStatus::Idle);
    assert!(tracker.state().error.is_none());
    assert_eq!(tracker.state().process_type, Some(ProcessType::Tags));
    assert_eq!(tracker.state().message, "태그 생성 실패");
}

#[test]
fn test_success_snapshot_has_no_error_key() {
    let mut tracker = AiStatusTracker::new();
    tracker.set_error(ProcessType::Summary, "boom", None);
    tracker.set_success(ProcessType::Summary, None);

    let json = serde_json::to_value(tracker.state()).unwrap();
    assert!(json.get("error").is_none());
}

#[test]
fn test_reset_after_every_state() {
    let steps: [fn(&mut AiStatusTracker); 4] = [
        |_| {},
        |t| t.set_loading(ProcessType::Tags, Some("…")),
        |t| t.set_success(ProcessType::Summary, None),
        |t| t.set_error(ProcessType::Tags, "x", None),
    ];
    for step in steps {
        let mut tracker = AiStatusTracker::new();
        step(&mut tracker);
        tracker.reset();
        assert_reset_state(tracker.state());
    }
}

#[test]
fn test_timestamps_monotonic_over_sequence() {
    let mut tracker = AiStatusTracker::new();
    let mut previous = None;
    for _ in 0..50 {
        tracker.set_loading(ProcessType::Summary, None);
        tracker.set_error(ProcessType::Summary, "X", None);
        let ts = tracker.state().timestamp.unwrap();
        if let Some(prev) = previous {
            assert!(ts >= prev);
        }
        previous = Some(ts);
    }
    assert_eq!(tracker.state().error.as_deref(), Some("X"));
}

#[test]
fn test_tracker_reused_across_operations() {
    let mut tracker = AiStatusTracker::new();

    tracker.set_loading(ProcessType::Summary, None);
    tracker.set_success(ProcessType::Summary, None);
    tracker.set_loading(ProcessType::Tags, None);
    assert_eq!(tracker.state().message, "태그 생성 중...");
    tracker.set_success(ProcessType::Tags, Some("태그 3개 생성"));
    assert_eq!(tracker.state().message, "태그 3개 생성");
}

#[test]
fn test_classified_failure_flows_into_tracker() {
    let mut tracker = AiStatusTracker::new();
    let info = classify(&Error::Timeout("120s".into()));
    assert_eq!(info.kind, AiErrorKind::Network);
    assert!(info.retryable);

    tracker.set_error_info(ProcessType::Summary, &info);
    assert_eq!(tracker.state().error.as_deref(), Some(info.user_message.as_str()));
}

#[test]
fn test_last_writer_wins_without_tokens() {
    let mut tracker = AiStatusTracker::new();
    tracker.set_loading(ProcessType::Summary, None);
    tracker.set_loading(ProcessType::Tags, None);
    // The summary completion arrives late and overwrites the tags snapshot.
    tracker.set_success(ProcessType::Summary, None);
    assert_eq!(tracker.state().process_type, Some(ProcessType::Summary));
    assert_eq!(tracker.status(), AiStatus::Success);
}
