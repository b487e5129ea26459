use quiz_core::model::HistoryEntry;
use quiz_core::time::fixed_now;

use super::test_harness::{ViewKind, setup_view_harness};

fn entry(correct: u32, wrong: u32, completed: bool) -> HistoryEntry {
    HistoryEntry {
        correct_count: correct,
        wrong_count: wrong,
        tab_open_seconds: 95,
        tab_switch_count: 1,
        completed_at: completed.then(fixed_now),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_idle_page() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    harness.rebuild();
    let html = harness.render();

    for expected in [
        r#"id="time""#,
        "05:00",
        r#"id="start""#,
        "Start quiz",
        r#"id="quiz-box""#,
        r#"id="submit""#,
        r#"id="camera""#,
        r#"id="result""#,
        r#"id="history""#,
        "Camera off",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("quiz-question"), "questions before start in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_lists_previous_attempts() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    harness.history.append(entry(1, 0, true)).await.unwrap();

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Previous attempts"), "missing heading in {html}");
    assert!(html.contains("100%"), "missing score in {html}");
    assert!(!html.contains("No quiz attempts yet."), "stale empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_rows() {
    let mut harness = setup_view_harness(ViewKind::History);
    harness.history.append(entry(1, 1, true)).await.unwrap();
    harness.history.append(entry(0, 2, false)).await.unwrap();

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Tab switches"), "missing header in {html}");
    assert!(html.contains("50%"), "missing first row in {html}");
    assert!(html.contains("0%"), "missing second row in {html}");
    assert!(html.contains("1m 35s"), "missing time on tab in {html}");
    assert!(html.contains("2023-11-14 22:13 UTC"), "missing timestamp in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No quiz attempts yet."), "missing empty state in {html}");
}
