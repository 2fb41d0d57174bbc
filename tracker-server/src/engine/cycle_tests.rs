//! Unit tests for the aggregation cycle and poller.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::{CycleStatus, SearchKind};
use crate::olhovivo::{MockOlhoVivo, mock_line, mock_vehicle};

use super::*;

fn config() -> EngineConfig {
    EngineConfig {
        poll_interval: Duration::from_millis(20),
        batch_size: 8,
        fallback_scan_lines: Vec::new(),
    }
}

fn progress(generation: u64) -> CycleProgress {
    CycleProgress::new(
        Arc::new(watch::channel(String::new()).0),
        Arc::new(AtomicU64::new(0)),
        generation,
    )
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn prefixes_of(snapshot: &crate::domain::AggregatedSnapshot) -> Vec<String> {
    snapshot
        .vehicles
        .iter()
        .map(|v| v.report.prefix.clone())
        .collect()
}

#[tokio::test]
async fn line_term_yields_tagged_vehicles() {
    // Scenario: one line code resolving to a single direction with three
    // vehicles on it.
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));
    mock.add_positions(
        1273,
        vec![
            mock_vehicle("11111", "2024-03-15T10:00:00Z"),
            mock_vehicle("22222", "2024-03-15T10:00:05Z"),
            mock_vehicle("33333", "2024-03-15T10:00:10Z"),
        ],
    );

    let snapshot = run_cycle(&mock, &terms(&["1017-10"]), 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.vehicle_count(), 3);
    assert_eq!(snapshot.status, CycleStatus::Ok);
    for v in &snapshot.vehicles {
        assert_eq!(v.search_kind, SearchKind::Line);
        assert_eq!(v.line_code, "1017-10");
        assert_eq!(v.line_index, 0);
    }
}

#[tokio::test]
async fn prefix_term_found_via_discovery() {
    // Scenario: a 5-digit term classifies as a prefix and is located in a
    // line the user never asked for.
    let mut mock = MockOlhoVivo::new();
    mock.add_discovery_line(mock_line(900, "8015", 10, 1));
    mock.add_line("8015-10", mock_line(900, "8015", 10, 1));
    mock.add_positions(900, vec![mock_vehicle("12345", "2024-03-15T10:00:00Z")]);

    let snapshot = run_cycle(&mock, &terms(&["12345"]), 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.vehicle_count(), 1);
    let v = &snapshot.vehicles[0];
    assert_eq!(v.search_kind, SearchKind::Prefix);
    assert_eq!(v.found_in_line.as_deref(), Some("8015-10"));
    assert_eq!(v.line_code, "8015-10");
}

#[tokio::test]
async fn empty_terms_publish_idle_without_network_calls() {
    let mock = MockOlhoVivo::new();

    let snapshot = run_cycle(&mock, &[], 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.vehicle_count(), 0);
    assert_eq!(snapshot.status, CycleStatus::Idle);
    assert_eq!(mock.auth_calls(), 0);
    assert_eq!(mock.search_calls(), 0);
    assert_eq!(mock.position_calls(), 0);
}

#[tokio::test]
async fn blank_terms_count_as_empty() {
    let mock = MockOlhoVivo::new();

    let snapshot =
        run_cycle(&mock, &terms(&["", "   "]), 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.status, CycleStatus::Idle);
    assert_eq!(mock.auth_calls(), 0);
}

#[tokio::test]
async fn auth_failure_fails_the_cycle_fast() {
    let mut mock = MockOlhoVivo::failing_auth();
    mock.add_line("1017-10", mock_line(1273, "1017", 10, 1));

    let snapshot = run_cycle(&mock, &terms(&["1017-10"]), 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.status, CycleStatus::AuthFailed);
    assert_eq!(snapshot.vehicle_count(), 0);
    assert_eq!(mock.auth_calls(), 1);
    // Fail fast: no position traffic after a failed login.
    assert_eq!(mock.search_calls(), 0);
    assert_eq!(mock.position_calls(), 0);
}

#[tokio::test]
async fn duplicate_vehicle_across_two_lines_appears_once() {
    // Scenario: the same fleet prefix reported under two different line
    // terms, e.g. a data glitch upstream.
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_line("1020-10", mock_line(2, "1020", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("12345", "2024-03-15T10:00:00Z")]);
    mock.add_positions(2, vec![mock_vehicle("12345", "2024-03-15T10:07:00Z")]);

    let snapshot = run_cycle(
        &mock,
        &terms(&["1017-10", "1020-10"]),
        1,
        &config(),
        &progress(1),
    )
    .await;

    assert_eq!(snapshot.vehicle_count(), 1);
    // The fresher report survived, attribution included.
    assert_eq!(snapshot.vehicles[0].line_code, "1020-10");
    assert_eq!(snapshot.vehicles[0].report.updated_at, "2024-03-15T10:07:00Z");
}

#[tokio::test]
async fn cross_source_duplicate_appears_once() {
    // The same vehicle found both through its line and through a prefix
    // term scanning the fallback list.
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("12345", "2024-03-15T10:00:00Z")]);
    mock.add_line("8015-10", mock_line(2, "8015", 10, 1));
    mock.add_positions(2, vec![mock_vehicle("12345", "2024-03-15T10:09:00Z")]);
    mock.fail_search(""); // force the fallback scan list

    let cfg = EngineConfig {
        fallback_scan_lines: vec!["8015-10".to_string()],
        ..config()
    };

    let snapshot = run_cycle(
        &mock,
        &terms(&["1017-10", "12345"]),
        1,
        &cfg,
        &progress(1),
    )
    .await;

    assert_eq!(snapshot.vehicle_count(), 1);
    let v = &snapshot.vehicles[0];
    assert_eq!(v.report.updated_at, "2024-03-15T10:09:00Z");
    assert_eq!(v.search_kind, SearchKind::Prefix);
    assert_eq!(v.found_in_line.as_deref(), Some("8015-10"));
}

#[tokio::test]
async fn snapshot_prefixes_are_unique() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_line("1017-10", mock_line(2, "1017", 10, 2));
    mock.add_line("1020-10", mock_line(3, "1020", 10, 1));
    mock.add_positions(
        1,
        vec![
            mock_vehicle("11111", "t1"),
            mock_vehicle("22222", "t1"),
        ],
    );
    mock.add_positions(2, vec![mock_vehicle("11111", "t2")]);
    mock.add_positions(3, vec![mock_vehicle("22222", "t3")]);

    let snapshot = run_cycle(
        &mock,
        &terms(&["1017-10", "1020-10"]),
        1,
        &config(),
        &progress(1),
    )
    .await;

    let prefixes = prefixes_of(&snapshot);
    let unique: HashSet<_> = prefixes.iter().collect();
    assert_eq!(unique.len(), prefixes.len());
    assert_eq!(unique.len(), 2);
}

#[tokio::test]
async fn nothing_found_is_distinct_from_failure() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![]);

    let snapshot = run_cycle(&mock, &terms(&["1017-10"]), 1, &config(), &progress(1)).await;

    assert_eq!(snapshot.status, CycleStatus::NothingFound);
    assert_eq!(snapshot.vehicle_count(), 0);
}

#[tokio::test]
async fn repeated_cycles_are_idempotent() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(
        1,
        vec![
            mock_vehicle("11111", "2024-03-15T10:00:00Z"),
            mock_vehicle("22222", "2024-03-15T10:00:00Z"),
        ],
    );

    let term_list = terms(&["1017-10"]);
    let first = run_cycle(&mock, &term_list, 1, &config(), &progress(1)).await;
    let second = run_cycle(&mock, &term_list, 2, &config(), &progress(2)).await;

    let first_ids: HashSet<_> = prefixes_of(&first).into_iter().collect();
    let second_ids: HashSet<_> = prefixes_of(&second).into_iter().collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn authentication_is_memoized_across_cycles() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("11111", "t1")]);

    let term_list = terms(&["1017-10"]);
    run_cycle(&mock, &term_list, 1, &config(), &progress(1)).await;
    run_cycle(&mock, &term_list, 2, &config(), &progress(2)).await;

    // The mock does not memoize, so this counts engine-level calls: the
    // engine re-invokes authenticate each cycle and relies on the client
    // to short-circuit.
    assert_eq!(mock.auth_calls(), 2);
}

#[tokio::test]
async fn progress_reports_phases() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("11111", "t1")]);

    let (tx, rx) = watch::channel(String::new());
    let progress = CycleProgress::new(Arc::new(tx), Arc::new(AtomicU64::new(0)), 1);
    run_cycle(&mock, &terms(&["1017-10"]), 1, &config(), &progress).await;

    let last = rx.borrow().clone();
    assert!(last.starts_with("done:"), "unexpected progress: {last}");
    assert!(last.contains("1 vehicles"));
}

#[test]
fn superseded_cycle_progress_is_silenced() {
    let (tx, rx) = watch::channel(String::new());
    let tx = Arc::new(tx);
    let gate = Arc::new(AtomicU64::new(0));

    let older = CycleProgress::new(tx.clone(), gate.clone(), 1);
    let newer = CycleProgress::new(tx, gate, 2);

    older.report("fetching 3 lines");
    assert_eq!(*rx.borrow(), "fetching 3 lines");

    // Once the newer cycle has spoken, the older one falls silent.
    newer.report("authenticating");
    older.report("done: 3 lines, 0 prefixes, 7 vehicles");
    assert_eq!(*rx.borrow(), "authenticating");
}

#[tokio::test]
async fn poller_publishes_snapshots() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("11111", "t1")]);

    let handle = Poller::start(Arc::new(mock), terms(&["1017-10"]), config());
    let mut rx = handle.snapshots();

    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("no snapshot within timeout")
        .expect("snapshot channel closed");

    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.vehicle_count(), 1);
    assert_eq!(snapshot.status, CycleStatus::Ok);
    assert!(snapshot.generation >= 1);

    handle.stop();
}

#[tokio::test]
async fn tracker_swaps_term_lists() {
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("11111", "t1")]);
    mock.add_line("1020-10", mock_line(2, "1020", 10, 1));
    mock.add_positions(2, vec![mock_vehicle("22222", "t1")]);

    let tracker = Tracker::new(Arc::new(mock), config());

    tracker.set_terms(terms(&["1017-10"])).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(prefixes_of(&tracker.snapshot().await), vec!["11111"]);

    tracker.set_terms(terms(&["1020-10"])).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(prefixes_of(&tracker.snapshot().await), vec!["22222"]);

    tracker.clear().await;
    let snapshot = tracker.snapshot().await;
    assert_eq!(snapshot.status, CycleStatus::Idle);
    assert!(tracker.terms().await.is_empty());
}

#[tokio::test]
async fn superseded_cycles_never_reach_the_new_snapshot() {
    // Slow position fetches so the first term list's cycle is still in
    // flight when the term list changes underneath it.
    let mut mock = MockOlhoVivo::new();
    mock.add_line("1017-10", mock_line(1, "1017", 10, 1));
    mock.add_positions(1, vec![mock_vehicle("11111", "t1")]);
    mock.add_line("1020-10", mock_line(2, "1020", 10, 1));
    mock.add_positions(2, vec![mock_vehicle("22222", "t1")]);
    mock.with_position_latency(Duration::from_millis(50));

    let tracker = Tracker::new(Arc::new(mock), config());

    tracker.set_terms(terms(&["1017-10"])).await;
    // Replace before the first slow cycle can complete.
    tracker.set_terms(terms(&["1020-10"])).await;

    tokio::time::sleep(Duration::from_millis(300)).await;

    let snapshot = tracker.snapshot().await;
    assert_eq!(prefixes_of(&snapshot), vec!["22222"]);
}
