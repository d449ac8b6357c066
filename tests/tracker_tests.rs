//! Scan-to-summary flow: discovered projects recorded into the history
//! store and read back as summaries and velocity views.

use lookout::scanner::Scanner;
use lookout::tracker::{Tracker, Trend};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_scan_and_record_then_summarize() {
    let root = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    let alpha = root.path().join("alpha");
    fs::create_dir(&alpha).unwrap();
    fs::write(alpha.join("Cargo.toml"), "[package]").unwrap();
    let beta = root.path().join("beta");
    fs::create_dir(&beta).unwrap();
    fs::write(beta.join("go.mod"), "module beta").unwrap();

    let scanner = Scanner::new(vec![root.path().to_path_buf()], Vec::new(), 3, true);
    let records = scanner.scan();
    assert_eq!(records.len(), 2);

    let tracker = Tracker::new(data.path().to_path_buf(), 30);
    for record in &records {
        tracker.record(record).unwrap();
    }

    let summaries = tracker.summary().unwrap();
    assert_eq!(summaries.len(), 2);
    let mut names: Vec<_> = summaries.iter().map(|s| s.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta"]);

    for summary in &summaries {
        assert_eq!(summary.inactivity_days, 0);
        // One snapshot: not enough history for any velocity claim.
        assert_eq!(summary.velocity.trend, Trend::Unknown);
    }
}

#[test]
fn test_repeated_scans_grow_history() {
    let root = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    let proj = root.path().join("app");
    fs::create_dir(&proj).unwrap();
    fs::write(proj.join("package.json"), "{}").unwrap();

    let scanner = Scanner::new(vec![root.path().to_path_buf()], Vec::new(), 3, true);
    let tracker = Tracker::new(data.path().to_path_buf(), 30);

    for _ in 0..3 {
        for record in scanner.scan() {
            tracker.record(&record).unwrap();
        }
    }

    let path = proj.canonicalize().unwrap();
    let history = tracker.history(&path).unwrap();
    assert_eq!(history.len(), 3);

    // Append-only and time-ordered.
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    // All three snapshots land on today: one active day, same-day cadence.
    let view = tracker.velocity(&path).unwrap();
    assert_eq!(view.active_days, 1);
}

#[test]
fn test_velocity_for_untracked_path() {
    let data = TempDir::new().unwrap();
    let tracker = Tracker::new(data.path().to_path_buf(), 30);

    let view = tracker.velocity(std::path::Path::new("/never/scanned")).unwrap();
    assert_eq!(view.trend, Trend::Unknown);
    assert_eq!(
        tracker
            .inactivity_days(std::path::Path::new("/never/scanned"))
            .unwrap(),
        0
    );
}
