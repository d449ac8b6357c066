//! Git state extraction against real repositories in every awkward state a
//! working tree can be in: unborn branch, detached HEAD, corrupted metadata,
//! missing remotes.

mod common;

use common::{commit_all, git, git_available, init_repo};
use lookout::git::{DETACHED_BRANCH, extract_state};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_fresh_repo_with_zero_commits() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    init_repo(temp.path());
    fs::write(temp.path().join("setup.py"), "").unwrap();

    // Unborn branch: HEAD names a branch that has no commits yet.
    let snapshot = extract_state(temp.path()).expect("fresh repo is a work tree");
    assert_eq!(snapshot.branch, "main");
    assert!(snapshot.last_commit.is_none());
    assert!(snapshot.remote_url.is_none());
}

#[test]
fn test_repo_with_commits_and_remote() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    init_repo(temp.path());
    for i in 1..=3 {
        fs::write(temp.path().join(format!("file{i}.txt")), i.to_string()).unwrap();
        commit_all(temp.path(), &format!("commit {i}"));
    }
    git(
        temp.path(),
        &["remote", "add", "origin", "https://github.com/x/y.git"],
    );

    let snapshot = extract_state(temp.path()).unwrap();
    assert_eq!(snapshot.branch, "main");
    assert!(!snapshot.is_dirty);
    assert_eq!(
        snapshot.remote_url.as_deref(),
        Some("https://github.com/x/y.git")
    );

    let commit = snapshot.last_commit.expect("tip commit present");
    assert_eq!(commit.sha_prefix.len(), 8);
    assert!(commit.sha_prefix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(commit.message, "commit 3");
    assert_eq!(commit.author, "Test User <test@example.com>");
}

#[test]
fn test_untracked_file_flips_dirty() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    init_repo(temp.path());
    fs::write(temp.path().join("tracked.txt"), "v1").unwrap();
    commit_all(temp.path(), "initial");

    let snapshot = extract_state(temp.path()).unwrap();
    assert!(!snapshot.is_dirty);

    fs::write(temp.path().join("scratch.txt"), "untracked").unwrap();
    let snapshot = extract_state(temp.path()).unwrap();
    assert!(snapshot.is_dirty);
}

#[test]
fn test_detached_head() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    init_repo(temp.path());
    fs::write(temp.path().join("file.txt"), "v1").unwrap();
    commit_all(temp.path(), "initial");
    git(temp.path(), &["checkout", "-q", "--detach", "HEAD"]);

    let snapshot = extract_state(temp.path()).unwrap();
    assert_eq!(snapshot.branch, DETACHED_BRANCH);
    assert!(snapshot.last_commit.is_some());
}

#[test]
fn test_malformed_head_yields_none() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    init_repo(temp.path());
    fs::write(temp.path().join("setup.py"), "").unwrap();
    fs::write(temp.path().join(".git/HEAD"), "invalid content").unwrap();

    // Corrupted metadata must degrade to "no snapshot", never an error.
    assert!(extract_state(temp.path()).is_none());
}

#[test]
fn test_plain_directory_yields_none() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("setup.py"), "").unwrap();

    assert!(extract_state(temp.path()).is_none());
}
