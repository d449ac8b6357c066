//! Git repository state extraction.
//!
//! Reads high-level state (branch, tip commit, dirty flag, remote URL) from a
//! possibly-inconsistent working tree through the git CLI. A live repository
//! can be in many states this module must tolerate without failing: unborn
//! branch, detached HEAD, corrupted metadata, missing remotes, or no `git`
//! binary at all. Each sub-extraction sits behind its own fault barrier and
//! defaults instead of propagating; the worst case is the whole snapshot
//! becoming `None`, never an error escaping to the scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Branch name reported for a detached HEAD.
pub const DETACHED_BRANCH: &str = "detached";

/// Branch name reported when no resolution strategy succeeds.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Length of the abbreviated commit hash carried in snapshots.
const SHA_PREFIX_LEN: usize = 8;

/// Point-in-time git state of a project working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSnapshot {
    /// Active branch name, `"detached"`, or `"unknown"`.
    pub branch: String,

    /// Tip commit metadata; `None` on an unborn branch.
    pub last_commit: Option<CommitInfo>,

    /// Whether the working tree has uncommitted or untracked changes.
    pub is_dirty: bool,

    /// URL of the `origin` remote, if one is configured.
    pub remote_url: Option<String>,
}

/// Metadata of the tip commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// First 8 hex characters of the commit hash.
    pub sha_prefix: String,

    /// First line of the commit message.
    pub message: String,

    /// Author identity (`name <email>`).
    pub author: String,

    /// Committer timestamp.
    pub committed_at: DateTime<Utc>,
}

/// Extracts a best-effort git snapshot for `dir`.
///
/// Returns `None` when `dir` is not a usable working tree: not a repository,
/// a bare repository, corrupted repository metadata (e.g. a malformed `HEAD`
/// file), or no `git` binary on PATH. Otherwise every field is populated
/// independently, with per-field fallbacks for partially-broken states.
#[must_use]
pub fn extract_state(dir: &Path) -> Option<GitSnapshot> {
    if !is_work_tree(dir) {
        debug!(dir = %dir.display(), "not a git work tree, skipping snapshot");
        return None;
    }

    Some(GitSnapshot {
        branch: resolve_branch(dir),
        last_commit: resolve_last_commit(dir),
        is_dirty: resolve_dirty(dir),
        remote_url: resolve_remote_url(dir),
    })
}

/// Runs a git subcommand in `dir` and returns trimmed stdout on success.
///
/// Any failure (spawn error, non-zero exit) yields `None`; callers treat that
/// as "state unavailable" and fall back.
fn run_git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Checks that `dir` is inside a non-bare working tree.
fn is_work_tree(dir: &Path) -> bool {
    run_git(dir, &["rev-parse", "--is-inside-work-tree"]).is_some_and(|out| out == "true")
}

/// Resolves the branch name for the snapshot.
///
/// Priority: detached HEAD, then the symbolic branch name, then the raw
/// `.git/HEAD` file (which still names the intended branch on an unborn
/// branch), then `"unknown"`.
fn resolve_branch(dir: &Path) -> String {
    let symbolic = run_git(dir, &["symbolic-ref", "--short", "-q", "HEAD"])
        .filter(|name| !name.is_empty());

    // HEAD resolves to a commit but not to a branch name: detached.
    if symbolic.is_none() && run_git(dir, &["rev-parse", "-q", "--verify", "HEAD"]).is_some() {
        return DETACHED_BRANCH.to_string();
    }

    if let Some(name) = symbolic {
        return name;
    }

    if let Some(name) = branch_from_head_file(dir) {
        return name;
    }

    UNKNOWN_BRANCH.to_string()
}

/// Recovers the intended branch name from the raw `HEAD` reference file.
fn branch_from_head_file(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(".git").join("HEAD")).ok()?;
    parse_head_ref(&content)
}

/// Parses a `ref: refs/heads/<name>` line into a branch name.
fn parse_head_ref(content: &str) -> Option<String> {
    let name = content.trim().strip_prefix("ref: refs/heads/")?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Reads the tip commit metadata; `None` on an unborn branch or any failure.
fn resolve_last_commit(dir: &Path) -> Option<CommitInfo> {
    // %x1f separates fields with the unit separator, which cannot appear in
    // the subject line or author name.
    let raw = run_git(dir, &["log", "-1", "--pretty=format:%H%x1f%s%x1f%an <%ae>%x1f%cI"])?;
    let mut fields = raw.split('\u{1f}');

    let sha = fields.next()?;
    let message = fields.next()?;
    let author = fields.next()?;
    let committed_at = DateTime::parse_from_rfc3339(fields.next()?.trim())
        .ok()?
        .with_timezone(&Utc);

    if sha.len() < SHA_PREFIX_LEN || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(CommitInfo {
        sha_prefix: sha[..SHA_PREFIX_LEN].to_string(),
        message: message.trim().to_string(),
        author: author.trim().to_string(),
        committed_at,
    })
}

/// Determines whether the working tree is dirty (untracked files included).
///
/// An inability to read status (e.g. corrupted index) defaults to `false`.
fn resolve_dirty(dir: &Path) -> bool {
    run_git(dir, &["status", "--porcelain"]).is_some_and(|out| !out.is_empty())
}

/// Reads the `origin` remote URL; absence of any remote is not an error.
fn resolve_remote_url(dir: &Path) -> Option<String> {
    run_git(dir, &["remote", "get-url", "origin"]).filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_head_ref() {
        assert_eq!(
            parse_head_ref("ref: refs/heads/main\n").as_deref(),
            Some("main")
        );
        assert_eq!(
            parse_head_ref("ref: refs/heads/feature/walker").as_deref(),
            Some("feature/walker")
        );
        assert_eq!(parse_head_ref("invalid content"), None);
        assert_eq!(parse_head_ref("ref: refs/tags/v1.0"), None);
        assert_eq!(parse_head_ref("ref: refs/heads/"), None);
        assert_eq!(parse_head_ref(""), None);
    }

    #[test]
    fn test_extract_state_non_repo() {
        let temp = TempDir::new().unwrap();
        assert_eq!(extract_state(temp.path()), None);
    }

    #[test]
    fn test_extract_state_missing_dir() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("nonexistent");
        assert_eq!(extract_state(&gone), None);
    }

    #[test]
    fn test_extract_state_malformed_head() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join(".git");
        fs::create_dir(&git_dir).unwrap();
        fs::write(git_dir.join("HEAD"), "invalid content").unwrap();

        // Must not panic or error, just yield no snapshot.
        assert_eq!(extract_state(temp.path()), None);
    }
}
