//! Project classification.
//!
//! A directory is a project when it carries one of a fixed, ordered table of
//! indicator files. The first matching indicator wins and determines the
//! project type. Every individual check is guarded: a failing existence or
//! glob check is treated as "absent" and evaluation proceeds with the
//! remaining indicators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of project a directory was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Python project (setup.py, pyproject.toml, ...).
    Python,
    /// JavaScript/Node project (package.json, lockfiles).
    Javascript,
    /// Ruby project (Gemfile, Rakefile).
    Ruby,
    /// Go project (go.mod, go.sum).
    Go,
    /// Java project (pom.xml, Gradle build files).
    Java,
    /// Rust project (Cargo.toml).
    Rust,
    /// C or C++ project (Makefile, CMakeLists.txt).
    #[serde(rename = "c/c++")]
    CCpp,
    /// .NET project (*.csproj, *.fsproj, *.sln).
    Dotnet,
    /// Recognized as a project without a more specific type (bare .git).
    Unknown,
}

impl ProjectType {
    /// String form used in output and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Java => "java",
            Self::Rust => "rust",
            Self::CCpp => "c/c++",
            Self::Dotnet => "dotnet",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single project indicator: an exact filename or a glob pattern.
enum Indicator {
    /// Exact file or directory name within the candidate directory.
    Name(&'static str),
    /// Glob pattern matched against the candidate directory's entries.
    Glob(&'static str),
}

/// Ordered indicator table; first match wins.
const INDICATORS: &[(Indicator, ProjectType)] = &[
    // Python
    (Indicator::Name("setup.py"), ProjectType::Python),
    (Indicator::Name("pyproject.toml"), ProjectType::Python),
    (Indicator::Name("requirements.txt"), ProjectType::Python),
    (Indicator::Name("Pipfile"), ProjectType::Python),
    // JavaScript/Node
    (Indicator::Name("package.json"), ProjectType::Javascript),
    (Indicator::Name("yarn.lock"), ProjectType::Javascript),
    (Indicator::Name("package-lock.json"), ProjectType::Javascript),
    // Ruby
    (Indicator::Name("Gemfile"), ProjectType::Ruby),
    (Indicator::Name("Rakefile"), ProjectType::Ruby),
    // Go
    (Indicator::Name("go.mod"), ProjectType::Go),
    (Indicator::Name("go.sum"), ProjectType::Go),
    // Java
    (Indicator::Name("pom.xml"), ProjectType::Java),
    (Indicator::Name("build.gradle"), ProjectType::Java),
    (Indicator::Name("build.gradle.kts"), ProjectType::Java),
    // Rust
    (Indicator::Name("Cargo.toml"), ProjectType::Rust),
    // C/C++
    (Indicator::Name("Makefile"), ProjectType::CCpp),
    (Indicator::Name("CMakeLists.txt"), ProjectType::CCpp),
    // .NET
    (Indicator::Glob("*.csproj"), ProjectType::Dotnet),
    (Indicator::Glob("*.fsproj"), ProjectType::Dotnet),
    (Indicator::Glob("*.sln"), ProjectType::Dotnet),
    // General
    (Indicator::Name(".git"), ProjectType::Unknown),
];

/// Classifies `dir`, returning its project type or `None` when no indicator
/// matches.
#[must_use]
pub fn classify(dir: &Path) -> Option<ProjectType> {
    for (indicator, project_type) in INDICATORS {
        if indicator_present(dir, indicator) {
            return Some(*project_type);
        }
    }
    None
}

/// Checks a single indicator; any failure counts as absent.
fn indicator_present(dir: &Path, indicator: &Indicator) -> bool {
    match indicator {
        Indicator::Name(name) => dir.join(name).exists(),
        Indicator::Glob(pattern) => glob_matches(dir, pattern),
    }
}

/// Returns whether any directory entry matches `pattern`.
///
/// Non-UTF-8 directory paths and per-entry errors are treated as no match.
fn glob_matches(dir: &Path, pattern: &str) -> bool {
    let Some(dir_str) = dir.to_str() else {
        return false;
    };
    let full_pattern = format!("{}/{pattern}", glob::Pattern::escape(dir_str));
    glob::glob(&full_pattern)
        .map(|entries| entries.filter_map(Result::ok).next().is_some())
        .unwrap_or(false)
}
