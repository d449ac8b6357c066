//! Velocity derivation.
//!
//! Velocity is a deliberately coarse proxy for project activity built on
//! snapshot cadence, not on actual commit history: the number of distinct
//! calendar dates with at least one snapshot inside a trailing window, and a
//! trend classification comparing the first and second halves of the
//! in-window snapshot sequence.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Second-half / first-half ratio above which the trend is increasing.
pub const TREND_GROWTH_RATIO: f64 = 1.2;

/// Second-half / first-half ratio below which the trend is decreasing.
pub const TREND_DECAY_RATIO: f64 = 0.8;

/// Activity trend over the velocity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Snapshot cadence picked up in the second half of the window.
    Increasing,
    /// Snapshot cadence dropped in the second half of the window.
    Decreasing,
    /// Cadence roughly even across the window.
    Stable,
    /// History exists but fewer than two snapshots fall inside the window.
    Stale,
    /// Not enough history to say anything (fewer than two snapshots total).
    Unknown,
}

impl Trend {
    /// String form used in output and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
            Self::Stale => "stale",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived activity metrics; computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityView {
    /// Distinct calendar dates with at least one snapshot in the window.
    pub active_days: u64,

    /// `active_days / window_days`; a cadence approximation, not a count of
    /// actual commits.
    pub commits_per_day: f64,

    /// Trend classification for the window.
    pub trend: Trend,
}

impl VelocityView {
    /// The zero view with the given trend tag.
    const fn none(trend: Trend) -> Self {
        Self {
            active_days: 0,
            commits_per_day: 0.0,
            trend,
        }
    }
}

/// Derives the velocity view from snapshot timestamps.
///
/// `timestamps` must be in append order (which is time order for an
/// append-only history). Entries older than `window_days` before `now` are
/// ignored.
#[must_use]
pub fn derive(timestamps: &[DateTime<Utc>], now: DateTime<Utc>, window_days: u32) -> VelocityView {
    if timestamps.len() < 2 {
        return VelocityView::none(Trend::Unknown);
    }

    let cutoff = now - Duration::days(i64::from(window_days));
    let recent: Vec<DateTime<Utc>> = timestamps
        .iter()
        .copied()
        .filter(|ts| *ts > cutoff)
        .collect();

    if recent.len() < 2 {
        return VelocityView::none(Trend::Stale);
    }

    let active_days = recent
        .iter()
        .map(DateTime::date_naive)
        .collect::<BTreeSet<_>>()
        .len() as u64;

    let commits_per_day = if window_days > 0 {
        round2(active_days as f64 / f64::from(window_days))
    } else {
        0.0
    };

    // Split at the midpoint index and compare entry counts of both halves.
    let midpoint = recent.len() / 2;
    let first_half = midpoint as f64;
    let second_half = (recent.len() - midpoint) as f64;

    let trend = if second_half > first_half * TREND_GROWTH_RATIO {
        Trend::Increasing
    } else if second_half < first_half * TREND_DECAY_RATIO {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    VelocityView {
        active_days,
        commits_per_day,
        trend,
    }
}

/// Rounds to two decimal places for display-stable values.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
