//! Canonical race distances and per-track record scanning

use crate::Track;
use crate::segment::best_time_ms;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the canonical distance catalog
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanonicalDistance {
    /// Display name of the race distance
    pub name: &'static str,
    /// Exact length in meters
    pub meters: f64,
}

/// The race distances tracked for personal records, ascending by length
pub const CANONICAL_DISTANCES: [CanonicalDistance; 5] = [
    CanonicalDistance {
        name: "1 km",
        meters: 1_000.0,
    },
    CanonicalDistance {
        name: "5 km",
        meters: 5_000.0,
    },
    CanonicalDistance {
        name: "10 km",
        meters: 10_000.0,
    },
    CanonicalDistance {
        name: "Half marathon",
        meters: 21_097.5,
    },
    CanonicalDistance {
        name: "Marathon",
        meters: 42_195.0,
    },
];

/// Best known time for one canonical distance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    /// Race distance in meters
    pub distance: f64,
    /// Record time in milliseconds
    pub time: i64,
    /// Track that set the record
    pub track_id: String,
    /// Display name of that track
    pub track_name: String,
    /// Time of the track's first point
    pub date: DateTime<Utc>,
}

/// A best time found in a single track, before any ledger comparison
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordCandidate {
    /// Race distance in meters
    pub distance_m: f64,
    /// Elapsed time in milliseconds
    pub time_ms: i64,
}

/// Scan one track against the canonical distance catalog.
///
/// Returns one candidate per distance the track covers, ascending by
/// distance. Distances the track is too short for are omitted entirely.
pub fn find_records_in_track(track: &Track) -> Vec<RecordCandidate> {
    let mut candidates = Vec::new();

    for entry in &CANONICAL_DISTANCES {
        let target_km = entry.meters / 1000.0;
        if track.total_distance_km() < target_km {
            continue;
        }
        if let Some(time_ms) = best_time_ms(track.points(), target_km) {
            candidates.push(RecordCandidate {
                distance_m: entry.meters,
                time_ms,
            });
        }
    }

    candidates
}
