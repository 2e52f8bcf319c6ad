//! Record ledger: all-time bests merged into durable storage
//!
//! The ledger loads the persisted record mapping at the start of each
//! evaluation, merges a track's candidates into it in memory, and writes the
//! whole mapping back in one go only when at least one distance improved.
//! Storage faults never escape: a failed read behaves like an empty ledger
//! and a failed write leaves the in-memory result intact, both logged as
//! warnings.

use crate::records::{PersonalRecord, RecordCandidate, find_records_in_track};
use crate::storage::{StorageBackend, load_json, save_json};
use crate::track::Track;
use std::collections::HashMap;

/// Storage slot holding the persisted record mapping
pub const RECORDS_STORAGE_KEY: &str = "personal-records";

/// The persisted shape: distance in meters, rendered as a string, to record
pub type RecordMap = HashMap<String, PersonalRecord>;

/// Outcome of comparing one candidate against the stored best
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceOutcome {
    /// This track's record for the distance. Built from the current track
    /// even when it did not beat the stored best.
    pub record: PersonalRecord,
    /// Whether this track set a new all-time best
    pub is_new_best: bool,
    /// The stored time before this update, if any. For a beaten record this
    /// is the old best; otherwise it is the still-standing (better or equal)
    /// stored time.
    pub previous_best_ms: Option<i64>,
}

/// Result of merging one track into the ledger
#[derive(Clone, Debug)]
pub struct LedgerUpdate {
    /// One outcome per found candidate, in candidate order (the scanner
    /// produces candidates ascending by distance)
    pub outcomes: Vec<DistanceOutcome>,
    /// How many distances were newly bested
    pub improved_count: usize,
}

impl LedgerUpdate {
    /// Look up the outcome for a distance in meters
    pub fn outcome_for(&self, distance_m: f64) -> Option<&DistanceOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.record.distance == distance_m)
    }
}

/// All-time best records over an injected storage backend.
///
/// Updates are read-merge-write cycles against a single storage slot, so
/// concurrent evaluations must be serialized by the caller.
pub struct RecordLedger {
    backend: Box<dyn StorageBackend>,
}

impl RecordLedger {
    /// Create a ledger over the given storage backend
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Scan a track for canonical-distance times and merge them in.
    pub fn evaluate(&self, track: &Track) -> LedgerUpdate {
        let found = find_records_in_track(track);
        self.update_records(track, &found)
    }

    /// Merge already-found candidates for `track` into the stored records.
    ///
    /// A candidate beats the stored record only when its time is strictly
    /// smaller; a tie keeps the stored record, so the date and track of the
    /// run that first achieved the time stand. The updated mapping is
    /// persisted as a single write, and only when something improved.
    pub fn update_records(&self, track: &Track, found: &[RecordCandidate]) -> LedgerUpdate {
        let mut stored = self.load();
        let mut outcomes = Vec::with_capacity(found.len());
        let mut improved_count = 0;

        for candidate in found {
            let key = distance_key(candidate.distance_m);
            let previous = stored.get(&key).map(|r| r.time);
            let record = PersonalRecord {
                distance: candidate.distance_m,
                time: candidate.time_ms,
                track_id: track.id().to_string(),
                track_name: track.name().to_string(),
                date: track.started_at(),
            };

            let is_new_best = previous.is_none_or(|prev| candidate.time_ms < prev);
            if is_new_best {
                stored.insert(key, record.clone());
                improved_count += 1;
            }
            outcomes.push(DistanceOutcome {
                record,
                is_new_best,
                previous_best_ms: previous,
            });
        }

        if improved_count > 0
            && let Err(err) = save_json(self.backend.as_ref(), RECORDS_STORAGE_KEY, &stored)
        {
            tracing::warn!("Failed to persist record update: {}", err);
        }

        LedgerUpdate {
            outcomes,
            improved_count,
        }
    }

    /// The stored all-time bests, for direct display.
    ///
    /// A read fault degrades to an empty map, same as during an update.
    pub fn current_records(&self) -> RecordMap {
        self.load()
    }

    /// Drop all stored records.
    pub fn clear_records(&self) {
        if let Err(err) = self.backend.remove(RECORDS_STORAGE_KEY) {
            tracing::warn!("Failed to clear stored records: {}", err);
        }
    }

    fn load(&self) -> RecordMap {
        match load_json(self.backend.as_ref(), RECORDS_STORAGE_KEY) {
            Ok(Some(map)) => map,
            Ok(None) => RecordMap::new(),
            Err(err) => {
                tracing::warn!("Failed to read stored records, starting empty: {}", err);
                RecordMap::new()
            }
        }
    }
}

/// Key for one distance in the persisted mapping ("1000", "21097.5")
fn distance_key(meters: f64) -> String {
    format!("{}", meters)
}
