//! Track Records - Personal Record Detection for GPS Running Tracks
//!
//! This library finds the fastest contiguous effort over each canonical race
//! distance in a GPS track and maintains the all-time best per distance in a
//! durable key-value slot supplied by the host.
//!
//! # Architecture
//!
//! - **[`Track`]**: Immutable storage for an ordered, timestamped point sequence
//! - **[`best_time_ms`]**: Sliding-window search for the fastest sub-path of a given length
//! - **[`find_records_in_track`]**: Fixed fan-out scan over the canonical distance catalog
//! - **[`RecordLedger`]**: All-time bests merged into an injected [`StorageBackend`]
//!
//! # Performance Characteristics
//!
//! - **Scan Time**: O(N) amortized per canonical distance (two monotone indices)
//! - **Fan-out**: At most five searches per track, independent of track size
//! - **Memory**: O(N) for the point sequence; summaries cached at construction
//!
//! The crate is synchronous throughout. Hosts that evaluate tracks off their
//! UI thread must serialize ledger updates themselves, since each update is a
//! read-merge-write cycle against shared storage.

mod ledger;
mod records;
mod segment;
mod storage;
mod track;

// Public API exports
pub use ledger::{DistanceOutcome, LedgerUpdate, RECORDS_STORAGE_KEY, RecordLedger, RecordMap};
pub use records::{
    CANONICAL_DISTANCES, CanonicalDistance, PersonalRecord, RecordCandidate,
    find_records_in_track,
};
pub use segment::best_time_ms;
pub use storage::{
    FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult, load_json, save_json,
};
pub use track::{Sample, Track, TrackPoint};

/// Error types for track construction
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Track has no points")]
    EmptyTrack,

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Box<dyn StorageBackend>) -> RecordLedger = RecordLedger::new;
        let _: fn() -> MemoryStorage = MemoryStorage::new;
        assert_eq!(CANONICAL_DISTANCES.len(), 5);
    }
}
