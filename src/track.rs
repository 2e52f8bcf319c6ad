//! Track storage module
//!
//! This module provides the `Track` struct for storing an ordered GPS point
//! sequence with cumulative distances and summary statistics computed once
//! during construction.

use crate::{Result, TrackError};
use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One raw GPS sample as produced by a file-parsing collaborator
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Sample {
    /// Position with x = longitude and y = latitude, in degrees
    pub point: Point<f64>,
    /// Elevation in meters, already smoothed upstream
    pub elevation: f64,
    /// Absolute sample time
    pub time: DateTime<Utc>,
    /// Heart rate in bpm, when the recording device provided one
    pub heart_rate: Option<u16>,
}

/// One track point: a kept sample plus its running distance from the start
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Position with x = longitude and y = latitude, in degrees
    pub point: Point<f64>,
    /// Elevation in meters
    pub elevation: f64,
    /// Absolute sample time
    pub time: DateTime<Utc>,
    /// Heart rate in bpm, if recorded
    pub heart_rate: Option<u16>,
    /// Great-circle distance from the track's first point, in kilometers.
    /// Non-decreasing along the sequence; set once during construction.
    pub cumulative_km: f64,
}

impl TrackPoint {
    /// Sample time as epoch milliseconds
    #[inline]
    pub fn time_ms(&self) -> i64 {
        self.time.timestamp_millis()
    }
}

/// Represents a single recorded activity with raw points and precomputed metadata
#[derive(Clone, Debug)]
pub struct Track {
    /// Stable identity of the activity
    id: String,
    /// Display name of the activity
    name: String,
    /// Points sorted ascending by time, with cumulative distances
    points: Vec<TrackPoint>,
    /// Cached total distance in kilometers (computed once during construction)
    cached_total_distance_km: f64,
    /// Cached elapsed time in milliseconds (computed once during construction)
    cached_duration_ms: i64,
    /// Cached total ascent in meters (computed once during construction)
    cached_total_ascent_m: f64,
    /// Cached average heart rate over samples that carried one
    cached_avg_heart_rate: Option<f64>,
}

impl Track {
    /// Create a new Track from raw samples
    ///
    /// Samples are sorted ascending by time before any distance computation.
    /// Samples with coordinates outside WGS84 bounds are skipped with a
    /// warning.
    ///
    /// # Returns
    /// An `Arc<Track>` on success, or an error if no valid samples remain
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mut samples: Vec<Sample>,
    ) -> Result<Arc<Self>> {
        if samples.is_empty() {
            return Err(TrackError::EmptyTrack);
        }

        samples.sort_by_key(|s| s.time);

        let mut points: Vec<TrackPoint> = Vec::with_capacity(samples.len());
        let mut cumulative_km: f64 = 0.0;
        let mut total_ascent_m: f64 = 0.0;
        let mut hr_sum: u64 = 0;
        let mut hr_count: u64 = 0;

        for sample in samples {
            if !is_valid_wgs84(&sample.point) {
                tracing::warn!(
                    "Skipping point outside WGS84 bounds: ({}, {})",
                    sample.point.y(),
                    sample.point.x()
                );
                continue;
            }

            if let Some(prev) = points.last() {
                cumulative_km += haversine_distance_km(&prev.point, &sample.point);
                let climb = sample.elevation - prev.elevation;
                if climb > 0.0 {
                    total_ascent_m += climb;
                }
            }
            if let Some(hr) = sample.heart_rate {
                hr_sum += u64::from(hr);
                hr_count += 1;
            }

            points.push(TrackPoint {
                point: sample.point,
                elevation: sample.elevation,
                time: sample.time,
                heart_rate: sample.heart_rate,
                cumulative_km,
            });
        }

        if points.is_empty() {
            return Err(TrackError::InvalidGeometry(
                "No valid points in track".to_string(),
            ));
        }

        let cached_duration_ms = points[points.len() - 1].time_ms() - points[0].time_ms();
        let cached_avg_heart_rate = (hr_count > 0).then(|| hr_sum as f64 / hr_count as f64);

        Ok(Arc::new(Track {
            id: id.into(),
            name: name.into(),
            points,
            cached_total_distance_km: cumulative_km,
            cached_duration_ms,
            cached_total_ascent_m: total_ascent_m,
            cached_avg_heart_rate,
        }))
    }

    /// Stable identity of the activity
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the activity
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The point sequence, sorted ascending by time
    #[inline]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Total distance in kilometers
    ///
    /// This is O(1) as the value is cached during construction.
    #[inline]
    pub fn total_distance_km(&self) -> f64 {
        self.cached_total_distance_km
    }

    /// Elapsed time between the first and last point in milliseconds
    ///
    /// This is O(1) as the value is cached during construction.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.cached_duration_ms
    }

    /// Sum of positive elevation changes in meters
    ///
    /// This is O(1) as the value is cached during construction.
    #[inline]
    pub fn total_ascent_m(&self) -> f64 {
        self.cached_total_ascent_m
    }

    /// Mean heart rate over samples that carried one, if any did
    #[inline]
    pub fn average_heart_rate(&self) -> Option<f64> {
        self.cached_avg_heart_rate
    }

    /// Time of the first point
    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.points[0].time
    }
}

/// Check that a point holds plausible WGS84 degrees
#[inline]
fn is_valid_wgs84(point: &Point<f64>) -> bool {
    point.x().is_finite()
        && point.y().is_finite()
        && point.y().abs() <= 90.0
        && point.x().abs() <= 180.0
}

/// Calculate the Haversine distance between two points in kilometers
#[inline]
fn haversine_distance_km(p1: &Point<f64>, p2: &Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lat = (p2.y() - p1.y()).to_radians();
    let delta_lon = (p2.x() - p1.x()).to_radians();

    let a =
        (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    // Earth's radius in kilometers
    const EARTH_RADIUS_KM: f64 = 6371.0;
    EARTH_RADIUS_KM * c
}
