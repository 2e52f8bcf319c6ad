//! Best-segment search over a track's point sequence
//!
//! Finds the minimum elapsed time over any contiguous sub-path of a given
//! length, interpolating within the sample interval where the window first
//! covers the exact target distance.

use crate::TrackPoint;

/// Sample intervals shorter than this (in km) are duplicate-position
/// readings and are not interpolated into.
const MIN_SEGMENT_KM: f64 = 1e-6;

/// Find the fastest time over any contiguous `target_km` stretch of `points`.
///
/// Returns the elapsed time in milliseconds, or `None` when the sequence has
/// fewer than two points or does not cover `target_km` at all. Absence is a
/// normal result, not a failure.
///
/// The window end index only ever moves forward across the whole scan, so the
/// search is O(n) amortized regardless of how many start points are examined.
pub fn best_time_ms(points: &[TrackPoint], target_km: f64) -> Option<i64> {
    if points.len() < 2 || target_km <= 0.0 {
        return None;
    }
    let total_km = points[points.len() - 1].cumulative_km - points[0].cumulative_km;
    if total_km < target_km {
        return None;
    }

    let mut best_ms: Option<i64> = None;
    let mut end = 0;

    for start in 0..points.len() {
        let target_cum = points[start].cumulative_km + target_km;
        while end < points.len() && points[end].cumulative_km < target_cum {
            end += 1;
        }
        if end == points.len() {
            // Later starts need even more distance; nothing further can match.
            break;
        }

        let window_km = points[end].cumulative_km - points[start].cumulative_km;
        let segment_km = points[end].cumulative_km - points[end - 1].cumulative_km;
        let end_ms = if segment_km < MIN_SEGMENT_KM {
            points[end].time_ms()
        } else {
            // The window was just formed, so overshoot <= segment_km and the
            // ratio stays within [0, 1].
            let overshoot = window_km - target_km;
            let ratio = (segment_km - overshoot) / segment_km;
            let segment_ms = points[end].time_ms() - points[end - 1].time_ms();
            points[end - 1].time_ms() + (segment_ms as f64 * ratio).round() as i64
        };

        let elapsed = end_ms - points[start].time_ms();
        if best_ms.is_none_or(|best| elapsed < best) {
            best_ms = Some(elapsed);
        }
    }

    best_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use geo::Point;

    fn point_at(cumulative_km: f64, time_ms: i64) -> TrackPoint {
        TrackPoint {
            point: Point::new(-0.1278, 51.5074),
            elevation: 0.0,
            time: DateTime::from_timestamp_millis(time_ms).unwrap(),
            heart_rate: None,
            cumulative_km,
        }
    }

    /// Points at one kilometer intervals, `pace_ms` milliseconds apart
    fn constant_pace_points(count: usize, pace_ms: i64) -> Vec<TrackPoint> {
        (0..count)
            .map(|i| point_at(i as f64, i as i64 * pace_ms))
            .collect()
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(best_time_ms(&[], 1.0), None);
        assert_eq!(best_time_ms(&[point_at(0.0, 0)], 1.0), None);
    }

    #[test]
    fn test_track_shorter_than_target() {
        let points = constant_pace_points(3, 360_000);
        assert_eq!(best_time_ms(&points, 5.0), None);
    }

    #[test]
    fn test_non_positive_target() {
        let points = constant_pace_points(3, 360_000);
        assert_eq!(best_time_ms(&points, 0.0), None);
        assert_eq!(best_time_ms(&points, -1.0), None);
    }

    #[test]
    fn test_exact_point_boundary() {
        let points = constant_pace_points(3, 360_000);
        assert_eq!(best_time_ms(&points, 1.0), Some(360_000));
        assert_eq!(best_time_ms(&points, 2.0), Some(720_000));
    }

    #[test]
    fn test_interpolated_boundary() {
        // 6 min/km constant pace; 1.5 km crosses halfway into the second
        // kilometer, so the time is interpolated to 9 minutes.
        let points = constant_pace_points(3, 360_000);
        assert_eq!(best_time_ms(&points, 1.5), Some(540_000));
    }

    #[test]
    fn test_constant_speed_exactness() {
        // 4 min/km over 10 km; any target d must come out as d * pace.
        let points = constant_pace_points(11, 240_000);
        for target in [1.0_f64, 2.5, 5.0, 7.75, 10.0] {
            let expected = (target * 240_000.0).round() as i64;
            assert_eq!(best_time_ms(&points, target), Some(expected));
        }
    }

    #[test]
    fn test_picks_fastest_window() {
        // Middle kilometer is covered twice as fast as the others.
        let points = vec![
            point_at(0.0, 0),
            point_at(1.0, 300_000),
            point_at(2.0, 500_000),
            point_at(3.0, 800_000),
        ];
        assert_eq!(best_time_ms(&points, 1.0), Some(200_000));
    }

    #[test]
    fn test_degenerate_duplicate_sample() {
        // The target lands inside a near-zero-length segment; the end sample's
        // time is used as-is instead of dividing by the tiny span.
        let points = vec![
            point_at(0.0, 0),
            point_at(1.0 - 2e-7, 500_000),
            point_at(1.0 + 2e-7, 600_000),
        ];
        assert_eq!(best_time_ms(&points, 1.0), Some(600_000));
    }

    #[test]
    fn test_uneven_sampling() {
        // Sparse then dense sampling; the best kilometer starts at the
        // second point and ends interpolated between the last two.
        let points = vec![
            point_at(0.0, 0),
            point_at(0.4, 200_000),
            point_at(1.2, 440_000),
            point_at(1.6, 560_000),
        ];
        // From 0.4 km: crossing 1.4 km is halfway into the final segment,
        // at 440_000 + 60_000 ms; elapsed is 300_000 ms.
        assert_eq!(best_time_ms(&points, 1.0), Some(300_000));
    }

    #[test]
    fn test_result_independent_of_trailing_points() {
        let mut points = constant_pace_points(6, 240_000);
        let base = best_time_ms(&points, 5.0);
        points.push(point_at(6.0, 6 * 240_000 + 100_000));
        assert_eq!(best_time_ms(&points, 5.0), base);
    }
}
