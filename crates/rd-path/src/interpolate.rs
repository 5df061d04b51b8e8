//! Position along a route for a normalised progress value.

use rd_core::Position;

use crate::Route;

/// Interpolated position and travel heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Position,
    /// Radians, 0 = north, increasing clockwise.  `None` when the route has
    /// no non-zero segment to take a direction from.
    pub heading:  Option<f64>,
}

/// Position at `progress` along `route`.
///
/// Shorthand for `sample(route, progress).position`.
#[inline]
pub fn position_at(route: &Route, progress: f64) -> Position {
    sample(route, progress).position
}

/// Position and heading at `progress` along `route`.
///
/// `progress` is clamped to `[0, 1]` (NaN is treated as 0).  Segment lengths
/// are planar in `(lng, lat)`.  The endpoints are returned exactly at 0
/// and 1; in between, the containing segment is located by cumulative length
/// and blended linearly.  Zero-length segments never contain a sample point.
pub fn sample(route: &Route, progress: f64) -> PathSample {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let points = route.points();

    if route.is_degenerate() {
        return PathSample { position: route.first(), heading: None };
    }
    if p == 0.0 {
        return PathSample { position: route.first(), heading: first_heading(points) };
    }
    if p == 1.0 {
        return PathSample { position: route.last(), heading: last_heading(points) };
    }

    let cumulative = route.cumulative();
    let target = p * route.total_length();

    // First index whose cumulative length reaches the target.  Since
    // 0 < target < total, `cumulative[idx - 1] < target <= cumulative[idx]`
    // so the segment has positive length.
    let idx = cumulative.partition_point(|&c| c < target).clamp(1, points.len() - 1);
    let (a, b) = (points[idx - 1], points[idx]);
    let seg_len = cumulative[idx] - cumulative[idx - 1];
    if seg_len <= 0.0 {
        return PathSample { position: b, heading: last_heading(&points[..=idx]) };
    }

    let t = (target - cumulative[idx - 1]) / seg_len;
    PathSample {
        position: a.lerp(b, t),
        heading:  a.heading_to(b),
    }
}

fn first_heading(points: &[Position]) -> Option<f64> {
    points.windows(2).find_map(|pair| pair[0].heading_to(pair[1]))
}

fn last_heading(points: &[Position]) -> Option<f64> {
    points.windows(2).rev().find_map(|pair| pair[0].heading_to(pair[1]))
}
