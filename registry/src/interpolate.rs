//! Progress-to-position interpolation along a path.

use fleetsim_core::{GeoPoint, InvalidPathError, Progress, MIN_ANIMATABLE_WAYPOINTS};

use crate::path::PathModel;

/// Resolves the coordinate at `progress` along `path`.
///
/// Progress measures the fraction of total route length rather than the
/// waypoint index, so speed along an irregular polyline stays spatially
/// uniform. The walk skips zero-length segments, and a path whose total
/// length is 0 resolves every progress to its first waypoint. Identical
/// input always yields identical output.
pub(crate) fn position_at(
    path: &PathModel,
    progress: Progress,
) -> Result<GeoPoint, InvalidPathError> {
    let waypoints = path.waypoints();
    let found = path.waypoint_count();
    if found < MIN_ANIMATABLE_WAYPOINTS {
        return Err(InvalidPathError { found });
    }

    let first = waypoints[0];
    let last = waypoints[waypoints.len() - 1];
    let total = path.total_meters();

    if progress.get() <= 0.0 || total <= 0.0 {
        return Ok(first);
    }
    if progress.get() >= 1.0 {
        return Ok(last);
    }

    let target = progress.get() * total;
    let cumulative = path.cumulative_meters();

    for segment in 0..waypoints.len() - 1 {
        let segment_start = cumulative[segment];
        let segment_end = cumulative[segment + 1];
        if target > segment_end {
            continue;
        }
        let length = segment_end - segment_start;
        if length <= 0.0 {
            continue;
        }
        let fraction = (target - segment_start) / length;
        return Ok(waypoints[segment].lerp(waypoints[segment + 1], fraction));
    }

    Ok(last)
}
