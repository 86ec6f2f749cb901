//! Polygon and polyline predicates.
//!
//! Each predicate walks a fixed ladder of special cases (poles, then
//! hemisphere shortcuts, then the general trigonometric comparison). Later
//! rungs rely on the earlier ones having been ruled out, so the order of the
//! checks is significant.

use crate::math::{
    clamp, hav, hav_distance, hav_from_sin, inverse_mercator, mercator, sin_from_hav,
    sin_sum_from_hav, wrap,
};
use crate::{Closure, GeoError, LatLng, Result, SegmentKind, Sphere};
use std::f64::consts::{FRAC_PI_2, PI};

/// Default tolerance of the proximity predicates, in meters.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Offset applied to the last vertex of a closed polygon before simplifying,
/// so the first and last vertices are distinct segment endpoints.
const CLOSED_POLYGON_NUDGE: f64 = 1e-11;

/// Edges with a smaller haversine span less than ~119 degrees, so a point
/// that passed the cross-track and endpoint checks cannot lie past a half circle.
const SHORT_EDGE_HAV: f64 = 0.74;

/// Computes whether `point` lies inside `polygon`.
///
/// The polygon is always considered closed, whether or not the last point
/// repeats the first. Inside is the region that does not contain the South
/// Pole; the South Pole itself is always outside. A point equal to a vertex
/// is inside.
///
/// # Example
/// ```
/// use orbis_geo::{contains_location, LatLng, SegmentKind};
///
/// let square = [
///     LatLng::new(0.0, 0.0),
///     LatLng::new(0.0, 10.0),
///     LatLng::new(10.0, 10.0),
///     LatLng::new(10.0, 0.0),
/// ];
/// assert!(contains_location(&LatLng::new(5.0, 5.0), &square, SegmentKind::Geodesic));
/// assert!(!contains_location(&LatLng::new(20.0, 5.0), &square, SegmentKind::Geodesic));
/// ```
pub fn contains_location(point: &LatLng, polygon: &[LatLng], kind: SegmentKind) -> bool {
    let Some(last) = polygon.last() else {
        return false;
    };
    let (lat3, lng3) = point.to_radians();
    let (mut lat1, mut lng1) = last.to_radians();

    let mut intersections = 0usize;
    for vertex in polygon {
        let d_lng3 = wrap(lng3 - lng1, -PI, PI);
        if lat3 == lat1 && d_lng3 == 0.0 {
            return true;
        }
        let (lat2, lng2) = vertex.to_radians();
        // Longitudes are offset by -lng1.
        if intersects(lat1, lat2, wrap(lng2 - lng1, -PI, PI), lat3, d_lng3, kind) {
            intersections += 1;
        }
        lat1 = lat2;
        lng1 = lng2;
    }
    intersections % 2 == 1
}

/// Whether the meridian arc from `(lat3, lng3)` down to the South Pole crosses
/// the segment `(lat1, 0)` to `(lat2, lng2)`.
fn intersects(lat1: f64, lat2: f64, lng2: f64, lat3: f64, lng3: f64, kind: SegmentKind) -> bool {
    // Both ends on the same side of lng3.
    if (lng3 >= 0.0 && lng3 >= lng2) || (lng3 < 0.0 && lng3 < lng2) {
        return false;
    }
    // Point is the South Pole.
    if lat3 <= -FRAC_PI_2 {
        return false;
    }
    // Any segment end is a pole.
    if lat1 <= -FRAC_PI_2 || lat2 <= -FRAC_PI_2 || lat1 >= FRAC_PI_2 || lat2 >= FRAC_PI_2 {
        return false;
    }
    if lng2 <= -PI {
        return false;
    }
    let linear_lat = (lat1 * (lng2 - lng3) + lat2 * lng3) / lng2;
    // Northern hemisphere and point under the lat-lng line.
    if lat1 >= 0.0 && lat2 >= 0.0 && lat3 < linear_lat {
        return false;
    }
    // Southern hemisphere and point above the lat-lng line.
    if lat1 <= 0.0 && lat2 <= 0.0 && lat3 >= linear_lat {
        return true;
    }
    // North Pole.
    if lat3 >= FRAC_PI_2 {
        return true;
    }
    // tan and mercator are strictly increasing, so compare through them.
    match kind {
        SegmentKind::Geodesic => lat3.tan() >= tan_lat_gc(lat1, lat2, lng2, lng3),
        SegmentKind::Rhumb => mercator(lat3) >= mercator_lat_rhumb(lat1, lat2, lng2, lng3),
    }
}

/// tan(latitude at `lng3`) on the great circle from `(lat1, 0)` to `(lat2, lng2)`.
fn tan_lat_gc(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (lat1.tan() * (lng2 - lng3).sin() + lat2.tan() * lng3.sin()) / lng2.sin()
}

/// mercator(latitude at `lng3`) on the rhumb line from `(lat1, 0)` to `(lat2, lng2)`.
fn mercator_lat_rhumb(lat1: f64, lat2: f64, lng2: f64, lng3: f64) -> f64 {
    (mercator(lat1) * (lng2 - lng3) + mercator(lat2) * lng3) / lng2
}

/// Returns true if `polygon` repeats its first point at the end.
pub fn is_closed_polygon(polygon: &[LatLng]) -> bool {
    match (polygon.first(), polygon.last()) {
        (Some(first), Some(last)) => polygon.len() > 1 && first == last,
        _ => false,
    }
}

impl Sphere {
    /// Whether `point` lies on or within `tolerance` meters of the edge of
    /// `polygon`, including the closing segment from the last point to the first.
    #[inline]
    pub fn is_location_on_edge(
        &self,
        point: &LatLng,
        polygon: &[LatLng],
        tolerance: f64,
        kind: SegmentKind,
    ) -> bool {
        self.location_index_on_edge(point, polygon, tolerance, kind).is_some()
    }

    /// Whether `point` lies on or within `tolerance` meters of `polyline`.
    /// The closing segment is not included.
    #[inline]
    pub fn is_location_on_path(
        &self,
        point: &LatLng,
        polyline: &[LatLng],
        tolerance: f64,
        kind: SegmentKind,
    ) -> bool {
        self.location_index_on_path(point, polyline, tolerance, kind).is_some()
    }

    /// Index of the first polygon edge within `tolerance` meters of `point`.
    ///
    /// Edge `i` runs from vertex `i` to vertex `i + 1`; the closing edge has
    /// index `len - 1`.
    #[inline]
    pub fn location_index_on_edge(
        &self,
        point: &LatLng,
        polygon: &[LatLng],
        tolerance: f64,
        kind: SegmentKind,
    ) -> Option<usize> {
        self.location_index_on_edge_or_path(point, polygon, Closure::Closed, tolerance, kind)
    }

    /// Index of the first polyline segment within `tolerance` meters of `point`.
    ///
    /// Segment `i` runs from vertex `i` to vertex `i + 1`.
    #[inline]
    pub fn location_index_on_path(
        &self,
        point: &LatLng,
        polyline: &[LatLng],
        tolerance: f64,
        kind: SegmentKind,
    ) -> Option<usize> {
        self.location_index_on_edge_or_path(point, polyline, Closure::Open, tolerance, kind)
    }

    /// Shared routine behind the edge and path predicates.
    ///
    /// A negative tolerance is treated as zero. A single-vertex path has one
    /// degenerate segment at index 0.
    pub fn location_index_on_edge_or_path(
        &self,
        point: &LatLng,
        poly: &[LatLng],
        closure: Closure,
        tolerance: f64,
        kind: SegmentKind,
    ) -> Option<usize> {
        if poly.is_empty() {
            return None;
        }
        let tolerance = self.to_angle(tolerance.max(0.0));
        let hav_tolerance = hav(tolerance);
        let (lat3, lng3) = point.to_radians();

        segments(poly, closure).find_map(|(index, start, end)| {
            let (lat1, lng1) = start.to_radians();
            let (lat2, lng2) = end.to_radians();
            let on_segment = match kind {
                SegmentKind::Geodesic => {
                    is_on_segment_gc(lat1, lng1, lat2, lng2, lat3, lng3, hav_tolerance)
                }
                SegmentKind::Rhumb => is_on_segment_rhumb(
                    lat1,
                    lng1,
                    lat2,
                    lng2,
                    lat3,
                    lng3,
                    tolerance,
                    hav_tolerance,
                ),
            };
            on_segment.then_some(index)
        })
    }

    /// Distance in meters from `p` to the segment from `start` to `end`.
    ///
    /// The projection onto the segment is computed linearly in latitude /
    /// longitude space, not on the sphere, so the result is approximate for
    /// long segments. Only the final distance is great-circle.
    pub fn distance_to_line(&self, p: &LatLng, start: &LatLng, end: &LatLng) -> f64 {
        if start == end {
            return self.distance_between(end, p);
        }

        let (s0_lat, s0_lng) = p.to_radians();
        let (s1_lat, s1_lng) = start.to_radians();
        let (s2_lat, s2_lng) = end.to_radians();

        let s2s1_lat = s2_lat - s1_lat;
        let s2s1_lng = s2_lng - s1_lng;
        let u = ((s0_lat - s1_lat) * s2s1_lat + (s0_lng - s1_lng) * s2s1_lng)
            / (s2s1_lat * s2s1_lat + s2s1_lng * s2s1_lng);
        if u <= 0.0 {
            return self.distance_between(p, start);
        }
        if u >= 1.0 {
            return self.distance_between(p, end);
        }
        let su = LatLng::new(
            start.lat + u * (end.lat - start.lat),
            start.lng + u * (end.lng - start.lng),
        );
        self.distance_between(p, &su)
    }

    /// Simplifies a path with the Douglas-Peucker algorithm.
    ///
    /// Vertices closer than `tolerance` meters (per [`Sphere::distance_to_line`])
    /// to the simplified line are dropped. The first and last vertices are
    /// always kept, and a closed polygon stays closed.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidTolerance`] unless `tolerance` is positive and finite.
    pub fn simplify(&self, path: &[LatLng], tolerance: f64) -> Result<Vec<LatLng>> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(GeoError::InvalidTolerance(tolerance));
        }
        let n = path.len();
        if n < 3 {
            return Ok(path.to_vec());
        }

        let mut working = path.to_vec();
        if is_closed_polygon(path) {
            let last = &mut working[n - 1];
            *last = LatLng::new(last.lat + CLOSED_POLYGON_NUDGE, last.lng + CLOSED_POLYGON_NUDGE);
        }

        let mut keep = vec![false; n];
        keep[0] = true;
        keep[n - 1] = true;

        let mut stack = vec![(0usize, n - 1)];
        while let Some((first, last)) = stack.pop() {
            let mut max_dist = 0.0;
            let mut max_idx = first;
            for idx in first + 1..last {
                let dist = self.distance_to_line(&working[idx], &working[first], &working[last]);
                if dist > max_dist {
                    max_dist = dist;
                    max_idx = idx;
                }
            }
            if max_dist > tolerance {
                keep[max_idx] = true;
                stack.push((first, max_idx));
                stack.push((max_idx, last));
            }
        }

        tracing::trace!(
            input = n,
            kept = keep.iter().filter(|k| **k).count(),
            "Path simplified"
        );

        // Points are taken from the input, which restores a nudged closing vertex.
        Ok(path
            .iter()
            .zip(keep)
            .filter_map(|(point, kept)| kept.then_some(*point))
            .collect())
    }
}

/// Yields `(index, start, end)` for every segment of `poly`.
///
/// `poly` must not be empty.
fn segments(
    poly: &[LatLng],
    closure: Closure,
) -> impl Iterator<Item = (usize, LatLng, LatLng)> + '_ {
    let n = poly.len();
    let count = match closure {
        Closure::Closed => n,
        Closure::Open => n.saturating_sub(1).max(1),
    };
    (0..count).map(move |i| (i, poly[i], poly[(i + 1) % n]))
}

/// Returns sin(initial bearing from 1 to 3 minus initial bearing from 1 to 2).
fn sin_delta_bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64, lat3: f64, lng3: f64) -> f64 {
    let sin_lat1 = lat1.sin();
    let cos_lat2 = lat2.cos();
    let cos_lat3 = lat3.cos();
    let lat31 = lat3 - lat1;
    let lng31 = lng3 - lng1;
    let lat21 = lat2 - lat1;
    let lng21 = lng2 - lng1;
    let a = lng31.sin() * cos_lat3;
    let c = lng21.sin() * cos_lat2;
    let b = lat31.sin() + 2.0 * sin_lat1 * cos_lat3 * hav(lng31);
    let d = lat21.sin() + 2.0 * sin_lat1 * cos_lat2 * hav(lng21);
    let denom = (a * a + b * b) * (c * c + d * d);
    if denom <= 0.0 {
        1.0
    } else {
        (a * d - b * c) / denom.sqrt()
    }
}

fn is_on_segment_gc(
    lat1: f64,
    lng1: f64,
    lat2: f64,
    lng2: f64,
    lat3: f64,
    lng3: f64,
    hav_tolerance: f64,
) -> bool {
    let hav_dist13 = hav_distance(lat1, lat3, lng1 - lng3);
    if hav_dist13 <= hav_tolerance {
        return true;
    }
    let hav_dist23 = hav_distance(lat2, lat3, lng2 - lng3);
    if hav_dist23 <= hav_tolerance {
        return true;
    }
    let sin_bearing = sin_delta_bearing(lat1, lng1, lat2, lng2, lat3, lng3);
    let sin_dist13 = sin_from_hav(hav_dist13);
    let hav_cross_track = hav_from_sin(sin_dist13 * sin_bearing);
    if hav_cross_track > hav_tolerance {
        return false;
    }
    let hav_dist12 = hav_distance(lat1, lat2, lng1 - lng2);
    let term = hav_dist12 + hav_cross_track * (1.0 - 2.0 * hav_dist12);
    if hav_dist13 > term || hav_dist23 > term {
        return false;
    }
    if hav_dist12 < SHORT_EDGE_HAV {
        return true;
    }
    let cos_cross_track = 1.0 - 2.0 * hav_cross_track;
    let hav_along_track13 = (hav_dist13 - hav_cross_track) / cos_cross_track;
    let hav_along_track23 = (hav_dist23 - hav_cross_track) / cos_cross_track;
    // Along-track sum beyond a half circle shows up as a negative sine.
    sin_sum_from_hav(hav_along_track13, hav_along_track23) > 0.0
}

/// Rhumb segments are straight in Mercator space: find the closest projected
/// point and measure the great-circle distance to it. "Closest" in Mercator
/// space is not closest on the sphere, but the error is small because the
/// tolerance is small.
#[allow(clippy::too_many_arguments)]
fn is_on_segment_rhumb(
    lat1: f64,
    lng1: f64,
    lat2: f64,
    lng2: f64,
    lat3: f64,
    lng3: f64,
    tolerance: f64,
    hav_tolerance: f64,
) -> bool {
    if lat1.max(lat2) < lat3 - tolerance || lat1.min(lat2) > lat3 + tolerance {
        return false;
    }
    // Endpoints are tested directly: the Mercator round trip is not exact.
    if hav_distance(lat1, lat3, lng1 - lng3) <= hav_tolerance
        || hav_distance(lat2, lat3, lng2 - lng3) <= hav_tolerance
    {
        return true;
    }
    let y1 = mercator(lat1);
    let y2 = mercator(lat2);
    let y3 = mercator(lat3);
    // Offset longitudes by -lng1; the implicit x1 is 0.
    let x2 = wrap(lng2 - lng1, -PI, PI);
    let x3_base = wrap(lng3 - lng1, -PI, PI);
    let dy = y2 - y1;
    let len2 = x2 * x2 + dy * dy;

    // Also try x3 wrapped around the world in both directions.
    [x3_base, x3_base + 2.0 * PI, x3_base - 2.0 * PI]
        .into_iter()
        .any(|x3| {
            let t = if len2 <= 0.0 {
                0.0
            } else {
                clamp((x3 * x2 + (y3 - y1) * dy) / len2, 0.0, 1.0)
            };
            let x_closest = t * x2;
            let y_closest = y1 + t * dy;
            let lat_closest = inverse_mercator(y_closest);
            hav_distance(lat3, lat_closest, x3 - x_closest) <= hav_tolerance
        })
}

/// Whether `point` is within `tolerance` meters of the edge of `polygon` on the Earth.
pub fn is_location_on_edge(
    point: &LatLng,
    polygon: &[LatLng],
    tolerance: f64,
    kind: SegmentKind,
) -> bool {
    Sphere::EARTH.is_location_on_edge(point, polygon, tolerance, kind)
}

/// Whether `point` is within `tolerance` meters of `polyline` on the Earth.
pub fn is_location_on_path(
    point: &LatLng,
    polyline: &[LatLng],
    tolerance: f64,
    kind: SegmentKind,
) -> bool {
    Sphere::EARTH.is_location_on_path(point, polyline, tolerance, kind)
}

/// See [`Sphere::location_index_on_edge`]; uses the Earth.
pub fn location_index_on_edge(
    point: &LatLng,
    polygon: &[LatLng],
    tolerance: f64,
    kind: SegmentKind,
) -> Option<usize> {
    Sphere::EARTH.location_index_on_edge(point, polygon, tolerance, kind)
}

/// See [`Sphere::location_index_on_path`]; uses the Earth.
pub fn location_index_on_path(
    point: &LatLng,
    polyline: &[LatLng],
    tolerance: f64,
    kind: SegmentKind,
) -> Option<usize> {
    Sphere::EARTH.location_index_on_path(point, polyline, tolerance, kind)
}

/// Distance in meters from `p` to the segment from `start` to `end` on the Earth.
pub fn distance_to_line(p: &LatLng, start: &LatLng, end: &LatLng) -> f64 {
    Sphere::EARTH.distance_to_line(p, start, end)
}

/// Douglas-Peucker simplification on the Earth; see [`Sphere::simplify`].
pub fn simplify(path: &[LatLng], tolerance: f64) -> Result<Vec<LatLng>> {
    Sphere::EARTH.simplify(path, tolerance)
}
