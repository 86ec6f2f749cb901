//! Operations between points on a sphere.
//!
//! Headings are degrees clockwise from north in `[-180, 180)`. Distances are
//! meters on the [`Sphere`] the method is called on; the free functions use
//! [`Sphere::EARTH`].

use crate::math::{arc_hav, hav_distance, wrap};
use crate::{LatLng, Sphere};
use std::f64::consts::FRAC_PI_2;

/// Below this `sin(angle)` two points are treated as coincident by [`interpolate`].
const SLERP_EPSILON: f64 = 1e-6;

impl Sphere {
    /// Great-circle distance between two points in meters.
    #[inline]
    pub fn distance_between(&self, from: &LatLng, to: &LatLng) -> f64 {
        compute_angle_between(from, to) * self.radius()
    }

    /// Length of an open path in meters. Paths with fewer than two points have length 0.
    pub fn length(&self, path: &[LatLng]) -> f64 {
        if path.len() < 2 {
            return 0.0;
        }
        let angle: f64 = path
            .windows(2)
            .map(|pair| {
                let (lat1, lng1) = pair[0].to_radians();
                let (lat2, lng2) = pair[1].to_radians();
                distance_radians(lat1, lng1, lat2, lng2)
            })
            .sum();
        angle * self.radius()
    }

    /// The point reached by travelling `distance` meters from `from` on the
    /// given heading. The longitude is wrapped into `[-180, 180)`.
    ///
    /// # Arguments
    /// * `from` - Starting point
    /// * `distance` - Distance to travel in meters
    /// * `heading` - Degrees clockwise from north
    pub fn offset(&self, from: &LatLng, distance: f64, heading: f64) -> LatLng {
        let distance = self.to_angle(distance);
        let heading = heading.to_radians();
        let (from_lat, from_lng) = from.to_radians();

        let (sin_distance, cos_distance) = distance.sin_cos();
        let (sin_from_lat, cos_from_lat) = from_lat.sin_cos();
        let sin_lat = cos_distance * sin_from_lat + sin_distance * cos_from_lat * heading.cos();
        let d_lng = (sin_distance * cos_from_lat * heading.sin())
            .atan2(cos_distance - sin_from_lat * sin_lat);

        let lng = wrap((from_lng + d_lng).to_degrees(), -180.0, 180.0);
        LatLng::new(sin_lat.asin().to_degrees(), lng)
    }

    /// The origin from which travelling `distance` meters on `heading` arrives at `to`.
    /// The longitude is wrapped into `[-180, 180)`.
    ///
    /// Returns `None` when no origin exists: either the underlying quadratic
    /// has no real root, or neither root is a latitude in `[-90, 90]`.
    pub fn offset_origin(&self, to: &LatLng, distance: f64, heading: f64) -> Option<LatLng> {
        let heading = heading.to_radians();
        let distance = self.to_angle(distance);
        let (to_lat, to_lng) = to.to_radians();

        let n1 = distance.cos();
        let n2 = distance.sin() * heading.cos();
        let n3 = distance.sin() * heading.sin();
        let n4 = to_lat.sin();

        // cos(from_lat) solves a quadratic; one root may land outside [-90, 90].
        let n12 = n1 * n1;
        let discriminant = n2 * n2 * n12 + n12 * n12 - n12 * n4 * n4;
        if discriminant < 0.0 {
            tracing::debug!(discriminant, "Offset origin has no real solution");
            return None;
        }

        let denominator = n12 + n2 * n2;
        let solve = |root: f64| {
            let b = (n2 * n4 + root) / denominator;
            let a = (n4 - n2 * b) / n1;
            a.atan2(b)
        };

        let in_range = |lat: f64| (-FRAC_PI_2..=FRAC_PI_2).contains(&lat);
        let root = discriminant.sqrt();
        let mut from_lat = solve(root);
        if !in_range(from_lat) {
            from_lat = solve(-root);
        }
        if !in_range(from_lat) {
            tracing::debug!("Offset origin has no solution with a valid latitude");
            return None;
        }

        let from_lng = to_lng - n3.atan2(n1 * from_lat.cos() - n2 * from_lat.sin());
        let (lat, lng) = (from_lat.to_degrees(), from_lng.to_degrees());
        if lat.is_finite() && lng.is_finite() {
            Some(LatLng::new(lat, wrap(lng, -180.0, 180.0)))
        } else {
            tracing::debug!(distance, "Offset origin is degenerate");
            None
        }
    }

    /// Signed area of a closed path in square meters.
    ///
    /// The path is implicitly closed. A positive area means the vertices run
    /// counter-clockwise around the enclosed region, where the enclosed region
    /// is the one that does not contain the South Pole. Paths with fewer than
    /// three points have area 0.
    pub fn signed_area(&self, path: &[LatLng]) -> f64 {
        let Some(last) = path.last() else {
            return 0.0;
        };
        if path.len() < 3 {
            return 0.0;
        }

        let mut total = 0.0;
        let (prev_lat, mut prev_lng) = last.to_radians();
        let mut prev_tan_lat = polar_tan(prev_lat);
        // Sum the signed areas of the triangles each edge forms with the North Pole.
        for point in path {
            let (lat, lng) = point.to_radians();
            let tan_lat = polar_tan(lat);
            total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
            prev_tan_lat = tan_lat;
            prev_lng = lng;
        }
        total * self.radius() * self.radius()
    }

    /// Area of a closed path in square meters.
    #[inline]
    pub fn area(&self, path: &[LatLng]) -> f64 {
        self.signed_area(path).abs()
    }
}

/// Initial heading from one point to another, in degrees clockwise from
/// north within `[-180, 180)`.
pub fn compute_heading(from: &LatLng, to: &LatLng) -> f64 {
    let (from_lat, from_lng) = from.to_radians();
    let (to_lat, to_lng) = to.to_radians();
    let d_lng = to_lng - from_lng;
    let heading = (d_lng.sin() * to_lat.cos())
        .atan2(from_lat.cos() * to_lat.sin() - from_lat.sin() * to_lat.cos() * d_lng.cos());
    wrap(heading.to_degrees(), -180.0, 180.0)
}

/// The point lying `fraction` of the way from `from` to `to` along the great circle.
///
/// Coincident (or numerically indistinguishable) endpoints return `from`.
/// Fractions outside `[0, 1]` extrapolate along the same great circle.
pub fn interpolate(from: &LatLng, to: &LatLng, fraction: f64) -> LatLng {
    let (from_lat, from_lng) = from.to_radians();
    let (to_lat, to_lng) = to.to_radians();
    let cos_from_lat = from_lat.cos();
    let cos_to_lat = to_lat.cos();

    let angle = compute_angle_between(from, to);
    let sin_angle = angle.sin();
    if sin_angle < SLERP_EPSILON {
        return *from;
    }
    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    // Blend the unit vectors, then back to spherical coordinates.
    let x = a * cos_from_lat * from_lng.cos() + b * cos_to_lat * to_lng.cos();
    let y = a * cos_from_lat * from_lng.sin() + b * cos_to_lat * to_lng.sin();
    let z = a * from_lat.sin() + b * to_lat.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lng = y.atan2(x);
    LatLng::new(lat.to_degrees(), lng.to_degrees())
}

/// Angle between two points in radians, i.e. their distance on the unit sphere.
#[inline]
pub fn compute_angle_between(from: &LatLng, to: &LatLng) -> f64 {
    let (lat1, lng1) = from.to_radians();
    let (lat2, lng2) = to.to_radians();
    distance_radians(lat1, lng1, lat2, lng2)
}

/// Great-circle distance between two points on the Earth, in meters.
///
/// # Example
/// ```
/// use orbis_geo::{compute_distance_between, LatLng};
///
/// let a = LatLng::new(38.5, -120.2);
/// assert_eq!(compute_distance_between(&a, &a), 0.0);
/// ```
#[inline]
pub fn compute_distance_between(from: &LatLng, to: &LatLng) -> f64 {
    Sphere::EARTH.distance_between(from, to)
}

/// Length of an open path on the Earth, in meters.
pub fn compute_length(path: &[LatLng]) -> f64 {
    Sphere::EARTH.length(path)
}

/// Destination on the Earth; see [`Sphere::offset`].
pub fn compute_offset(from: &LatLng, distance: f64, heading: f64) -> LatLng {
    Sphere::EARTH.offset(from, distance, heading)
}

/// Origin on the Earth; see [`Sphere::offset_origin`].
pub fn compute_offset_origin(to: &LatLng, distance: f64, heading: f64) -> Option<LatLng> {
    Sphere::EARTH.offset_origin(to, distance, heading)
}

/// Signed area of a closed path on the Earth; see [`Sphere::signed_area`].
pub fn compute_signed_area(path: &[LatLng]) -> f64 {
    Sphere::EARTH.signed_area(path)
}

/// Area of a closed path on the Earth, in square meters.
pub fn compute_area(path: &[LatLng]) -> f64 {
    Sphere::EARTH.area(path)
}

/// Distance on the unit sphere; arguments in radians.
#[inline]
pub(crate) fn distance_radians(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    arc_hav(hav_distance(lat1, lat2, lng1 - lng2))
}

#[inline]
fn polar_tan(lat: f64) -> f64 {
    ((FRAC_PI_2 - lat) / 2.0).tan()
}

/// Signed area of a triangle with the North Pole as a vertex.
///
/// From "Spherical Trigonometry" by Todhunter, page 71, section 103, point 2:
/// the area of a spherical triangle given two sides and the included angle.
/// The `tan` arguments are `tan((pi/2 - latitude) / 2)`.
fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}
