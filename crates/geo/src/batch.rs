//! Batch calculations with optional parallelism.
//!
//! With the `parallel` feature (on by default) the work is spread over the
//! rayon thread pool; results keep the order of the input either way.

use crate::{contains_location, LatLng, Result, SegmentKind, Sphere};
use serde::{Deserialize, Serialize};

/// Result of a distance calculation for a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Position of the point in the input slice
    pub index: usize,
    /// Distance in meters (Infinity if the point is invalid)
    pub distance: f64,
}

impl Sphere {
    /// Distances from `origin` to every point, in input order.
    ///
    /// Points with non-finite values or a latitude outside `[-90, 90]` get
    /// a distance of `f64::INFINITY`.
    ///
    /// # Example
    /// ```
    /// use orbis_geo::{LatLng, Sphere};
    ///
    /// let points = [LatLng::new(52.52, 13.405), LatLng::new(f64::NAN, 0.0)];
    /// let results = Sphere::EARTH.distances_from(&LatLng::new(50.0, 10.0), &points);
    /// assert_eq!(results.len(), 2);
    /// assert!(results[1].distance.is_infinite());
    /// ```
    pub fn distances_from(&self, origin: &LatLng, points: &[LatLng]) -> Vec<DistanceResult> {
        let measure = |(index, point): (usize, &LatLng)| DistanceResult {
            index,
            distance: self.distance_or_infinity(origin, point),
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            points.par_iter().enumerate().map(measure).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            points.iter().enumerate().map(measure).collect()
        }
    }

    /// Distances from `origin`, closest first.
    ///
    /// # Arguments
    /// * `origin` - Point to measure from
    /// * `points` - Points to measure to
    /// * `max_results` - Maximum number of results to return (None for all)
    pub fn distances_sorted(
        &self,
        origin: &LatLng,
        points: &[LatLng],
        max_results: Option<usize>,
    ) -> Vec<DistanceResult> {
        let mut results = self.distances_from(origin, points);

        // Infinity sorts last.
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        if let Some(max) = max_results {
            results.truncate(max);
        }

        results
    }

    /// Points within `radius` meters of `origin`, closest first.
    pub fn within_radius(
        &self,
        origin: &LatLng,
        points: &[LatLng],
        radius: f64,
    ) -> Vec<DistanceResult> {
        let mut results = self.distances_from(origin, points);
        results.retain(|r| r.distance <= radius);
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }

    #[inline]
    fn distance_or_infinity(&self, origin: &LatLng, point: &LatLng) -> f64 {
        if LatLng::try_new(point.lat, point.lng).is_ok() {
            self.distance_between(origin, point)
        } else {
            f64::INFINITY
        }
    }
}

/// Parses a JSON array of `{"lat": .., "lng": ..}` objects.
///
/// # Example
/// ```
/// use orbis_geo::batch::parse_points;
///
/// let points = parse_points(r#"[{"lat": 52.52, "lng": 13.405}]"#).unwrap();
/// assert_eq!(points.len(), 1);
/// ```
pub fn parse_points(json: &str) -> Result<Vec<LatLng>> {
    Ok(serde_json::from_str(json)?)
}

/// Distances on the Earth from `origin` to every point; see [`Sphere::distances_from`].
pub fn calculate_distances(origin: &LatLng, points: &[LatLng]) -> Vec<DistanceResult> {
    Sphere::EARTH.distances_from(origin, points)
}

/// Tests every point against the same polygon, in input order.
pub fn contains_locations(points: &[LatLng], polygon: &[LatLng], kind: SegmentKind) -> Vec<bool> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        points
            .par_iter()
            .map(|point| contains_location(point, polygon, kind))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        points
            .iter()
            .map(|point| contains_location(point, polygon, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRANKFURT: LatLng = LatLng { lat: 50.1109, lng: 8.6821 };

    fn create_test_points() -> Vec<LatLng> {
        vec![
            // Berlin
            LatLng::new(52.5200, 13.4050),
            // Paris
            LatLng::new(48.8566, 2.3522),
            // London
            LatLng::new(51.5074, -0.1276),
            // Invalid location
            LatLng::new(f64::NAN, 0.0),
        ]
    }

    #[test]
    fn test_batch_distances() {
        let points = create_test_points();
        let results = calculate_distances(&FRANKFURT, &points);

        assert_eq!(results.len(), 4);
        assert!(results.iter().enumerate().all(|(i, r)| r.index == i));

        let berlin = results[0];
        assert!(berlin.distance > 400_000.0 && berlin.distance < 450_000.0);

        assert!(results[3].distance.is_infinite());
    }

    #[test]
    fn test_sorted_distances() {
        let points = create_test_points();
        let results = Sphere::EARTH.distances_sorted(&FRANKFURT, &points, None);

        assert_eq!(results.len(), 4);
        for window in results.windows(2) {
            assert!(window[0].distance <= window[1].distance);
        }
        assert_eq!(results[3].index, 3);
    }

    #[test]
    fn test_radius_filter() {
        let points = create_test_points();
        // Berlin (~424 km) and Paris (~478 km) are inside, London (~638 km) is not.
        let results = Sphere::EARTH.within_radius(&FRANKFURT, &points, 500_000.0);

        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_max_results() {
        let points = create_test_points();
        let results = Sphere::EARTH.distances_sorted(&FRANKFURT, &points, Some(2));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 0);
    }

    #[test]
    fn test_contains_locations() {
        let square = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 10.0),
            LatLng::new(10.0, 10.0),
            LatLng::new(10.0, 0.0),
        ];
        let points = [LatLng::new(5.0, 5.0), LatLng::new(20.0, 5.0), LatLng::new(0.0, 0.0)];
        assert_eq!(
            contains_locations(&points, &square, SegmentKind::Geodesic),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points(r#"[{"lat": 1.5, "lng": -2.0}, {"lat": 0, "lng": 0}]"#).unwrap();
        assert_eq!(points, vec![LatLng::new(1.5, -2.0), LatLng::new(0.0, 0.0)]);

        let err = parse_points(r#"[{"lat": 1.5}]"#).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::JsonParsing);
    }

    #[test]
    fn test_result_serializes() {
        let result = DistanceResult { index: 2, distance: 1.5 };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"index":2,"distance":1.5}"#);
    }
}
