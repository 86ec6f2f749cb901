//! Property tests for the public geometry API.

use orbis_geo::math::{clamp, wrap};
use orbis_geo::{
    compute_distance_between, compute_offset, compute_offset_origin, contains_location, decode,
    encode, is_location_on_path, LatLng, SegmentKind, Sphere,
};
use proptest::prelude::*;

fn lat_lng(lat: std::ops::Range<f64>) -> impl Strategy<Value = LatLng> {
    (lat, -180.0..180.0).prop_map(|(lat, lng)| LatLng::new(lat, lng))
}

fn segment_kind() -> impl Strategy<Value = SegmentKind> {
    prop_oneof![Just(SegmentKind::Geodesic), Just(SegmentKind::Rhumb)]
}

proptest! {
    #[test]
    fn clamp_stays_in_range(x in -1e9..1e9f64, low in -1e3..0.0f64, high in 0.0..1e3f64) {
        let c = clamp(x, low, high);
        prop_assert!(low <= c && c <= high);
        if (low..=high).contains(&x) {
            prop_assert_eq!(c, x);
        }
    }

    #[test]
    fn wrap_lands_in_half_open_range(
        n in -1e6..1e6f64,
        min in -1000i32..1000,
        span in 1i32..1000,
    ) {
        let min = f64::from(min);
        let max = min + f64::from(span);
        let w = wrap(n, min, max);
        prop_assert!((min..max).contains(&w), "wrap({}, {}, {}) = {}", n, min, max, w);
        // Congruent to n modulo the interval width.
        let turns = (n - w) / (max - min);
        prop_assert!((turns - turns.round()).abs() < 1e-6);
    }

    #[test]
    fn polyline_round_trips_within_precision(
        path in prop::collection::vec(lat_lng(-90.0..90.0), 0..20)
    ) {
        let decoded = decode(&encode(&path)).unwrap();
        prop_assert_eq!(decoded.len(), path.len());
        for (actual, expected) in decoded.iter().zip(&path) {
            prop_assert!((actual.lat - expected.lat).abs() <= 1e-5);
            prop_assert!((actual.lng - expected.lng).abs() <= 1e-5);
        }
    }

    #[test]
    fn distance_is_symmetric(a in lat_lng(-90.0..90.0), b in lat_lng(-90.0..90.0)) {
        let ab = compute_distance_between(&a, &b);
        let ba = compute_distance_between(&b, &a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-3);
        prop_assert!(compute_distance_between(&a, &a) < 1e-9);
    }

    #[test]
    fn distance_never_exceeds_half_circumference(
        a in lat_lng(-90.0..90.0),
        b in lat_lng(-90.0..90.0),
        radius in 1.0..1e7f64,
    ) {
        let sphere = Sphere::new(radius).unwrap();
        let d = sphere.distance_between(&a, &b);
        prop_assert!(d <= std::f64::consts::PI * radius * (1.0 + 1e-12));
    }

    #[test]
    fn offset_travels_the_requested_distance(
        from in lat_lng(-80.0..80.0),
        distance in 0.0..1e7f64,
        heading in -180.0..180.0f64,
    ) {
        let to = compute_offset(&from, distance, heading);
        let travelled = compute_distance_between(&from, &to);
        prop_assert!((travelled - distance).abs() < 1e-2);
    }

    #[test]
    fn offset_origin_recovers_start(
        from in lat_lng(-60.0..60.0),
        distance in 1.0..1e6f64,
        heading in -180.0..180.0f64,
    ) {
        let to = compute_offset(&from, distance, heading);
        let origin = compute_offset_origin(&to, distance, heading);
        prop_assert!(origin.is_some());
        if let Some(origin) = origin {
            prop_assert!(compute_distance_between(&origin, &from) < 1e-3);
        }
    }

    #[test]
    fn vertices_are_contained(
        polygon in prop::collection::vec(lat_lng(-80.0..80.0), 3..8),
        kind in segment_kind(),
    ) {
        for vertex in &polygon {
            prop_assert!(contains_location(vertex, &polygon, kind));
        }
    }

    #[test]
    fn larger_tolerance_never_rejects(
        path in prop::collection::vec(lat_lng(-70.0..70.0), 1..6),
        point in lat_lng(-70.0..70.0),
        tolerance in 0.0..1e6f64,
        extra in 0.0..1e6f64,
        kind in segment_kind(),
    ) {
        if is_location_on_path(&point, &path, tolerance, kind) {
            prop_assert!(is_location_on_path(&point, &path, tolerance + extra, kind));
        }
    }

    #[test]
    fn path_vertices_are_on_path(
        path in prop::collection::vec(lat_lng(-70.0..70.0), 1..6),
        kind in segment_kind(),
    ) {
        for vertex in &path {
            prop_assert!(is_location_on_path(vertex, &path, 0.0, kind));
        }
    }
}
