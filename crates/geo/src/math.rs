//! Scalar building blocks shared by the spherical operations and predicates.
//!
//! Every angle here is in radians. The haversine helpers work on the unit
//! sphere; scaling to meters happens in [`crate::Sphere`].

use std::f64::consts::FRAC_PI_4;

/// Restricts `x` to the range `[low, high]`.
#[inline]
pub fn clamp(x: f64, low: f64, high: f64) -> f64 {
    if x < low {
        low
    } else if x > high {
        high
    } else {
        x
    }
}

/// Wraps `n` into the half-open interval `[min, max)`.
///
/// Values already inside the interval are returned untouched, so the result
/// is bit-identical for in-range input.
///
/// Requires `max > min`; the result is unspecified otherwise.
#[inline]
pub fn wrap(n: f64, min: f64, max: f64) -> f64 {
    if n >= min && n < max {
        n
    } else {
        modulo(n - min, max - min) + min
    }
}

/// Non-negative remainder of `x / m`.
///
/// Rust's `%` keeps the sign of the dividend, hence the double remainder.
#[inline]
pub fn modulo(x: f64, m: f64) -> f64 {
    ((x % m) + m) % m
}

/// Mercator Y for a latitude.
///
/// Diverges at the poles: callers must not pass `±π/2`.
#[inline]
pub fn mercator(lat: f64) -> f64 {
    (lat * 0.5 + FRAC_PI_4).tan().ln()
}

/// Latitude for a Mercator Y.
#[inline]
pub fn inverse_mercator(y: f64) -> f64 {
    2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2
}

/// `hav(x) == (1 - cos(x)) / 2 == sin(x / 2)^2`.
#[inline]
pub fn hav(x: f64) -> f64 {
    let sin_half = (x * 0.5).sin();
    sin_half * sin_half
}

/// Inverse haversine, `2 * asin(sqrt(x))`.
///
/// Stable around 0. The argument must be in `[0, 1]`; the result is non-negative.
#[inline]
pub fn arc_hav(x: f64) -> f64 {
    2.0 * x.sqrt().asin()
}

/// Given `h == hav(x)`, returns `sin(|x|)`.
#[inline]
pub fn sin_from_hav(h: f64) -> f64 {
    2.0 * (h * (1.0 - h)).sqrt()
}

/// Returns `hav(asin(x))`.
#[inline]
pub fn hav_from_sin(x: f64) -> f64 {
    let x2 = x * x;
    x2 / (1.0 + (1.0 - x2).sqrt()) * 0.5
}

/// Returns `sin(arc_hav(x) + arc_hav(y))`.
#[inline]
pub fn sin_sum_from_hav(x: f64, y: f64) -> f64 {
    let a = (x * (1.0 - x)).sqrt();
    let b = (y * (1.0 - y)).sqrt();
    2.0 * (a + b - 2.0 * (a * y + b * x))
}

/// Haversine of the angular distance between `(lat1, _)` and `(lat2, _ + d_lng)`
/// on the unit sphere.
#[inline]
pub fn hav_distance(lat1: f64, lat2: f64, d_lng: f64) -> f64 {
    hav(lat1 - lat2) + hav(d_lng) * lat1.cos() * lat2.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_wrap_in_range_is_identity() {
        assert_eq!(wrap(179.5, -180.0, 180.0), 179.5);
        assert_eq!(wrap(-180.0, -180.0, 180.0), -180.0);
    }

    #[test]
    fn test_wrap_out_of_range() {
        assert!((wrap(180.0, -180.0, 180.0) - (-180.0)).abs() < EPS);
        assert!((wrap(190.0, -180.0, 180.0) - (-170.0)).abs() < EPS);
        assert!((wrap(-190.0, -180.0, 180.0) - 170.0).abs() < EPS);
        assert!((wrap(725.0, -180.0, 180.0) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_modulo_is_non_negative() {
        assert!((modulo(-1.0, 3.0) - 2.0).abs() < EPS);
        assert!((modulo(7.0, 3.0) - 1.0).abs() < EPS);
        assert!((modulo(-7.5, 2.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_mercator_roundtrip() {
        for lat in [-1.2, -0.5, 0.0, 0.3, 1.4] {
            assert!((inverse_mercator(mercator(lat)) - lat).abs() < EPS);
        }
        assert!(mercator(0.0).abs() < EPS);
    }

    #[test]
    fn test_haversine_identities() {
        let x = 0.7_f64;
        assert!((hav(x) - (1.0 - x.cos()) / 2.0).abs() < EPS);
        assert!((arc_hav(hav(x)) - x).abs() < EPS);
        assert!((sin_from_hav(hav(x)) - x.sin()).abs() < EPS);
        assert!((hav_from_sin(x.sin()) - hav(x)).abs() < EPS);
    }

    #[test]
    fn test_sin_sum_from_hav() {
        let (x, y) = (0.4_f64, 1.1_f64);
        let expected = (x + y).sin();
        assert!((sin_sum_from_hav(hav(x), hav(y)) - expected).abs() < 1e-10);

        // Sum past a half circle flips the sign.
        let (x, y) = (2.0_f64, 1.5_f64);
        assert!(sin_sum_from_hav(hav(x), hav(y)) < 0.0);
    }

    #[test]
    fn test_hav_distance_quarter_circle() {
        // Equator to north pole is a quarter circle.
        let h = hav_distance(0.0, PI / 2.0, 0.0);
        assert!((arc_hav(h) - PI / 2.0).abs() < EPS);

        // Along the equator the longitude difference is the distance.
        let h = hav_distance(0.0, 0.0, 1.0);
        assert!((arc_hav(h) - 1.0).abs() < EPS);
    }
}
