//! The sphere every radius-dependent computation runs on.

use crate::{GeoError, Result};

/// Earth's radius in meters, as used by the Google Maps JavaScript API.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A sphere of a given radius.
///
/// Distances, offsets, areas and proximity tolerances are scaled by the
/// radius of the `Sphere` they are computed on. The value is owned by the
/// caller, so changing it never affects computations running elsewhere.
///
/// # Example
/// ```
/// use orbis_geo::{LatLng, Sphere};
///
/// let mut sphere = Sphere::EARTH;
/// let a = LatLng::new(0.0, 0.0);
/// let b = LatLng::new(0.0, 90.0);
///
/// let earth = sphere.distance_between(&a, &b);
/// sphere.change_radius(1.0).unwrap();
/// assert!((sphere.distance_between(&a, &b) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// assert!(earth > 1e7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f64,
}

impl Sphere {
    /// The Earth, with radius [`EARTH_RADIUS_M`].
    pub const EARTH: Sphere = Sphere { radius: EARTH_RADIUS_M };

    /// Creates a sphere with the given radius in meters.
    pub fn new(radius: f64) -> Result<Self> {
        validate_radius(radius)?;
        Ok(Self { radius })
    }

    /// Radius in meters.
    #[inline]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Replaces the radius used by subsequent computations on this sphere.
    ///
    /// Earlier results are not affected. On error the radius is left unchanged.
    pub fn change_radius(&mut self, new_radius: f64) -> Result<()> {
        validate_radius(new_radius)?;
        tracing::debug!(old = self.radius, new = new_radius, "Sphere radius changed");
        self.radius = new_radius;
        Ok(())
    }

    /// Converts meters on this sphere to an angle in radians.
    #[inline]
    pub(crate) fn to_angle(&self, meters: f64) -> f64 {
        meters / self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::EARTH
    }
}

fn validate_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidRadius(radius))
    }
}
