//! Spherical geometry for map applications.
//!
//! This crate provides:
//! - Great-circle distances, headings, offsets and interpolation
//! - Path length and signed polygon area on a sphere
//! - Point-in-polygon and point-near-path predicates (great-circle and rhumb)
//! - Encoded Polyline Algorithm Format encoding/decoding
//! - Batch processing with optional parallelism
//! - WASM bindings for browser usage
//!
//! Radius-dependent operations are methods on [`Sphere`]; the free functions
//! of the same name use [`Sphere::EARTH`].
//!
//! # Example
//!
//! ```
//! use orbis_geo::{compute_distance_between, LatLng};
//!
//! let berlin = LatLng::new(52.5200, 13.4050);
//! let paris = LatLng::new(48.8566, 2.3522);
//!
//! let meters = compute_distance_between(&berlin, &paris);
//! assert!((meters - 878_000.0).abs() < 10_000.0);
//! ```

pub mod math;
mod sphere;
mod spherical;
mod poly;
mod polyline;
pub mod batch;
pub mod config;
mod error;

#[cfg(feature = "wasm")]
mod wasm;

pub use sphere::{Sphere, EARTH_RADIUS_M};
pub use spherical::{
    compute_angle_between, compute_area, compute_distance_between, compute_heading,
    compute_length, compute_offset, compute_offset_origin, compute_signed_area, interpolate,
};
pub use poly::{
    contains_location, distance_to_line, is_closed_polygon, is_location_on_edge,
    is_location_on_path, location_index_on_edge, location_index_on_path, simplify,
    DEFAULT_TOLERANCE,
};
pub use polyline::{decode, encode};
pub use batch::DistanceResult;
pub use config::GeoConfig;
pub use error::{GeoError, GeoErrorCode, Result};

/// A geographic point with latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees, conventionally -180 to 180
    pub lng: f64,
}

impl LatLng {
    /// Creates a new point without validation.
    ///
    /// Latitude is expected in `[-90, 90]`; longitude may be any finite value
    /// and is wrapped where it matters.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a new point, rejecting non-finite values and latitudes outside `[-90, 90]`.
    ///
    /// Longitude is not range-checked; use [`LatLng::is_valid`] to also
    /// require `[-180, 180]`.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(GeoError::InvalidCoordinate(format!(
                "non-finite value in ({lat}, {lng})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidCoordinate(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        Ok(Self::new(lat, lng))
    }

    /// Returns true if the point lies in the canonical range: latitude in
    /// `[-90, 90]` and longitude in `[-180, 180]`.
    ///
    /// Stricter than [`LatLng::try_new`], which accepts any finite longitude
    /// because every operation wraps longitudes itself.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Whether a path's last vertex connects back to its first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    /// Polygon edge: the segment from the last point to the first is included.
    Closed,
    /// Polyline: only consecutive points are connected.
    Open,
}

/// Shape of the segment between two consecutive vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Great-circle arc, the shortest path on the sphere.
    #[default]
    Geodesic,
    /// Rhumb line of constant bearing, straight in Mercator space.
    Rhumb,
}
