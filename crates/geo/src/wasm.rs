//! WASM bindings for the geo crate.
//!
//! Paths and polygons cross the boundary as JSON arrays of `{"lat", "lng"}`
//! objects. All functions use the Earth radius.

use crate::{
    batch, compute_area, compute_distance_between, compute_heading, compute_offset,
    contains_location, decode, encode, LatLng, SegmentKind,
};
use wasm_bindgen::prelude::*;

fn parse_path(json: &str) -> Result<Vec<LatLng>, JsValue> {
    batch::parse_points(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

fn segment_kind(geodesic: bool) -> SegmentKind {
    if geodesic { SegmentKind::Geodesic } else { SegmentKind::Rhumb }
}

/// Great-circle distance between two points.
///
/// # Returns
/// Distance in meters
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    compute_distance_between(&LatLng::new(lat1, lng1), &LatLng::new(lat2, lng2))
}

/// Initial heading from the first point to the second, in degrees within `[-180, 180)`.
#[wasm_bindgen]
pub fn heading(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    compute_heading(&LatLng::new(lat1, lng1), &LatLng::new(lat2, lng2))
}

/// Point reached by travelling `distance` meters from a start point along `heading`.
///
/// # Returns
/// JSON string `{"lat": .., "lng": ..}`
#[wasm_bindgen]
pub fn offset(lat: f64, lng: f64, distance: f64, heading: f64) -> Result<String, JsValue> {
    to_json(&compute_offset(&LatLng::new(lat, lng), distance, heading))
}

/// Unsigned area of a closed path in square meters.
///
/// # Arguments
/// * `path_json` - JSON array of points
#[wasm_bindgen]
pub fn area(path_json: &str) -> Result<f64, JsValue> {
    Ok(compute_area(&parse_path(path_json)?))
}

/// Whether a point lies inside a polygon.
///
/// # Arguments
/// * `polygon_json` - JSON array of polygon vertices
/// * `geodesic` - Great-circle edges when true, rhumb lines otherwise
#[wasm_bindgen]
pub fn contains(lat: f64, lng: f64, polygon_json: &str, geodesic: bool) -> Result<bool, JsValue> {
    let polygon = parse_path(polygon_json)?;
    Ok(contains_location(&LatLng::new(lat, lng), &polygon, segment_kind(geodesic)))
}

/// Distances from an origin to many points, in input order.
///
/// # Returns
/// JSON array of `{"index", "distance"}` objects
#[wasm_bindgen]
pub fn distances(lat: f64, lng: f64, points_json: &str) -> Result<String, JsValue> {
    let points = parse_path(points_json)?;
    to_json(&batch::calculate_distances(&LatLng::new(lat, lng), &points))
}

/// Encodes a JSON path into a polyline string.
#[wasm_bindgen]
pub fn encode_path(path_json: &str) -> Result<String, JsValue> {
    Ok(encode(&parse_path(path_json)?))
}

/// Decodes a polyline string into a JSON path.
#[wasm_bindgen]
pub fn decode_path(encoded: &str) -> Result<String, JsValue> {
    let path = decode(encoded).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&path)
}
