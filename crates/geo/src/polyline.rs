//! Encoded Polyline Algorithm Format.
//!
//! Each coordinate is rounded to 1e-5 degrees and stored as the delta from
//! the previous point (latitude first). A delta is zig-zag mapped to an
//! unsigned value and written as 5-bit chunks, least significant first, with
//! `0x20` set on every chunk but the last and `63` added to land in printable
//! ASCII (`'?'..='~'`).
//!
//! # Example
//! ```
//! use orbis_geo::{decode, encode, LatLng};
//!
//! let path = vec![LatLng::new(38.5, -120.2), LatLng::new(40.7, -120.95)];
//! let encoded = encode(&path);
//! assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC");
//! assert_eq!(decode(&encoded).unwrap(), path);
//! ```

use crate::{GeoError, LatLng, Result};

/// Scale between degrees and encoded integer units.
const PRECISION: f64 = 1e5;

/// Added to every 6-bit chunk to make it printable.
const CHAR_OFFSET: u8 = 63;

/// Set on every chunk that is followed by another chunk of the same value.
const CONTINUATION: u64 = 0x20;

const CHUNK_MASK: u64 = 0x1f;

/// Encodes a path into a polyline string.
///
/// Coordinates are rounded to the nearest 1e-5 degree, so decoding the
/// result reproduces the input only to that precision. Non-finite
/// coordinates encode as 0.
pub fn encode(path: &[LatLng]) -> String {
    let mut encoded = String::with_capacity(path.len() * 8);
    let mut last_lat = 0i64;
    let mut last_lng = 0i64;

    for point in path {
        let lat = to_units(point.lat);
        let lng = to_units(point.lng);

        encode_value(lat.wrapping_sub(last_lat), &mut encoded);
        encode_value(lng.wrapping_sub(last_lng), &mut encoded);

        last_lat = lat;
        last_lng = lng;
    }
    encoded
}

/// Decodes a polyline string into a path.
///
/// # Errors
/// - [`GeoError::InvalidPolylineByte`] for a byte outside `'?'..='~'`
/// - [`GeoError::TruncatedPolyline`] when the input ends inside a value or
///   after a latitude without its longitude
/// - [`GeoError::PolylineOverflow`] for a value longer than 64 bits
pub fn decode(encoded: &str) -> Result<Vec<LatLng>> {
    let bytes = encoded.as_bytes();
    // Every point takes at least two bytes.
    let mut path = Vec::with_capacity(bytes.len() / 2);
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while index < bytes.len() {
        lat = lat.wrapping_add(decode_value(bytes, &mut index)?);
        lng = lng.wrapping_add(decode_value(bytes, &mut index)?);
        path.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }
    Ok(path)
}

#[inline]
fn to_units(degrees: f64) -> i64 {
    // `as` saturates, and maps NaN to 0.
    (degrees * PRECISION).round() as i64
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = zigzag(value);
    while v >= CONTINUATION {
        out.push(char::from((CONTINUATION | (v & CHUNK_MASK)) as u8 + CHAR_OFFSET));
        v >>= 5;
    }
    out.push(char::from(v as u8 + CHAR_OFFSET));
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let start = *index;
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            tracing::debug!(position = start, "Polyline ends inside a value");
            return Err(GeoError::TruncatedPolyline { position: start });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            tracing::debug!(position = *index, byte, "Byte outside the polyline alphabet");
            return Err(GeoError::InvalidPolylineByte { position: *index, byte });
        }
        let chunk = u64::from(byte - CHAR_OFFSET);
        let bits = chunk & CHUNK_MASK;
        // Reject chunks whose bits would be shifted past the top of the accumulator.
        if shift >= u64::BITS || (bits << shift) >> shift != bits {
            tracing::debug!(position = start, "Polyline value exceeds 64 bits");
            return Err(GeoError::PolylineOverflow { position: start });
        }
        result |= bits << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION == 0 {
            return Ok(unzigzag(result));
        }
    }
}

#[inline]
fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
fn unzigzag(value: u64) -> i64 {
    let half = (value >> 1) as i64;
    if value & 1 != 0 { !half } else { half }
}
