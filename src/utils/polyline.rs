//! Encoded polyline format: zig-zag, delta-coded varints packed into
//! printable ASCII, five payload bits per character.

use crate::error::RoutingError;
use crate::utils::geo::GeoCoordinate;

/// Decimal places kept by the encoding. Some providers use 6.
pub const DEFAULT_PRECISION: u32 = 5;

/// Above this the scaled coordinates no longer fit comfortably in an i64.
pub const MAX_PRECISION: u32 = 10;

const ASCII_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const PAYLOAD_MASK: i64 = 0x1f;
// 12 chunks carry 60 bits, far more than any real coordinate delta needs.
const MAX_SHIFT: u32 = 55;

/// Decode `encoded` into points, in encoding order.
///
/// An empty string yields an empty path. Input that ends in the middle of a
/// value, contains characters outside `'?'..='~'`, or decodes to a point
/// outside the valid coordinate range fails with [`RoutingError::DecodeError`].
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoCoordinate>, RoutingError> {
    let factor = scale_factor(precision)?;
    let bytes = encoded.as_bytes();

    let mut points = Vec::new();
    let mut cursor = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;

    while cursor < bytes.len() {
        let lat_delta = read_value(bytes, &mut cursor)?;
        let lng_delta = read_value(bytes, &mut cursor)?;

        latitude = latitude
            .checked_add(lat_delta)
            .ok_or_else(|| RoutingError::DecodeError("latitude overflow".to_string()))?;
        longitude = longitude
            .checked_add(lng_delta)
            .ok_or_else(|| RoutingError::DecodeError("longitude overflow".to_string()))?;

        let point = GeoCoordinate {
            latitude: latitude as f64 / factor,
            longitude: longitude as f64 / factor,
        };
        point.validate().map_err(|e| {
            RoutingError::DecodeError(format!("point {} out of range: {}", points.len(), e))
        })?;
        points.push(point);
    }

    Ok(points)
}

/// Encode `points` with the given precision. Inverse of [`decode`].
pub fn encode(points: &[GeoCoordinate], precision: u32) -> Result<String, RoutingError> {
    let factor = scale_factor(precision).map_err(|_| {
        RoutingError::InvalidRequest(format!("precision {} exceeds {}", precision, MAX_PRECISION))
    })?;

    let mut encoded = String::new();
    let mut previous = (0i64, 0i64);

    for point in points {
        point.validate()?;
        let latitude = (point.latitude * factor).round() as i64;
        let longitude = (point.longitude * factor).round() as i64;

        write_value(latitude - previous.0, &mut encoded);
        write_value(longitude - previous.1, &mut encoded);
        previous = (latitude, longitude);
    }

    Ok(encoded)
}

fn scale_factor(precision: u32) -> Result<f64, RoutingError> {
    if precision > MAX_PRECISION {
        return Err(RoutingError::DecodeError(format!(
            "precision {} exceeds {}",
            precision, MAX_PRECISION
        )));
    }
    Ok(10f64.powi(precision as i32))
}

fn read_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, RoutingError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *bytes.get(*cursor).ok_or_else(|| {
            RoutingError::DecodeError(format!("input ended mid-value at offset {}", *cursor))
        })?;
        if !(ASCII_OFFSET..=126).contains(&byte) {
            return Err(RoutingError::DecodeError(format!(
                "invalid character {:?} at offset {}",
                byte as char, *cursor
            )));
        }
        if shift > MAX_SHIFT {
            return Err(RoutingError::DecodeError(format!(
                "value starting before offset {} is too long",
                *cursor
            )));
        }
        *cursor += 1;

        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & PAYLOAD_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn write_value(value: i64, out: &mut String) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;

    while zigzag >= CONTINUATION_BIT as u64 {
        let chunk = (CONTINUATION_BIT as u64 | (zigzag & PAYLOAD_MASK as u64)) as u8;
        out.push((chunk + ASCII_OFFSET) as char);
        zigzag >>= 5;
    }
    out.push((zigzag as u8 + ASCII_OFFSET) as char);
}
