//! Encoded polyline format with 1e5 precision, latitude first.

use thiserror::Error;

use crate::geopoint::{CoordinateError, GeoPoint};

const PRECISION: f64 = 1e5;

#[derive(Debug, Error, PartialEq)]
pub enum PolylineError {
    #[error("invalid character {character:?} at byte {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("polyline ends in the middle of a value")]
    Truncated,

    #[error("value at byte {0} overflows")]
    Overflow(usize),

    #[error("latitude without a matching longitude")]
    UnpairedCoordinate,

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

fn encode_value(value: i64, output: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };

    while value >= 0x20 {
        output.push(char::from((0x20 | (value & 0x1f)) as u8 + 63));
        value >>= 5;
    }

    output.push(char::from(value as u8 + 63));
}

pub fn encode(points: &[GeoPoint]) -> String {
    let mut output = String::with_capacity(points.len() * 8);
    let mut previous = (0_i64, 0_i64);

    for point in points {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;

        encode_value(lat - previous.0, &mut output);
        encode_value(lng - previous.1, &mut output);

        previous = (lat, lng);
    }

    output
}

fn decode_value(bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*position) else {
            return Err(PolylineError::Truncated);
        };

        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: char::from(byte),
                position: *position,
            });
        }

        if shift > 60 {
            return Err(PolylineError::Overflow(*position));
        }

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *position += 1;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

pub fn decode(polyline: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = polyline.as_bytes();
    let mut position = 0;
    let mut lat = 0_i64;
    let mut lng = 0_i64;
    let mut points = Vec::new();

    while position < bytes.len() {
        let start = position;
        lat = lat
            .checked_add(decode_value(bytes, &mut position)?)
            .ok_or(PolylineError::Overflow(start))?;

        if position >= bytes.len() {
            return Err(PolylineError::UnpairedCoordinate);
        }

        let start = position;
        lng = lng
            .checked_add(decode_value(bytes, &mut position)?)
            .ok_or(PolylineError::Overflow(start))?;

        let point = GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION);
        point.validate()?;
        points.push(point);
    }

    Ok(points)
}
