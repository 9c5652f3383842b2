//! This module provides a parser for the *GGA* sentence of the *NMEA 0183*
//! protocol.

use arrayvec::ArrayVec;
use std::str::FromStr;

use crate::coord::{Axis, CardDir};
use crate::err::ParseError;

/// Identifier every accepted sentence starts with.
pub const SENTENCE_ID: &str = "$GPGGA";
/// Identifier, 14 data fields and the field carrying the checksum suffix.
pub const GGA_FIELD_COUNT: usize = 15;

const UTC: usize = 1;
const LAT: usize = 2;
const LAT_DIR: usize = 3;
const LONG: usize = 4;
const LONG_DIR: usize = 5;
const HDOP: usize = 8;
const ALTITUDE: usize = 9;

/// The fields of a GGA sentence that are needed for a position report, still
/// in their NMEA encoding. Created by [parse](fn.parse.html).
#[derive(Debug, Clone, PartialEq)]
pub struct RawFix {
    /// Seconds since midnight UTC, `0.0` if the sentence carries no time.
    pub utc_time_of_day: f64,
    /// Latitude as `ddmm.mmmm`.
    pub lat_raw: String,
    pub lat_dir: CardDir,
    /// Longitude as `dddmm.mmmm`.
    pub lon_raw: String,
    pub lon_dir: CardDir,
    /// Antenna altitude above mean-sea-level (geoid) in meters.
    pub altitude_m: f64,
    /// Horizontal dilution of precision.
    pub hdop: f64,
}

/// Returns `true` if `line` is a sentence [parse](fn.parse.html) accepts.
/// Everything else is meant to be skipped by the caller.
#[inline]
pub fn is_gga(line: &str) -> bool {
    line.starts_with(SENTENCE_ID)
}

/// Parse one GGA sentence, already stripped of its line ending.
///
/// The whole sentence fails if a field cannot be decoded; there is no partial
/// result. The `*hh` checksum suffix is not inspected here, see
/// [checksum::verify](../checksum/fn.verify.html).
pub fn parse(line: &str) -> Result<RawFix, ParseError> {
    let result = parse_fields(line);
    if let Err(ref e) = result {
        debug!("Dropping sentence \"{}\": {}", line, e);
    }
    result
}

fn parse_fields(line: &str) -> Result<RawFix, ParseError> {
    let fields: ArrayVec<&str, GGA_FIELD_COUNT> = line.split(',').take(GGA_FIELD_COUNT).collect();

    if fields.len() < GGA_FIELD_COUNT {
        return Err(ParseError::Malformed(fields.len()));
    }
    if fields[0] != SENTENCE_ID {
        return Err(ParseError::UnexpectedSentenceType(fields[0].to_owned()));
    }

    let utc_time_of_day = fl_to_seconds_of_day(fields[UTC])?;

    let lat_raw = coord_or_zero(fields[LAT]);
    let lat_dir = CardDir::from_code(fields[LAT_DIR], Axis::Latitude)?;
    let lon_raw = coord_or_zero(fields[LONG]);
    let lon_dir = CardDir::from_code(fields[LONG_DIR], Axis::Longitude)?;

    let hdop = fl_or_zero(fields[HDOP], "hdop")?;
    let altitude_m = fl_or_zero(fields[ALTITUDE], "altitude")?;

    Ok(RawFix {
        utc_time_of_day,
        lat_raw,
        lat_dir,
        lon_raw,
        lon_dir,
        altitude_m,
        hdop,
    })
}

#[inline]
fn coord_or_zero(field: &str) -> String {
    if field.is_empty() {
        "0".to_owned()
    } else {
        field.to_owned()
    }
}

#[inline]
fn fl_or_zero(field: &str, name: &'static str) -> Result<f64, ParseError> {
    if field.is_empty() {
        return Ok(0.0);
    }
    let value = f64::from_str(field).map_err(|e| (name, e))?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite(name, field.to_owned()));
    }
    Ok(value)
}

/// Converts a `hhmmss.sss` field to seconds since midnight.
fn fl_to_seconds_of_day(field: &str) -> Result<f64, ParseError> {
    let hhmmss = fl_or_zero(field, "utc")?;
    if hhmmss < 0.0 {
        return Err(ParseError::InvalidTime(field.to_owned()));
    }

    let hours = (hhmmss / 10_000.0).floor();
    let minutes = ((hhmmss - hours * 10_000.0) / 100.0).floor();
    let seconds = hhmmss - hours * 10_000.0 - minutes * 100.0;

    if hours >= 24.0 || minutes >= 60.0 || seconds >= 61.0 {
        return Err(ParseError::InvalidTime(field.to_owned()));
    }
    // a leap second can only be inserted at 23:59:60
    if seconds >= 60.0 && (hours != 23.0 || minutes != 59.0) {
        return Err(ParseError::InvalidTime(field.to_owned()));
    }

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}
