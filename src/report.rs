//! Assembly of the final position report and the single-sentence pipeline.

use chrono::NaiveTime;
use serde::Serialize;

use crate::checksum;
use crate::coord::{self, GeoFix};
use crate::err::Error;
use crate::parser::{self, RawFix};

/// Frame every report is addressed to.
pub const FRAME_ID: &str = "GPS1_FRAME";

const SECONDS_PER_DAY: u32 = 86_400;

/// A positioning report for one GGA sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    /// UTC time of day of the fix.
    pub stamp: NaiveTime,
    pub frame_id: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "utm_easting")]
    pub easting: f64,
    #[serde(rename = "utm_northing")]
    pub northing: f64,
    pub altitude: f64,
    pub hdop: f64,
    pub zone: u8,
    pub letter: char,
}

/// Pairs the projected coordinates with altitude, precision and time of `raw`.
pub fn build(raw: &RawFix, geo: &GeoFix) -> PositionReport {
    PositionReport {
        stamp: time_of_day(raw.utc_time_of_day),
        frame_id: FRAME_ID,
        latitude: geo.latitude_deg,
        longitude: geo.longitude_deg,
        easting: geo.easting_m,
        northing: geo.northing_m,
        altitude: raw.altitude_m,
        hdop: raw.hdop,
        zone: geo.utm_zone_number,
        letter: geo.utm_zone_letter,
    }
}

/// Runs one `$GPGGA` line through parsing, conversion and assembly.
pub fn process(line: &str) -> Result<PositionReport, Error> {
    let raw = parser::parse(line)?;
    let geo = coord::convert(&raw.lat_raw, raw.lat_dir, &raw.lon_raw, raw.lon_dir)?;
    Ok(build(&raw, &geo))
}

/// Like [process](fn.process.html), but rejects sentences whose `*hh` suffix
/// is missing or does not match.
pub fn process_checked(line: &str) -> Result<PositionReport, Error> {
    checksum::verify(line)?;
    process(line)
}

/// Seconds since midnight as a time of day. The second after 23:59:59 is the
/// leap second 23:59:60, values past that wrap around. Negative and NaN values
/// map to midnight.
fn time_of_day(seconds: f64) -> NaiveTime {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;

    if whole == f64::from(SECONDS_PER_DAY) {
        // chrono keeps a leap second as 23:59:59 with an extra 1e9 nanos
        let leap = NaiveTime::from_num_seconds_from_midnight_opt(
            SECONDS_PER_DAY - 1,
            1_000_000_000 + nanos,
        );
        return leap.unwrap_or(NaiveTime::MIN);
    }
    let secs = (whole as u64 % u64::from(SECONDS_PER_DAY)) as u32;

    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or(NaiveTime::MIN)
}
