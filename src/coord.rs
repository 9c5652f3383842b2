//! This module turns the degree-minute fields of a GGA sentence into signed
//! decimal degrees and hands them to the UTM projection.

use std::fmt;
use std::str::{self, FromStr};

use crate::err::ConversionError;
use crate::utm;

const LAT_SPLIT: usize = 2;
const ABS_MAX_LAT: f64 = 90.0;
const LONG_SPLIT: usize = 3;
const ABS_MAX_LONG: f64 = 180.0;

/// The two axes of a geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Number of leading characters that make up the degrees, e.g. `ddmm.mmmm`
    /// for latitude and `dddmm.mmmm` for longitude.
    #[inline]
    pub fn degree_width(self) -> usize {
        match self {
            Axis::Latitude => LAT_SPLIT,
            Axis::Longitude => LONG_SPLIT,
        }
    }

    /// Maximum absolute value in degrees.
    #[inline]
    pub fn abs_max(self) -> f64 {
        match self {
            Axis::Latitude => ABS_MAX_LAT,
            Axis::Longitude => ABS_MAX_LONG,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// The cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDir {
    North,
    South,
    East,
    West,
}

impl CardDir {
    /// Decodes the hemisphere field that belongs to `axis`.
    /// Latitude only accepts `N` and `S`, longitude only `E` and `W`.
    pub fn from_code(code: &str, axis: Axis) -> Result<Self, ConversionError> {
        let dir = match code {
            "N" => CardDir::North,
            "S" => CardDir::South,
            "E" => CardDir::East,
            "W" => CardDir::West,
            _ => return Err(ConversionError::InvalidHemisphere(code.to_owned(), axis)),
        };
        if dir.axis() != axis {
            return Err(ConversionError::InvalidHemisphere(code.to_owned(), axis));
        }
        Ok(dir)
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            CardDir::North | CardDir::South => Axis::Latitude,
            CardDir::East | CardDir::West => Axis::Longitude,
        }
    }

    #[inline]
    pub fn code(self) -> char {
        match self {
            CardDir::North => 'N',
            CardDir::South => 'S',
            CardDir::East => 'E',
            CardDir::West => 'W',
        }
    }

    #[inline]
    fn get_sign(self) -> f64 {
        match self {
            CardDir::North | CardDir::East => 1.0,
            CardDir::South | CardDir::West => -1.0,
        }
    }
}

/// A position in signed decimal degrees together with its UTM projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    /// A negative value lies in the southern hemisphere.
    pub latitude_deg: f64,
    /// A negative value lies in the western hemisphere.
    pub longitude_deg: f64,
    pub easting_m: f64,
    pub northing_m: f64,
    pub utm_zone_number: u8,
    pub utm_zone_letter: char,
}

/// Converts the raw coordinate fields of a sentence into a `GeoFix`.
pub fn convert(
    lat_raw: &str,
    lat_dir: CardDir,
    lon_raw: &str,
    lon_dir: CardDir,
) -> Result<GeoFix, ConversionError> {
    let latitude_deg = decimal_degrees(lat_raw, lat_dir, Axis::Latitude)?;
    let longitude_deg = decimal_degrees(lon_raw, lon_dir, Axis::Longitude)?;
    let utm = utm::from_latlon(latitude_deg, longitude_deg)?;

    Ok(GeoFix {
        latitude_deg,
        longitude_deg,
        easting_m: utm.easting,
        northing_m: utm.northing,
        utm_zone_number: utm.zone_number,
        utm_zone_letter: utm.zone_letter,
    })
}

/// Parse `raw` as a degree-minute coordinate on `axis`.
/// The first `axis.degree_width()` characters are the whole degrees, the rest
/// is the (possibly fractional) minutes. `dir` decides the sign.
pub fn decimal_degrees(raw: &str, dir: CardDir, axis: Axis) -> Result<f64, ConversionError> {
    let degenerate = |reason| ConversionError::Degenerate(raw.to_owned(), reason);

    if dir.axis() != axis {
        return Err(ConversionError::InvalidHemisphere(dir.code().to_string(), axis));
    }

    let coord = raw.as_bytes();
    let deg_split = axis.degree_width();
    // This check is needed to ensure we don't panic
    if deg_split > coord.len() {
        return Err(degenerate("too short for a coordinate"));
    }

    let (deg, min) = coord.split_at(deg_split);
    if !deg.iter().all(u8::is_ascii_digit) {
        return Err(degenerate("degrees are not a number"));
    }
    if !min.iter().all(|c| c.is_ascii_digit() || *c == b'.') {
        return Err(degenerate("minutes are not a number"));
    }

    // both halves are plain ASCII at this point
    let degrees = str::from_utf8(deg)
        .ok()
        .and_then(|d| u16::from_str(d).ok())
        .map(f64::from)
        .ok_or_else(|| degenerate("degrees are not a number"))?;
    let minutes = str::from_utf8(min)
        .ok()
        .and_then(|m| f64::from_str(m).ok())
        .ok_or_else(|| degenerate("minutes are not a number"))?;

    if minutes >= 60.0 {
        return Err(degenerate("minutes must be below 60"));
    }
    // 90° latitude is unprojectable, 180° longitude is the antimeridian
    let max = axis.abs_max();
    let beyond = match axis {
        Axis::Latitude => degrees >= max,
        Axis::Longitude => degrees > max || (degrees == max && minutes > 0.0),
    };
    if beyond {
        return Err(degenerate("degrees exceed the legal range"));
    }

    Ok(dir.get_sign() * (degrees + minutes / 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::ErrorKind;

    const EPS: f64 = 1e-9;

    #[test]
    fn munich_fix() {
        let fix = convert("4807.038", CardDir::North, "01131.000", CardDir::East).unwrap();
        assert!((fix.latitude_deg - 48.1173).abs() < 1e-4);
        assert!((fix.longitude_deg - 11.516_666_666_666_667).abs() < EPS);
        assert_eq!(fix.utm_zone_number, 32);
        assert_eq!(fix.utm_zone_letter, 'U');
        assert!((fix.easting_m - 687_299.575).abs() < 0.5);
        assert!((fix.northing_m - 5_332_401.246).abs() < 0.5);
    }

    #[test]
    fn degree_minute_round_trip() {
        let cases = [
            ("4807.038", CardDir::North, 48.0, 7.038),
            ("3351.000", CardDir::South, 33.0, 51.0),
            ("0000.0001", CardDir::North, 0.0, 0.0001),
            ("8959.9999", CardDir::South, 89.0, 59.9999),
        ];
        for &(raw, dir, deg, min) in &cases {
            let sign = if dir == CardDir::South { -1.0 } else { 1.0 };
            let got = decimal_degrees(raw, dir, Axis::Latitude).unwrap();
            assert!((got - sign * (deg + min / 60.0)).abs() < EPS, "{}", raw);
        }

        let got = decimal_degrees("12158.3416", CardDir::West, Axis::Longitude).unwrap();
        assert!((got + (121.0 + 58.3416 / 60.0)).abs() < EPS);
    }

    #[test]
    fn minutes_without_fraction() {
        let got = decimal_degrees("4807", CardDir::North, Axis::Latitude).unwrap();
        assert!((got - (48.0 + 7.0 / 60.0)).abs() < EPS);
    }

    #[test]
    fn southern_and_western_hemispheres_are_negative() {
        let fix = convert("3352.128", CardDir::South, "15112.558", CardDir::East).unwrap();
        assert!(fix.latitude_deg < 0.0);
        assert!(fix.northing_m > 0.0);
        assert_eq!(fix.utm_zone_letter, 'H');

        let fix = convert("4042.768", CardDir::North, "07400.360", CardDir::West).unwrap();
        assert!(fix.longitude_deg < 0.0);
        assert_eq!(fix.utm_zone_number, 18);
        assert_eq!(fix.utm_zone_letter, 'T');
    }

    #[test]
    fn convert_is_idempotent() {
        let a = convert("5321.6802", CardDir::North, "00630.3372", CardDir::West).unwrap();
        let b = convert("5321.6802", CardDir::North, "00630.3372", CardDir::West).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_short() {
        assert_matches!(
            decimal_degrees("0", CardDir::North, Axis::Latitude),
            Err(ConversionError::Degenerate(..))
        );
        assert_matches!(
            decimal_degrees("12", CardDir::East, Axis::Longitude),
            Err(ConversionError::Degenerate(..))
        );
        // degrees alone leave no minutes behind
        assert_matches!(
            decimal_degrees("48", CardDir::North, Axis::Latitude),
            Err(ConversionError::Degenerate(..))
        );
    }

    #[test]
    fn garbage_components() {
        for raw in &["4a07.038", "-107.038", "48+7.038", "48inf", "4807.0.3", "48.", "481e1"] {
            let err = decimal_degrees(raw, CardDir::North, Axis::Latitude).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateCoordinate, "{}", raw);
        }
    }

    #[test]
    fn out_of_range_components() {
        assert_matches!(
            decimal_degrees("9000.000", CardDir::North, Axis::Latitude),
            Err(ConversionError::Degenerate(..))
        );
        assert_matches!(
            decimal_degrees("4860.000", CardDir::North, Axis::Latitude),
            Err(ConversionError::Degenerate(..))
        );
        assert_matches!(
            decimal_degrees("18100.000", CardDir::East, Axis::Longitude),
            Err(ConversionError::Degenerate(..))
        );
    }

    #[test]
    fn antimeridian() {
        let east = convert("0000.000", CardDir::North, "18000.000", CardDir::East).unwrap();
        assert_eq!(east.longitude_deg, 180.0);
        assert_eq!(east.utm_zone_number, 1);
        let west = convert("0000.000", CardDir::North, "18000.000", CardDir::West).unwrap();
        assert_eq!(west.longitude_deg, -180.0);
        assert_eq!(west.utm_zone_number, 1);

        assert_matches!(
            decimal_degrees("18000.001", CardDir::East, Axis::Longitude),
            Err(ConversionError::Degenerate(..))
        );
        assert_matches!(
            decimal_degrees("18000.001", CardDir::West, Axis::Longitude),
            Err(ConversionError::Degenerate(..))
        );
    }

    #[test]
    fn hemisphere_must_match_axis() {
        assert_matches!(
            decimal_degrees("4807.038", CardDir::East, Axis::Latitude),
            Err(ConversionError::InvalidHemisphere(_, Axis::Latitude))
        );
        assert_matches!(
            convert("4807.038", CardDir::North, "01131.000", CardDir::South),
            Err(ConversionError::InvalidHemisphere(_, Axis::Longitude))
        );
    }

    #[test]
    fn hemisphere_codes() {
        assert_eq!(CardDir::from_code("N", Axis::Latitude).unwrap(), CardDir::North);
        assert_eq!(CardDir::from_code("W", Axis::Longitude).unwrap(), CardDir::West);
        for code in &["", "n", "X", "NN", "E"] {
            let err = CardDir::from_code(code, Axis::Latitude).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidHemisphere, "{:?}", code);
        }
        assert_matches!(
            CardDir::from_code("N", Axis::Longitude),
            Err(ConversionError::InvalidHemisphere(..))
        );
    }

    #[test]
    fn beyond_utm_band() {
        assert_matches!(
            convert("8500.000", CardDir::North, "01131.000", CardDir::East),
            Err(ConversionError::ProjectionOutOfRange(_))
        );
        assert_matches!(
            convert("8030.000", CardDir::South, "01131.000", CardDir::East),
            Err(ConversionError::ProjectionOutOfRange(_))
        );
    }

    #[test]
    fn results_stay_in_range() {
        let lats = ["0000.000", "4530.500", "7959.999", "8400.000"];
        let lons = ["00000.000", "09000.000", "17959.999"];
        for lat in &lats {
            for lon in &lons {
                for &(ld, od) in &[
                    (CardDir::North, CardDir::East),
                    (CardDir::South, CardDir::West),
                ] {
                    match convert(lat, ld, lon, od) {
                        Ok(fix) => {
                            assert!(fix.latitude_deg >= -90.0 && fix.latitude_deg <= 90.0);
                            assert!(fix.longitude_deg >= -180.0 && fix.longitude_deg <= 180.0);
                            assert!(fix.utm_zone_number >= 1 && fix.utm_zone_number <= 60);
                        }
                        Err(e) => assert_eq!(e.kind(), ErrorKind::ProjectionOutOfRange),
                    }
                }
            }
        }
    }
}
