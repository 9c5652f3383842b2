//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Forward projection only, using the series expansion of the transverse
//! Mercator that is accurate to well below a millimetre inside a zone.

use std::f64::consts::PI;

use crate::err::ConversionError;

/// Scale factor on the central meridian.
pub const K0: f64 = 0.9996;
/// Southern edge of the UTM latitude bands.
pub const MIN_LAT: f64 = -80.0;
/// Northern edge of the UTM latitude bands.
pub const MAX_LAT: f64 = 84.0;

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const E2: f64 = FLATTENING * (2.0 - FLATTENING);
const E4: f64 = E2 * E2;
const E6: f64 = E4 * E2;
const E_P2: f64 = E2 / (1.0 - E2);

// meridian arc coefficients
const M1: f64 = 1.0 - E2 / 4.0 - 3.0 * E4 / 64.0 - 5.0 * E6 / 256.0;
const M2: f64 = 3.0 * E2 / 8.0 + 3.0 * E4 / 32.0 + 45.0 * E6 / 1024.0;
const M3: f64 = 15.0 * E4 / 256.0 + 45.0 * E6 / 1024.0;
const M4: f64 = 35.0 * E6 / 3072.0;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude band letters from 80°S upwards, 8° each. `X` spans 72°N to 84°N
/// and is listed twice so that 84°N still maps into it.
const ZONE_LETTERS: &[u8; 21] = b"CDEFGHJKLMNPQRSTUVWXX";

/// A projected position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoord {
    pub easting: f64,
    pub northing: f64,
    pub zone_number: u8,
    pub zone_letter: char,
}

/// Projects `lat`/`lon` (decimal degrees) into UTM.
/// Returns `ConversionError::ProjectionOutOfRange` outside of `MIN_LAT..=MAX_LAT`.
pub fn from_latlon(lat: f64, lon: f64) -> Result<UtmCoord, ConversionError> {
    let zone_letter = zone_letter(lat).ok_or(ConversionError::ProjectionOutOfRange(lat))?;
    let zone_number = zone_number(lat, lon);

    let lat_rad = lat.to_radians();
    let (lat_sin, lat_cos) = lat_rad.sin_cos();
    let lat_tan = lat_rad.tan();
    let lat_tan2 = lat_tan * lat_tan;
    let lat_tan4 = lat_tan2 * lat_tan2;

    let central_lon_rad = central_meridian(zone_number).to_radians();

    let n = SEMI_MAJOR_AXIS / (1.0 - E2 * lat_sin * lat_sin).sqrt();
    let c = E_P2 * lat_cos * lat_cos;
    let a = lat_cos * wrap_angle(lon.to_radians() - central_lon_rad);
    let m = SEMI_MAJOR_AXIS
        * (M1 * lat_rad - M2 * (2.0 * lat_rad).sin() + M3 * (4.0 * lat_rad).sin()
            - M4 * (6.0 * lat_rad).sin());

    let easting = FALSE_EASTING
        + K0 * n
            * (a + a.powi(3) / 6.0 * (1.0 - lat_tan2 + c)
                + a.powi(5) / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * E_P2));

    let mut northing = K0
        * (m + n
            * lat_tan
            * (a * a / 2.0
                + a.powi(4) / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                + a.powi(6) / 720.0
                    * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * E_P2)));
    if lat < 0.0 {
        northing += FALSE_NORTHING_SOUTH;
    }

    Ok(UtmCoord {
        easting,
        northing,
        zone_number,
        zone_letter,
    })
}

/// Zone number for a position, 6° wide zones counted eastwards from 180°W.
///
/// The latitude is needed for the widened zone 32V over south-western Norway
/// and the zones 31X to 37X around Svalbard.
pub fn zone_number(lat: f64, lon: f64) -> u8 {
    let lon = normalize_longitude(lon);

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    if (72.0..=MAX_LAT).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }

    // lon is in [-180, 180) so this is 1..=60
    ((lon + 180.0) / 6.0).floor() as u8 + 1
}

/// Latitude band letter, `None` outside of the UTM bands.
pub fn zone_letter(lat: f64) -> Option<char> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return None;
    }
    let band = ((lat - MIN_LAT) as usize) >> 3;
    ZONE_LETTERS.get(band).map(|&l| l as char)
}

/// Longitude of the central meridian of `zone` in degrees.
#[inline]
pub fn central_meridian(zone: u8) -> f64 {
    f64::from(zone - 1) * 6.0 - 180.0 + 3.0
}

/// Maps `lon` into `[-180, 180)`.
#[inline]
fn normalize_longitude(lon: f64) -> f64 {
    let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid rounds up to 360 for inputs a hair below -180
    if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

#[inline]
fn wrap_angle(rad: f64) -> f64 {
    (rad + PI).rem_euclid(2.0 * PI) - PI
}
