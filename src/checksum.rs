//! Verification of the `*hh` suffix of an NMEA sentence.
//!
//! The checksum is the XOR of every byte between `$` and `*`, written as two
//! hex digits.

use crate::err::ChecksumError;

/// XOR over `payload`.
#[inline]
pub fn compute(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, b| acc ^ b)
}

/// Splits `line` into the payload between `$` and `*` and the checksum digits.
/// Returns `None` for the digits if the sentence has no `*`.
pub fn split(line: &str) -> (&str, Option<&str>) {
    let body = line.trim_start_matches('$');
    match body.rfind('*') {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    }
}

/// Checks the suffix of `line` against its payload.
pub fn verify(line: &str) -> Result<(), ChecksumError> {
    let (payload, digits) = split(line);
    let digits = digits.ok_or(ChecksumError::Missing)?;
    let expected = u8::from_str_radix(digits.trim_end(), 16)?;
    let actual = compute(payload.as_bytes());
    if expected != actual {
        return Err((expected, actual).into());
    }
    Ok(())
}
