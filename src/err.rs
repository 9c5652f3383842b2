use arrayvec::CapacityError;
use serde_json;
use std::{io, num};

use crate::coord::Axis;
use crate::parser::GGA_FIELD_COUNT;

/// Coarse classification of everything that can make a single sentence fail.
///
/// Every per-sentence error exposes its kind through `kind()`, so callers can
/// branch on the failure without matching on nested variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedSentence,
    FieldConversion,
    InvalidHemisphere,
    DegenerateCoordinate,
    ProjectionOutOfRange,
    Checksum,
}

quick_error! {
    #[derive(Debug)]
    pub enum ParseError {
        UnexpectedSentenceType(id: String) {
            description("Sentence type has wrong format")
            display("Encountered unexpected sentence type \"{}\"", id)
        }
        Malformed(fields: usize) {
            description("Malformed sentence")
            display("Expected at least {} fields, found {}", GGA_FIELD_COUNT, fields)
        }
        FieldConversion(field: &'static str, err: num::ParseFloatError) {
            description("Field conversion error")
            display("Could not convert field {}: {}", field, err)
            cause(err)
        }
        /// Non-finite numbers such as `nan` or `inf` that `f64::from_str` accepts.
        NonFinite(field: &'static str, raw: String) {
            description("Field is not a finite number")
            display("Field {} is not a finite number: \"{}\"", field, raw)
        }
        /// A `hhmmss.ss` value outside of the clock, e.g. minute 60, hour 24 or a
        /// second 60 anywhere but 23:59:60. Reported with kind `FieldConversion`.
        InvalidTime(raw: String) {
            description("Invalid time of day")
            display("Field utc does not denote a time of day: \"{}\"", raw)
        }
        Hemisphere(err: ConversionError) {
            from()
            display("{}", err)
            cause(err)
        }
    }
}

// Quick error can't handle from for tuples
impl From<(&'static str, num::ParseFloatError)> for ParseError {
    fn from((field, e): (&'static str, num::ParseFloatError)) -> Self {
        ParseError::FieldConversion(field, e)
    }
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnexpectedSentenceType(_) | ParseError::Malformed(_) => {
                ErrorKind::MalformedSentence
            }
            ParseError::FieldConversion(..)
            | ParseError::NonFinite(..)
            | ParseError::InvalidTime(_) => {
                ErrorKind::FieldConversion
            }
            ParseError::Hemisphere(err) => err.kind(),
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum ConversionError {
        InvalidHemisphere(code: String, axis: Axis) {
            description("Invalid hemisphere")
            display("\"{}\" is not a hemisphere of the {}", code, axis)
        }
        Degenerate(raw: String, reason: &'static str) {
            description("Degenerate coordinate")
            display("Could not decode coordinate \"{}\": {}", raw, reason)
        }
        ProjectionOutOfRange(lat: f64) {
            description("Projection out of range")
            display("Latitude {} lies outside of the UTM band [-80, 84]", lat)
        }
    }
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::InvalidHemisphere(..) => ErrorKind::InvalidHemisphere,
            ConversionError::Degenerate(..) => ErrorKind::DegenerateCoordinate,
            ConversionError::ProjectionOutOfRange(_) => ErrorKind::ProjectionOutOfRange,
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum ChecksumError {
        Missing {
            description("Missing checksum")
            display("Sentence carries no \"*hh\" checksum suffix")
        }
        Int(err: num::ParseIntError) {
            from()
            display("Checksum is not a hex number: {}", err)
            cause(err)
        }
        Mismatch(expected: u8, actual: u8) {
            description("Invalid checksum")
            display("Expected checksum \"{:02X}\", computed checksum \"{:02X}\"", expected, actual)
        }
    }
}

impl From<(u8, u8)> for ChecksumError {
    fn from((expected, actual): (u8, u8)) -> Self {
        ChecksumError::Mismatch(expected, actual)
    }
}

quick_error! {
    /// Failure of the full parse, convert and build pipeline for one sentence.
    #[derive(Debug)]
    pub enum Error {
        Parse(err: ParseError) {
            from()
            display("Could not parse sentence: {}", err)
            cause(err)
        }
        Conversion(err: ConversionError) {
            from()
            display("Could not convert coordinates: {}", err)
            cause(err)
        }
        Checksum(err: ChecksumError) {
            from()
            display("Checksum verification failed: {}", err)
            cause(err)
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(err) => err.kind(),
            Error::Conversion(err) => err.kind(),
            Error::Checksum(_) => ErrorKind::Checksum,
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum ReadError {
        Io(err: io::Error) {
            from()
            display("Encountered I/O error while reading: {}", err)
            cause(err)
        }
        LineTooLong(err: CapacityError<u8>, capacity: usize) {
            description("Line too long")
            display("Tried to push more than {} characters into the line buffer: {}", capacity, err)
        }
        InvalidCharacter(c: u8) {
            from()
            description("Invalid character")
            display("Encountered non-ASCII byte 0x{:02X}", c)
        }
    }
}

impl From<(CapacityError<u8>, usize)> for ReadError {
    fn from((e, cap): (CapacityError<u8>, usize)) -> Self {
        ReadError::LineTooLong(e, cap)
    }
}

impl ReadError {
    /// Whether the reader can simply be polled again after this error.
    ///
    /// Serial ports report a read timeout when the receiver is silent, which
    /// is not a reason to stop the driver.
    pub fn is_transient(&self) -> bool {
        match self {
            ReadError::Io(err) => match err.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                    true
                }
                _ => false,
            },
            ReadError::LineTooLong(..) | ReadError::InvalidCharacter(_) => true,
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum PublishError {
        Io(err: io::Error) {
            from()
            display("Could not write report: {}", err)
            cause(err)
        }
        Json(err: serde_json::Error) {
            from()
            display("Could not serialize report: {}", err)
            cause(err)
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum DriverError {
        Read(err: ReadError) {
            from()
            display("Lost the sentence source: {}", err)
            cause(err)
        }
        Publish(err: PublishError) {
            from()
            display("Lost the report sink: {}", err)
            cause(err)
        }
    }
}
