#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
extern crate chrono;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;
extern crate serde;
extern crate serde_json;

pub mod err;
#[macro_use]
mod macros;
pub mod checksum;
pub mod coord;
pub mod driver;
pub mod parser;
pub mod publish;
pub mod reader;
pub mod report;
pub mod utm;

pub use coord::{convert, Axis, CardDir, GeoFix};
pub use driver::{Driver, DriverConfig, Stats};
pub use err::{ConversionError, Error, ErrorKind, ParseError};
pub use parser::{is_gga, parse, RawFix};
pub use publish::{JsonLines, Publish};
pub use report::{build, process, process_checked, PositionReport};
