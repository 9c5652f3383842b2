//! Hand-off of finished reports to whoever consumes them.

use serde_json;
use std::io;

use crate::err::PublishError;
use crate::report::PositionReport;

/// A sink for position reports.
pub trait Publish {
    fn publish(&mut self, report: &PositionReport) -> Result<(), PublishError>;
}

/// Keeps every report, in order.
impl Publish for Vec<PositionReport> {
    fn publish(&mut self, report: &PositionReport) -> Result<(), PublishError> {
        self.push(report.clone());
        Ok(())
    }
}

/// Writes one JSON object per line and flushes after each report.
#[derive(Debug)]
pub struct JsonLines<W> {
    out: W,
}

impl<W: io::Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        JsonLines { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Publish for JsonLines<W> {
    fn publish(&mut self, report: &PositionReport) -> Result<(), PublishError> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
