//! The sequential read, process and publish loop.
//!
//! Everything the loop needs is handed in by the caller: the byte source, the
//! report sink, the configuration and the shutdown flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::err::{DriverError, PublishError};
use crate::parser;
use crate::publish::Publish;
use crate::reader::SentenceReader;
use crate::report;

/// Default loop frequency in Hz.
pub const DEFAULT_RATE_HZ: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Iterations per second, `None` runs unpaced.
    pub rate_hz: Option<f64>,
    /// Drop sentences whose `*hh` suffix is missing or wrong.
    pub verify_checksum: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            rate_hz: Some(DEFAULT_RATE_HZ),
            verify_checksum: false,
        }
    }
}

/// Counters of one `Driver::run`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// GGA sentences seen.
    pub received: u64,
    pub published: u64,
    /// GGA sentences that failed to parse or convert.
    pub dropped: u64,
}

/// Keeps a loop at a fixed frequency.
#[derive(Debug)]
pub struct Rate {
    period: Duration,
    next: Instant,
}

impl Rate {
    /// Returns `None` unless `hz` is a positive, finite frequency.
    pub fn new(hz: f64) -> Option<Rate> {
        if !hz.is_finite() || hz <= 0.0 {
            return None;
        }
        let period = Duration::from_secs_f64(1.0 / hz);
        Some(Rate {
            period,
            next: Instant::now() + period,
        })
    }

    /// Sleeps until the end of the current period. A loop that fell behind
    /// starts a fresh period instead of trying to catch up.
    pub fn sleep(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

pub struct Driver<R, P> {
    reader: SentenceReader<R>,
    publisher: P,
    config: DriverConfig,
    rate: Option<Rate>,
}

impl<R: io::Read, P: Publish> Driver<R, P> {
    pub fn new(input: R, publisher: P, config: DriverConfig) -> Self {
        let rate = config.rate_hz.and_then(Rate::new);
        Driver {
            reader: SentenceReader::new(input),
            publisher,
            config,
            rate,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Processes lines until `shutdown` is set or the input is exhausted.
    ///
    /// Bad sentences and read timeouts are logged and skipped. Only a broken
    /// input or a failing publisher ends the loop with an error.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<Stats, DriverError> {
        let mut stats = Stats::default();

        while !shutdown.load(Ordering::Relaxed) {
            match self.reader.next() {
                None => {
                    info!("End of input reached");
                    break;
                }
                Some(Ok(line)) => self.handle(&line, &mut stats)?,
                Some(Err(e)) => {
                    if !e.is_transient() {
                        return Err(e.into());
                    }
                    debug!("Skipping input: {}", e);
                }
            }

            if let Some(rate) = self.rate.as_mut() {
                rate.sleep();
            }
        }

        Ok(stats)
    }

    fn handle(&mut self, line: &str, stats: &mut Stats) -> Result<(), PublishError> {
        if !parser::is_gga(line) {
            trace!("Ignoring {}", line);
            return Ok(());
        }

        info!("Received: {}", line);
        stats.received += 1;

        let result = if self.config.verify_checksum {
            report::process_checked(line)
        } else {
            report::process(line)
        };

        match result {
            Ok(report) => {
                self.publisher.publish(&report)?;
                stats.published += 1;
                info!("Published: {:?}", report);
            }
            Err(e) => {
                stats.dropped += 1;
                warn!("Error processing sentence ({:?}): {}", e.kind(), e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::ReadError;
    use crate::report::PositionReport;
    use std::io::Cursor;

    const STREAM: &str = "\
$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39\r\n\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n\
$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n\
$GPGGA,123520,4807.038,X,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n\
$GPGGA,123521,4807.038\r\n\
$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n";

    fn unpaced() -> DriverConfig {
        DriverConfig {
            rate_hz: None,
            ..DriverConfig::default()
        }
    }

    #[test]
    fn default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.rate_hz, Some(10.0));
        assert!(!config.verify_checksum);
    }

    #[test]
    fn mixed_stream() {
        let mut driver = Driver::new(Cursor::new(STREAM), Vec::<PositionReport>::new(), unpaced());
        let stats = driver.run(&AtomicBool::new(false)).unwrap();

        assert_eq!(
            stats,
            Stats {
                received: 4,
                published: 2,
                dropped: 2,
            }
        );
        let reports: &Vec<PositionReport> = driver.publisher();
        assert_eq!(reports[0].zone, 32);
        assert_eq!(reports[1].zone, 29);
        assert!(reports[1].longitude < 0.0);
    }

    #[test]
    fn checksum_verification() {
        let input = "\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\n\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*00\n\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,\n";
        let config = DriverConfig {
            verify_checksum: true,
            ..unpaced()
        };
        let mut driver = Driver::new(Cursor::new(input), Vec::<PositionReport>::new(), config);
        let stats = driver.run(&AtomicBool::new(false)).unwrap();
        assert_eq!(stats.published, 1);
        assert_eq!(stats.dropped, 2);

        let mut lenient = Driver::new(Cursor::new(input), Vec::<PositionReport>::new(), unpaced());
        assert_eq!(lenient.run(&AtomicBool::new(false)).unwrap().published, 3);
    }

    #[test]
    fn shutdown_flag() {
        let mut driver = Driver::new(Cursor::new(STREAM), Vec::<PositionReport>::new(), unpaced());
        let stats = driver.run(&AtomicBool::new(true)).unwrap();
        assert_eq!(stats, Stats::default());
        assert!(driver.publisher().is_empty());
    }

    struct Unplugged;

    impl io::Read for Unplugged {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device disconnected"))
        }
    }

    #[test]
    fn lost_input_is_fatal() {
        let mut driver = Driver::new(Unplugged, Vec::<PositionReport>::new(), unpaced());
        assert_matches!(
            driver.run(&AtomicBool::new(false)),
            Err(DriverError::Read(ReadError::Io(_)))
        );
    }

    struct Refusing;

    impl Publish for Refusing {
        fn publish(&mut self, _: &PositionReport) -> Result<(), PublishError> {
            Err(PublishError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
        }
    }

    #[test]
    fn lost_publisher_is_fatal() {
        let mut driver = Driver::new(Cursor::new(STREAM), Refusing, unpaced());
        assert_matches!(
            driver.run(&AtomicBool::new(false)),
            Err(DriverError::Publish(PublishError::Io(_)))
        );
    }

    #[test]
    fn rate() {
        assert!(Rate::new(0.0).is_none());
        assert!(Rate::new(-1.0).is_none());
        assert!(Rate::new(std::f64::INFINITY).is_none());

        let start = Instant::now();
        let mut rate = Rate::new(100.0).unwrap();
        rate.sleep();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
