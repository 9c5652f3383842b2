extern crate clap;
extern crate env_logger;
extern crate gga_utm;
#[macro_use]
extern crate log;
extern crate serialport;

use clap::Parser;
use std::io::{self, BufReader};
use std::process;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gga_utm::driver::{Driver, DriverConfig, DEFAULT_RATE_HZ};
use gga_utm::publish::JsonLines;

/// Reads GGA sentences from a GPS receiver and prints position reports with
/// their UTM projection as JSON lines.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Serial port of the GPS receiver (e.g. /dev/ttyUSB0)
    #[arg(long)]
    port: String,

    #[arg(long, default_value_t = 4800)]
    baud: u32,

    /// Read timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Loop frequency in Hz, 0 disables pacing
    #[arg(long, default_value_t = DEFAULT_RATE_HZ)]
    rate: f64,

    /// Drop sentences with a missing or wrong checksum
    #[arg(long)]
    verify_checksum: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let port = match serialport::new(args.port.as_str(), args.baud)
        .timeout(Duration::from_millis(args.timeout_ms))
        .open()
    {
        Ok(port) => {
            info!("Connected to GPS device on {}", args.port);
            port
        }
        Err(e) => {
            error!("Failed to open serial port {}: {}", args.port, e);
            process::exit(1);
        }
    };

    let config = DriverConfig {
        rate_hz: if args.rate > 0.0 { Some(args.rate) } else { None },
        verify_checksum: args.verify_checksum,
    };
    let stdout = io::stdout();
    let mut driver = Driver::new(BufReader::new(port), JsonLines::new(stdout.lock()), config);

    // never set, the process ends on a signal or when the port goes away
    let shutdown = AtomicBool::new(false);
    match driver.run(&shutdown) {
        Ok(stats) => info!(
            "Serial connection closed, published {} of {} sentences",
            stats.published, stats.received
        ),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
