#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate gga_utm;

use std::io::Cursor;
use gga_utm::reader::SentenceReader;

fuzz_target!(|data: &[u8]| {
    let reader = SentenceReader::new(Cursor::new(data));

    for line in reader {
        if let Ok(line) = line {
            let _ = gga_utm::process(&line);
            let _ = gga_utm::process_checked(&line);
        }
    }
});
