use arrayvec::ArrayVec;
use std::io;

use crate::err::ReadError;

/// Longest line that is buffered. NMEA 0183 limits a sentence to 82
/// characters including the line ending.
pub const LINE_CAPACITY: usize = 128;

/// Splits a byte stream into trimmed, non-empty ASCII lines.
///
/// A read error does not lose the partially buffered line, so iteration can
/// continue after a serial read timeout.
pub struct SentenceReader<R> {
    input: io::Bytes<R>,
    buf: ArrayVec<u8, LINE_CAPACITY>,
    // set while the remainder of an overlong line is skipped
    discarding: bool,
}

impl<R: io::Read> SentenceReader<R> {
    pub fn new(input: R) -> Self {
        SentenceReader {
            input: input.bytes(),
            buf: ArrayVec::new(),
            discarding: false,
        }
    }

    /// Turns the buffered bytes into a line and clears the buffer.
    /// Returns `None` for lines that are blank after trimming.
    fn take_line(&mut self) -> Option<Result<String, ReadError>> {
        let result = match self.buf.iter().find(|c| !c.is_ascii()) {
            Some(&c) => Some(Err(ReadError::from(c))),
            None => {
                // we know we only have valid ascii characters
                let line: String = self.buf.iter().map(|&c| c as char).collect();
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(Ok(line.to_owned()))
                }
            }
        };
        self.buf.clear();
        result
    }
}

impl<R: io::Read> Iterator for SentenceReader<R> {
    type Item = Result<String, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match try_some!(self.input.next().transpose()) {
                None => {
                    // EOF, hand out an unterminated last line
                    if self.discarding {
                        self.discarding = false;
                        self.buf.clear();
                        return None;
                    }
                    return self.take_line();
                }
                Some(b'\n') => {
                    if self.discarding {
                        self.discarding = false;
                        self.buf.clear();
                        continue;
                    }
                    if let Some(line) = self.take_line() {
                        return Some(line);
                    }
                }
                Some(_) if self.discarding => (),
                Some(c) => {
                    if let Err(e) = self.buf.try_push(c) {
                        self.discarding = true;
                        self.buf.clear();
                        return Some(Err((e, LINE_CAPACITY).into()));
                    }
                }
            }
        }
    }
}
