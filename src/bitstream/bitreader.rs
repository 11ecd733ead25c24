//! BitReader: reads a packed bitstream, most significant bit first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!

use std::io::{ErrorKind, Read};

use crate::error::{HuffError, Result};

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;
const EOF_MESSAGE: &str = "unexpected end of stream";

/// Reads a huffzip compressed stream one bit at a time.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    /// Bytes consumed from the source before the current buffer.
    consumed: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            bit_index: 0,
            consumed: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> Result<bool> {
        // Only try to read more data when the cursor has moved past the end of the buffer
        if self.cursor < self.buffer.len() {
            return Ok(true);
        }
        self.consumed += self.buffer.len() as u64;
        self.buffer.resize(BUFFER_SIZE, 0);
        let size = loop {
            match self.source.read(&mut self.buffer) {
                Ok(size) => break size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.clear();
                    self.cursor = 0;
                    return Err(e.into());
                }
            }
        };
        // Adjust the buffer if we read less than the buffer size
        self.buffer.truncate(size);
        self.cursor = 0;
        self.bit_index = 0;
        Ok(size > 0)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read
    pub fn read_bit(&mut self) -> Result<Option<u8>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Ok(Some(bit))
    }

    /// Return the next bit, treating the end of the stream as a format error.
    pub fn read_no_eof(&mut self) -> Result<u8> {
        self.read_bit()?
            .ok_or_else(|| HuffError::format(EOF_MESSAGE))
    }

    /// Return the next n bits (n <= 32) as a number, most significant bit first.
    pub fn read_bits_no_eof(&mut self, n: u8) -> Result<u32> {
        if n > 32 {
            return Err(HuffError::range(format!("cannot read {} bits into a u32", n)));
        }
        let mut result = 0_u32;
        for _ in 0..n {
            result = (result << 1) | self.read_no_eof()? as u32;
        }
        Ok(result)
    }

    /// Debugging function. Report current position in the stream as bytes.bits.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.consumed + self.cursor as u64, self.bit_index)
    }
}
