use std::io::Write;

use log::trace;

use crate::error::{HuffError, Result};

/// Writes single bits to a byte oriented sink, most significant bit first.
pub struct BitWriter<W> {
    /// Handle to the output stream
    writer: W,
    /// Bits waiting to be written, aligned to the least significant end.
    current_byte: u8,
    /// Count of valid bits in current_byte (0-7).
    bits_filled: u8,
    /// Count of whole bytes handed to the writer so far.
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter on top of any sink. Call finish() once all bits are written or the
    /// last partial byte is lost.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            current_byte: 0,
            bits_filled: 0,
            bytes_written: 0,
        }
    }

    /// Write one bit (0 or 1).
    pub fn write(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(HuffError::range(format!("bit value must be 0 or 1, got {}", bit)));
        }
        self.current_byte = self.current_byte << 1 | bit;
        self.bits_filled += 1;
        if self.bits_filled == 8 {
            self.writer.write_all(&[self.current_byte])?;
            self.bytes_written += 1;
            self.current_byte = 0;
            self.bits_filled = 0;
        }
        Ok(())
    }

    /// Write the low `count` bits of value, most significant first. Used for fixed width fields.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count > 32 {
            return Err(HuffError::range(format!("cannot write {} bits from a u32", count)));
        }
        for shift in (0..count).rev() {
            self.write(((value >> shift) & 1) as u8)?;
        }
        Ok(())
    }

    /// Number of complete bytes written so far, not counting any pending partial byte.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of bits written so far, including any pending partial byte.
    pub fn bits_written(&self) -> u64 {
        self.bytes_written * 8 + self.bits_filled as u64
    }

    /// Pads the remaining bits (1-7) with 0s in the least significant bits, flushes the sink and
    /// hands it back.
    pub fn finish(mut self) -> Result<W> {
        if self.bits_filled > 0 {
            let padding = 8 - self.bits_filled;
            trace!("Padding final byte with {} zero bits", padding);
            let byte = self.current_byte << padding;
            self.writer.write_all(&[byte])?;
            self.bytes_written += 1;
            self.current_byte = 0;
            self.bits_filled = 0;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bytes_written, self.bits_filled)
    }
}
