//! Zero-run escape transform.
//!
//! Runs of zero bytes are rewritten as one symbol per set bit of the run length: bit 0 becomes the
//! literal zero symbol, bit i (i >= 1) becomes escape symbol 256 + i, emitted from the most significant
//! bit down. A run of one is just the literal zero. Non-zero bytes pass through unchanged.
//!
//! The encoder is an iterator over the input bytes, so the frequency pass and the encoding pass see
//! exactly the same symbol stream.

use std::collections::VecDeque;
use std::io::{self, BufReader, Bytes, Read, Write};

use crate::alphabet::{escape_exponent, escape_symbol, EOF_SYMBOL, SYMBOL_LIMIT};
use crate::error::{HuffError, Result};

/// Returns the symbols standing for a run of run_length zero bytes, most significant bit first.
pub fn run_symbols(run_length: u64) -> Result<Vec<u16>> {
    let mut symbols = Vec::with_capacity(run_length.count_ones() as usize);
    let mut remaining = run_length;
    while remaining != 0 {
        // Largest power of two that still fits
        let exponent = 63 - remaining.leading_zeros();
        symbols.push(escape_symbol(exponent)?);
        remaining -= 1 << exponent;
    }
    Ok(symbols)
}

/// Iterator that reads bytes and yields alphabet symbols with zero runs escaped. The EOF symbol is not
/// produced; the caller appends it.
pub struct ZeroRunEncoder<R> {
    source: Bytes<BufReader<R>>,
    /// Symbols decided but not yet handed out.
    pending: VecDeque<u16>,
    /// Length of the zero run in progress.
    run: u64,
    data_gone: bool,
}

impl<R: Read> ZeroRunEncoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            source: BufReader::new(source).bytes(),
            pending: VecDeque::with_capacity(70),
            run: 0,
            data_gone: false,
        }
    }

    /// Close out the current zero run, queueing its symbols.
    fn end_run(&mut self) -> Result<()> {
        if self.run > 0 {
            self.pending.extend(run_symbols(self.run)?);
            self.run = 0;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for ZeroRunEncoder<R> {
    type Item = Result<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(symbol) = self.pending.pop_front() {
                return Some(Ok(symbol));
            }
            if self.data_gone {
                return None;
            }
            let step = match self.source.next() {
                None => {
                    self.data_gone = true;
                    self.end_run()
                }
                Some(Err(e)) => {
                    self.data_gone = true;
                    Err(e.into())
                }
                Some(Ok(0)) => match self.run.checked_add(1) {
                    Some(run) => {
                        self.run = run;
                        Ok(())
                    }
                    None => Err(HuffError::range("zero run is too long to count")),
                },
                Some(Ok(byte)) => self.end_run().map(|_| self.pending.push_back(byte as u16)),
            };
            if let Err(e) = step {
                self.data_gone = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Number of zero bytes an escape symbol stands for.
pub fn zero_run_length(symbol: u16) -> Result<u64> {
    let exponent = escape_exponent(symbol)
        .ok_or_else(|| HuffError::range(format!("symbol {} is not a zero-run escape", symbol)))?;
    1_u64.checked_shl(exponent).ok_or_else(|| {
        HuffError::range(format!(
            "escape symbol {} stands for 2^{} zero bytes, more than can be written",
            symbol, exponent
        ))
    })
}

/// Writes decoded symbols as bytes, expanding zero-run escapes.
pub struct ZeroRunDecoder<W> {
    writer: W,
    bytes_out: u64,
}

impl<W: Write> ZeroRunDecoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_out: 0,
        }
    }

    /// Write one decoded symbol. The EOF symbol is not data and is rejected.
    pub fn write_symbol(&mut self, symbol: u16) -> Result<()> {
        match symbol {
            0..=255 => {
                self.writer.write_all(&[symbol as u8])?;
                self.bytes_out += 1;
            }
            EOF_SYMBOL => {
                return Err(HuffError::range("end of stream symbol has no byte value"));
            }
            _ if (symbol as usize) < SYMBOL_LIMIT => {
                let run = zero_run_length(symbol)?;
                let written = io::copy(&mut io::repeat(0).take(run), &mut self.writer)?;
                self.bytes_out += written;
            }
            _ => {
                return Err(HuffError::range(format!(
                    "symbol {} is outside the alphabet",
                    symbol
                )));
            }
        }
        Ok(())
    }

    /// Total bytes written so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
