//! The extended alphabet shared by the encoder and decoder.
//!
//! - 0..=255: literal byte values. Symbol 0 doubles as the "one zero byte" escape.
//! - 256: end of stream.
//! - 257..=321: zero-run escapes, where symbol 256 + i stands for 2^i zero bytes.

use crate::error::{HuffError, Result};

/// Number of symbols in the alphabet (and entries in the file header).
pub const SYMBOL_LIMIT: usize = 322;
/// End of stream marker.
pub const EOF_SYMBOL: u16 = 256;
/// Escape symbols are numbered from this base plus the exponent.
pub const ESCAPE_BASE: u16 = 256;
/// Largest exponent an escape symbol can carry.
pub const MAX_EXPONENT: u32 = 65;
/// Width of each code length field in the header.
pub const LENGTH_FIELD_BITS: u8 = 8;
/// Longest code length the header can describe.
pub const MAX_CODE_LENGTH: u32 = (1 << LENGTH_FIELD_BITS) - 1;

/// Returns the symbol standing for a run of 2^exponent zero bytes.
pub fn escape_symbol(exponent: u32) -> Result<u16> {
    match exponent {
        0 => Ok(0),
        1..=MAX_EXPONENT => Ok(ESCAPE_BASE + exponent as u16),
        _ => Err(HuffError::range(format!(
            "zero run needs escape exponent {}, the maximum is {}",
            exponent, MAX_EXPONENT
        ))),
    }
}

/// Returns the exponent carried by an escape symbol, or None for literals and EOF.
pub fn escape_exponent(symbol: u16) -> Option<u32> {
    if symbol > ESCAPE_BASE && (symbol as usize) < SYMBOL_LIMIT {
        Some((symbol - ESCAPE_BASE) as u32)
    } else {
        None
    }
}
