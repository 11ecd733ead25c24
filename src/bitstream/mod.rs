//! The bitstream module forms the I/O subsystem for huffzip.
//!
//! Bits are packed most significant bit first. The writer pads the final partial byte with zero bits
//! when the session is finished; the reader hands back `None` once the underlying source runs dry, and
//! offers `read_no_eof` for fields that must be present.
//!
pub mod bitreader;
pub mod bitwriter;
