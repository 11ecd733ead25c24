//! The tools module provides several helper functions for huffzip.
//!
//! The tools are:
//! - cli: Command line interface and options.
//! - staged_file: Output files that only appear once they are complete.
//! - zero_run: The zero-run escape transform, applied identically in both compression passes and
//!   inverted during decompression.
//!
pub mod cli;
pub mod staged_file;
pub mod zero_run;
