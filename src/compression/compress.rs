use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, info, log_enabled, trace, Level};

use crate::alphabet::{EOF_SYMBOL, LENGTH_FIELD_BITS, MAX_CODE_LENGTH, SYMBOL_LIMIT};
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HuffError, Result};
use crate::huffman_coding::{
    canonical_code::CanonicalCode, frequency_table::FrequencyTable, huffman::HuffmanEncoder,
};
use crate::tools::{cli::HzOpts, staged_file::StagedFile, zero_run::ZeroRunEncoder};

/// What a compression session did, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Symbols with a non-zero count, EOF included.
    pub used_symbols: usize,
    pub max_code_length: u32,
}

/*
    Compression makes two passes over the input. The first runs the bytes through the zero-run
    escape transform and counts the resulting symbols. Those counts give the code tree, which is
    reduced to its canonical form; the code lengths go out as the header. The second pass runs the
    very same transform again and writes each symbol's code, followed by EOF.
*/

/// Count the escaped symbols of the whole input, plus one EOF.
pub fn count_frequencies<R: Read>(input: R) -> Result<FrequencyTable> {
    let mut freqs = FrequencyTable::new(vec![0; SYMBOL_LIMIT])?;
    for symbol in ZeroRunEncoder::new(input) {
        freqs.increment(symbol?)?;
    }
    freqs.increment(EOF_SYMBOL)?;
    Ok(freqs)
}

/// Write the header: one 8 bit code length per symbol. Every length is checked before the first bit
/// is written.
pub fn write_code_lengths<W: Write>(canon: &CanonicalCode, bw: &mut BitWriter<W>) -> Result<()> {
    if canon.symbol_limit() != SYMBOL_LIMIT {
        return Err(HuffError::format(format!(
            "code covers {} symbols, the header holds {}",
            canon.symbol_limit(),
            SYMBOL_LIMIT
        )));
    }
    if let Some((sym, len)) = canon
        .code_lengths()
        .iter()
        .enumerate()
        .find(|&(_, &len)| len > MAX_CODE_LENGTH)
    {
        return Err(HuffError::format(format!(
            "the code for symbol {} is {} bits long, the header allows at most {}",
            sym, len, MAX_CODE_LENGTH
        )));
    }
    for &len in canon.code_lengths() {
        bw.write_bits(len, LENGTH_FIELD_BITS)?;
    }
    Ok(())
}

/// Compress everything in input to output. The input is read twice, so it must be seekable.
pub fn compress<R: Read + Seek, W: Write>(input: &mut R, output: &mut W) -> Result<CompressStats> {
    input.seek(SeekFrom::Start(0))?;
    info!("Pass 1: counting symbols");
    let freqs = count_frequencies(&mut *input)?;
    let bytes_in = input.stream_position()?;

    let tree = freqs.build_code_tree()?;
    let canon = CanonicalCode::from_tree(&tree, SYMBOL_LIMIT)?;
    // Swap in the canonical tree. Code lengths are unchanged, code values may differ.
    let code = canon.to_code_tree()?;
    debug!(
        "{} of {} symbols used, longest code is {} bits",
        freqs.used_symbols(),
        SYMBOL_LIMIT,
        canon.max_code_length()
    );
    if log_enabled!(Level::Trace) {
        trace!("Canonical code table:");
        canon.code_values()?;
    }

    let mut bw = BitWriter::new(output);
    write_code_lengths(&canon, &mut bw)?;
    trace!("Header written. Body starts at {}", bw.loc());

    info!("Pass 2: encoding {} bytes", bytes_in);
    input.seek(SeekFrom::Start(0))?;
    let mut enc = HuffmanEncoder::new(bw, code);
    for symbol in ZeroRunEncoder::new(&mut *input) {
        enc.write(symbol?)?;
    }
    enc.write(EOF_SYMBOL)?;
    let bytes_out = (enc.bit_writer().bits_written() + 7) / 8;
    enc.finish()?;

    Ok(CompressStats {
        bytes_in,
        bytes_out,
        used_symbols: freqs.used_symbols(),
        max_code_length: canon.max_code_length(),
    })
}

/// Compress a byte slice held in memory.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Compress the input file named in opts to its output file.
pub fn compress_file(opts: &HzOpts) -> Result<CompressStats> {
    let output = opts.output.as_ref().ok_or_else(|| {
        HuffError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no output file given",
        ))
    })?;
    let mut fin = BufReader::new(File::open(&opts.input)?);
    let mut staged = StagedFile::create(output, opts.force_overwrite)?;
    let stats = compress(&mut fin, &mut staged)?;
    staged.commit()?;

    info!(
        "{}: {} bytes in, {} bytes out ({:.1}%)",
        opts.input.display(),
        stats.bytes_in,
        stats.bytes_out,
        ratio(stats.bytes_out, stats.bytes_in)
    );
    Ok(stats)
}

/// Output size as a percentage of input size.
pub fn ratio(bytes_out: u64, bytes_in: u64) -> f64 {
    if bytes_in == 0 {
        0.0
    } else {
        bytes_out as f64 * 100.0 / bytes_in as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitstream::bitreader::BitReader;

    fn header_lengths(compressed: &[u8]) -> Vec<u32> {
        let mut br = BitReader::new(compressed);
        (0..SYMBOL_LIMIT)
            .map(|_| br.read_bits_no_eof(8).unwrap())
            .collect()
    }

    #[test]
    fn literal_passthrough_header_test() {
        let out = compress_bytes(&[65, 66, 67]).unwrap();
        let lengths = header_lengths(&out);
        // Only A, B, C and EOF have codes; the escapes are unused
        for (sym, &len) in lengths.iter().enumerate() {
            let used = matches!(sym, 65..=67 | 256);
            assert_eq!(len > 0, used, "symbol {}", sym);
        }
        assert!(lengths[257..].iter().all(|&l| l == 0));
        let stats = compress(&mut Cursor::new([65_u8, 66, 67]), &mut Vec::new()).unwrap();
        assert_eq!(stats.bytes_in, 3);
        assert_eq!(stats.used_symbols, 4);
        assert_eq!(stats.bytes_out as usize, out.len());
    }

    #[test]
    fn escape_symbols_counted_test() {
        let freqs = count_frequencies([0_u8, 0, 0, 0, 0].as_slice()).unwrap();
        assert_eq!(freqs.get(258).unwrap(), 1);
        assert_eq!(freqs.get(0).unwrap(), 1);
        assert_eq!(freqs.get(EOF_SYMBOL).unwrap(), 1);
        assert_eq!(freqs.used_symbols(), 3);
    }

    #[test]
    fn single_zero_counted_test() {
        let freqs = count_frequencies([0_u8].as_slice()).unwrap();
        assert_eq!(freqs.get(0).unwrap(), 1);
        assert_eq!(freqs.get(EOF_SYMBOL).unwrap(), 1);
        assert_eq!(freqs.used_symbols(), 2);
    }

    #[test]
    fn long_zero_run_header_test() {
        let lengths = header_lengths(&compress_bytes(&[0, 0, 0, 0, 0]).unwrap());
        let used: Vec<usize> = (0..SYMBOL_LIMIT).filter(|&s| lengths[s] > 0).collect();
        assert_eq!(used, vec![0, 256, 258]);
    }

    #[test]
    fn empty_input_test() {
        let out = compress_bytes(&[]).unwrap();
        // Header plus at least one byte holding the EOF code
        assert!(out.len() > SYMBOL_LIMIT);
        assert_eq!(header_lengths(&out).len(), SYMBOL_LIMIT);
    }

    #[test]
    fn header_bound_test() {
        // A complete code whose two deepest symbols need 256 bits
        let mut lengths: Vec<u32> = (1..=256).collect();
        lengths.push(256);
        lengths.resize(SYMBOL_LIMIT, 0);
        let canon = CanonicalCode::from_lengths(lengths).unwrap();
        let mut bw = BitWriter::new(Vec::new());
        assert!(matches!(
            write_code_lengths(&canon, &mut bw),
            Err(HuffError::Format(_))
        ));
        // Nothing was written before the check failed
        assert_eq!(bw.bits_written(), 0);
    }

    #[test]
    fn header_size_test() {
        let canon = CanonicalCode::from_lengths(vec![1, 1]).unwrap();
        let mut bw = BitWriter::new(Vec::new());
        assert!(matches!(
            write_code_lengths(&canon, &mut bw),
            Err(HuffError::Format(_))
        ));
    }

    #[test]
    fn ratio_test() {
        assert_eq!(ratio(50, 100), 50.0);
        assert_eq!(ratio(10, 0), 0.0);
    }
}
