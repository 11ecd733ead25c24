use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use log::{info, trace};

use crate::alphabet::{EOF_SYMBOL, LENGTH_FIELD_BITS, SYMBOL_LIMIT};
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::{canonical_code::CanonicalCode, huffman::HuffmanDecoder};
use crate::tools::{cli::HzOpts, staged_file::StagedFile, zero_run::ZeroRunDecoder};

/// Read the header: one 8 bit code length per symbol. Running out of data here is always an error.
pub fn read_code_lengths<R: Read>(br: &mut BitReader<R>) -> Result<Vec<u32>> {
    (0..SYMBOL_LIMIT)
        .map(|_| br.read_bits_no_eof(LENGTH_FIELD_BITS))
        .collect()
}

/// Decompress input into output, returning the number of bytes written. Decoding stops at the EOF
/// symbol; padding bits (and anything after them) are ignored.
pub fn decompress<R: Read, W: Write>(input: R, output: &mut W) -> Result<u64> {
    let mut br = BitReader::new(input);
    let lengths = read_code_lengths(&mut br)?;
    let canon = CanonicalCode::from_lengths(lengths)?;
    let code = canon.to_code_tree()?;
    if !code.contains(EOF_SYMBOL) {
        return Err(HuffError::format("header gives the end of stream symbol no code"));
    }
    trace!("Header read. Body starts at {}", br.loc());

    let mut dec = HuffmanDecoder::new(br, code);
    let mut out = ZeroRunDecoder::new(BufWriter::new(output));
    loop {
        let symbol = dec.read()?;
        if symbol == EOF_SYMBOL {
            break;
        }
        out.write_symbol(symbol)?;
    }
    trace!("End of stream found at {}", dec.bit_reader().loc());

    let bytes_out = out.bytes_out();
    out.into_inner().flush()?;
    Ok(bytes_out)
}

/// Decompress a byte slice held in memory.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}

/// Decompress the input file named in opts to its output file.
pub fn decompress_file(opts: &HzOpts) -> Result<u64> {
    let output = opts.output.as_ref().ok_or_else(|| {
        HuffError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no output file given",
        ))
    })?;
    let fin = File::open(&opts.input)?;
    let mut staged = StagedFile::create(output, opts.force_overwrite)?;
    let bytes_out = decompress(fin, &mut staged)?;
    staged.commit()?;
    info!(
        "{}: restored {} bytes to {}",
        opts.input.display(),
        bytes_out,
        output.display()
    );
    Ok(bytes_out)
}

/// Decode the input file named in opts without writing anything, to check its integrity.
pub fn test_file(opts: &HzOpts) -> Result<u64> {
    let fin = File::open(&opts.input)?;
    let bytes_out = decompress(fin, &mut io::sink())?;
    info!("{}: ok, {} bytes", opts.input.display(), bytes_out);
    Ok(bytes_out)
}
