use std::io::{Read, Write};

use super::code_tree::{CodeTree, Node};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{HuffError, Result};

/// Encodes symbols onto a bit stream using a code tree.
pub struct HuffmanEncoder<W> {
    output: BitWriter<W>,
    code_tree: CodeTree,
}

impl<W: Write> HuffmanEncoder<W> {
    pub fn new(output: BitWriter<W>, code_tree: CodeTree) -> Self {
        Self { output, code_tree }
    }

    /// Write the code for one symbol, most significant bit first.
    pub fn write(&mut self, symbol: u16) -> Result<()> {
        for &bit in self.code_tree.code(symbol)? {
            self.output.write(bit)?;
        }
        Ok(())
    }

    pub fn bit_writer(&self) -> &BitWriter<W> {
        &self.output
    }

    /// Pad and flush the last byte, returning the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.output.finish()
    }
}

/// Decodes symbols from a bit stream by walking a code tree.
pub struct HuffmanDecoder<R> {
    input: BitReader<R>,
    code_tree: CodeTree,
}

impl<R: Read> HuffmanDecoder<R> {
    pub fn new(input: BitReader<R>, code_tree: CodeTree) -> Self {
        Self { input, code_tree }
    }

    /// Read one symbol, walking from the root: 0 goes left, 1 goes right.
    pub fn read(&mut self) -> Result<u16> {
        let mut node = self.code_tree.root();
        loop {
            match node {
                Node::Leaf(symbol) => return Ok(*symbol),
                Node::Kids(left, right) => {
                    node = match self.input.read_no_eof()? {
                        0 => &**left,
                        _ => &**right,
                    };
                }
            }
        }
    }

    pub fn bit_reader(&self) -> &BitReader<R> {
        &self.input
    }
}

#[cfg(test)]
mod test {
    use super::{HuffmanDecoder, HuffmanEncoder};
    use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
    use crate::error::HuffError;
    use crate::huffman_coding::canonical_code::CanonicalCode;

    fn tree() -> crate::huffman_coding::code_tree::CodeTree {
        // 1 -> 0, 0 -> 10, 2 -> 110, 3 -> 111
        CanonicalCode::from_lengths(vec![2, 1, 3, 3, 0])
            .unwrap()
            .to_code_tree()
            .unwrap()
    }

    #[test]
    fn encode_test() {
        let mut enc = HuffmanEncoder::new(BitWriter::new(Vec::new()), tree());
        for sym in [1, 0, 2, 3] {
            enc.write(sym).unwrap();
        }
        let out = enc.finish().unwrap();
        assert_eq!(out, vec![0b0101_1011, 0b1000_0000]);
    }

    #[test]
    fn missing_code_test() {
        let mut enc = HuffmanEncoder::new(BitWriter::new(Vec::new()), tree());
        assert!(matches!(enc.write(4), Err(HuffError::Range(_))));
        assert!(matches!(enc.write(9), Err(HuffError::Range(_))));
    }

    #[test]
    fn decode_test() {
        let data = [0b0101_1011_u8, 0b1000_0000];
        let mut dec = HuffmanDecoder::new(BitReader::new(data.as_slice()), tree());
        assert_eq!(dec.read().unwrap(), 1);
        assert_eq!(dec.read().unwrap(), 0);
        assert_eq!(dec.read().unwrap(), 2);
        assert_eq!(dec.read().unwrap(), 3);
        // Padding bits decode as symbol 1 (code 0), then the stream ends
        for _ in 0..7 {
            assert_eq!(dec.read().unwrap(), 1);
        }
        assert!(matches!(dec.read(), Err(HuffError::Format(_))));
    }

    #[test]
    fn truncated_mid_symbol_test() {
        // 1111_1111 = 111 111 11 -> 3, 3, then runs out inside a code
        let data = [0b1111_1111_u8];
        let mut dec = HuffmanDecoder::new(BitReader::new(data.as_slice()), tree());
        assert_eq!(dec.read().unwrap(), 3);
        assert_eq!(dec.read().unwrap(), 3);
        assert!(matches!(dec.read(), Err(HuffError::Format(_))));
    }
}
