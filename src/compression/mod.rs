//! The compression module drives whole encode and decode runs.
//!
//! A grin file is laid out as:
//! - Magic: 32 bits, `MAGIC`, most significant bit first.
//! - Tree: the huffman tree in preorder (see `HuffmanTree::serialize`).
//! - Payload: one code per input byte, then the end-of-stream code. The last byte is padded
//!   with zero bits, which the decoder never reads.
//!
//! Encoding reads the input twice: once to count byte frequencies, once to write the codes.
//! Decoding checks the magic and reads the tree before it creates any output.
//!

use std::fs;
use std::path::Path;

use crate::error::{GrinError, Result};

pub mod compress;
pub mod decompress;

/// Identifies a grin file.
pub const MAGIC: u32 = 0x736;
/// Width of the magic header.
pub const MAGIC_BITS: usize = 32;

/// Refuse a run whose output names the input file, since creating the output would truncate
/// the input before it is read. An output that does not exist yet is always distinct.
pub fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    let input = fs::canonicalize(input)?;
    match fs::canonicalize(output) {
        Ok(output) if output == input => Err(GrinError::SameFile(output)),
        _ => Ok(()),
    }
}
