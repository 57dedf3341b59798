//! grin: a Huffman file compressor.
//!
//! Every byte of the input is replaced by its code from a Huffman tree built over the whole
//! file. The tree itself is stored at the front of the compressed file, behind a 32 bit magic
//! number, and the payload ends with the code for a reserved end-of-stream symbol.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> grin encode test.txt test.grin`
//!
//! and to restore it:
//!
//! `$> grin decode test.grin test.txt`
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress_bytes, compress_stream};
pub use compression::decompress::{decompress_bytes, decompress_stream};
pub use error::{GrinError, Result};
pub use huffman_coding::huffman::HuffmanTree;
