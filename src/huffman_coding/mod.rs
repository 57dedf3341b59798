//! The huffman module is the core of grin: building the code tree, writing and reading it, and
//! turning bytes into codes and back.
//!
//! Symbols are 9 bits wide. The 256 byte values are symbols 0-255 and symbol 256 marks the end
//! of the encoded payload, so a decoder knows where the data stops without a length field.
//!
//! The tree is static per file. It is built once from a frequency count of the whole input,
//! written in front of the payload, and read back before decoding starts.
//!

pub mod code_table;
pub mod huffman;
