//! The tools module provides the helpers around the huffman core.
//!
//! The tools are:
//! - cli: Command line interface for grin.
//! - freq_count: Frequency count of the input bytes.
//!
pub mod cli;
pub mod freq_count;
