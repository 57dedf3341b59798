//! The bitstream module forms the I/O subsystem for grin.
//!
//! Both halves work most significant bit first. The reader reports the end of its data as
//! `None` rather than an error; the writer pads the final byte with zero bits when finished.
//!
pub mod bitreader;
pub mod bitwriter;
