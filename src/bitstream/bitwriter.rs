//! BitWriter: the output half of the grin I/O subsystem.
//!
//! Bits are queued most significant bit first and packed into bytes. Full bytes collect in an
//! output buffer that is handed to the underlying writer whenever it fills up.
//!

use std::io::{self, Write};

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a bitstream for output to any I/O sink that supports write().
pub struct BitWriter<W: Write> {
    /// Output buffer of packed bytes waiting to be written.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, for reporting.
    written: u64,
    writer: W,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            written: 0,
            writer,
        }
    }

    /// Move all full bytes from the queue to the output buffer, writing the buffer out when full.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Put a single bit (0 or 1) on the stream.
    pub fn out_bit(&mut self, bit: bool) -> io::Result<()> {
        self.queue = self.queue << 1 | bit as u64;
        self.q_bits += 1;
        self.written += 1;
        self.push_queue()
    }

    /// Put the low n bits (n <= 32) of data on the stream, most significant first.
    pub fn out_bits(&mut self, data: u32, n: u8) -> io::Result<()> {
        debug_assert!(n <= 32, "out_bits writes at most 32 bits");
        if n == 0 {
            return Ok(());
        }
        self.queue <<= n;
        self.queue |= (data as u64) & (u64::MAX >> (64 - n));
        self.q_bits += n;
        self.written += n as u64;
        self.push_queue()
    }

    /// Put a byte on the stream.
    pub fn out8(&mut self, data: u8) -> io::Result<()> {
        self.out_bits(data as u32, 8)
    }

    /// Number of bits written so far, not counting final padding.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits, writes everything out and returns the underlying writer.
    /// Finish MUST be called or data may be left in the internal queue.
    pub fn finish(mut self) -> io::Result<W> {
        if self.q_bits > 0 {
            let pad = 8 - self.q_bits;
            self.queue <<= pad;
            self.q_bits += pad;
            self.push_queue()?;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written / 8, self.written % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out8_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out8(b'x').unwrap();
        assert_eq!(bw.finish().unwrap(), "x".as_bytes());
    }

    #[test]
    fn last_bits_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out8(255).unwrap();
        bw.out8(1).unwrap();
        bw.out_bits(0b111, 3).unwrap();
        assert_eq!(bw.loc(), "[2.3]");
        assert_eq!(bw.finish().unwrap(), vec![255, 1, 0b1110_0000]);
    }

    #[test]
    fn out_bit_test() {
        let mut bw = BitWriter::new(Vec::new());
        for bit in [true, false, true, true, false, false, false, true, true] {
            bw.out_bit(bit).unwrap();
        }
        assert_eq!(bw.bits_written(), 9);
        assert_eq!(bw.finish().unwrap(), vec![0b1011_0001, 0b1000_0000]);
    }

    #[test]
    fn out_bits_masks_high_bits() {
        let mut bw = BitWriter::new(Vec::new());
        // Only the low 9 bits are written
        bw.out_bits(0xffff_fe00 | 256, 9).unwrap();
        bw.out_bits(0x736, 32).unwrap();
        assert_eq!(
            bw.finish().unwrap(),
            vec![0b1000_0000, 0, 0, 0b0000_0011, 0b1001_1011, 0]
        );
    }

    #[test]
    fn large_output_spills() {
        let mut bw = BitWriter::new(Vec::new());
        for i in 0..200_000_u32 {
            bw.out8(i as u8).unwrap();
        }
        let out = bw.finish().unwrap();
        assert_eq!(out.len(), 200_000);
        assert_eq!(out[199_999], (199_999_u32 % 256) as u8);
    }

    #[test]
    fn empty_finish() {
        let bw = BitWriter::new(Vec::new());
        assert!(bw.finish().unwrap().is_empty());
    }
}
