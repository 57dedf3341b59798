//! BitReader: the input half of the grin I/O subsystem.
//!
//! Reads a packed bitstream, most significant bit first, from any I/O source that supports read().
//! End of data is not an error. It is reported as `None` so callers can decide whether running
//! out of bits is the normal end of the input or a truncated stream.
//!

use std::io::{self, ErrorKind, Read};

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a bit-packed grin file (or plain bytes, 8 bits at a time).
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: BUFFER_SIZE,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer is used up
        if self.cursor == self.buffer.len() {
            // Restore full capacity in case an earlier short read shrank the buffer
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                self.buffer.truncate(0);
                self.cursor = 0;
                return Ok(false);
            }
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
        }
        Ok(true)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<u8>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Ok(Some(bit))
    }

    /// Return the next n bits (n <= 32) as an unsigned value, or None if the stream ends
    /// before all n bits are available. Bits consumed before the end are lost.
    pub fn bint(&mut self, mut n: usize) -> io::Result<Option<usize>> {
        debug_assert!(n <= 32, "bint reads at most 32 bits");
        let mut result = 0_usize;

        // Drain the partially consumed byte first.
        if self.bit_index > 0 && n > 0 {
            let needed = n.min(8 - self.bit_index);
            let byte = self.buffer[self.cursor] & BIT_MASK >> self.bit_index;
            result = (byte >> (8 - self.bit_index - needed)) as usize;
            self.bit_index += needed;
            if self.bit_index == 8 {
                self.cursor += 1;
                self.bit_index = 0;
            }
            n -= needed;
        }
        // Whole bytes
        while n >= 8 {
            if !self.have_data()? {
                return Ok(None);
            }
            result = result << 8 | self.buffer[self.cursor] as usize;
            self.cursor += 1;
            n -= 8;
        }
        // Leading bits of one more byte
        if n > 0 {
            if !self.have_data()? {
                return Ok(None);
            }
            result = result << n | (self.buffer[self.cursor] >> (8 - n)) as usize;
            self.bit_index = n;
        }
        Ok(Some(result))
    }

    /// Returns a byte, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit().unwrap(), Some(1));
        for _ in 0..6 {
            assert_eq!(br.bit().unwrap(), Some(0));
        }
        assert_eq!(br.bit().unwrap(), Some(1));
        assert_eq!(br.bit().unwrap(), None);
        // End of data is sticky
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(5).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), Some(0));
        assert_eq!(br.bint(2).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), None);
    }

    #[test]
    fn bint_across_bytes() {
        // 9 bits spanning a byte boundary, then the 7 that remain
        let x = [0b1000_0000, 0b1101_0101].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(9).unwrap(), Some(0b1_0000_0001));
        assert_eq!(br.bint(7).unwrap(), Some(0b101_0101));
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn bint_32_unaligned() {
        let x = [0b1000_0000, 0, 0, 0x07, 0x36].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit().unwrap(), Some(1));
        assert_eq!(br.bint(32).unwrap(), Some(0b1110));
    }

    #[test]
    fn bint_short_stream() {
        let x = [0xff, 0xff].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(32).unwrap(), None);
    }

    #[test]
    fn byte_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.byte().unwrap(), Some(b'H'));
        assert_eq!(br.byte().unwrap(), Some(b'e'));
        assert_eq!(br.byte().unwrap(), Some(b'l'));
        assert_eq!(br.byte().unwrap(), Some(b'l'));
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        for _ in 0..5 {
            br.byte().unwrap();
        }
        br.bit().unwrap();
        assert_eq!(br.loc(), "[5.1]");
    }
}
