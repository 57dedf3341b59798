use std::io::{self, Read};

use log::trace;
use rustc_hash::FxHashMap;

use crate::bitstream::bitreader::BitReader;

/// Occurrence count per symbol.
pub type FrequencyTable = FxHashMap<u16, u64>;

/// Returns a frequency count of the input, read 8 bits at a time. Only byte values (0-255)
/// appear in the table; the end-of-stream symbol is added when the tree is built.
pub fn create_frequency_map<R: Read>(source: R) -> io::Result<FrequencyTable> {
    let mut br = BitReader::new(source);
    let mut counts = [0_u64; 256];
    while let Some(byte) = br.byte()? {
        counts[byte as usize] += 1;
    }
    let freqs: FrequencyTable = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(sym, &count)| (sym as u16, count))
        .collect();
    trace!("Counted {} distinct byte values", freqs.len());
    Ok(freqs)
}

#[cfg(test)]
mod test {
    use super::create_frequency_map;

    #[test]
    fn counts_bytes() {
        let freqs = create_frequency_map(&b"Making a silly test."[..]).unwrap();
        assert_eq!(freqs[&(b'l' as u16)], 2);
        assert_eq!(freqs[&(b' ' as u16)], 3);
        assert_eq!(freqs[&(b'M' as u16)], 1);
        assert!(!freqs.contains_key(&(b'z' as u16)));
    }

    #[test]
    fn empty_input() {
        assert!(create_frequency_map(&[][..]).unwrap().is_empty());
    }

    #[test]
    fn repeated_zero() {
        let data = vec![0_u8; 1000];
        let freqs = create_frequency_map(&data[..]).unwrap();
        assert_eq!(freqs.len(), 1);
        assert_eq!(freqs[&0], 1000);
    }
}
