use std::fs::{self, File};
use std::io::{Read, Write};

use log::{debug, info, warn};

use super::{check_distinct, MAGIC, MAGIC_BITS};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::Result;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::GrinOpts;
use crate::tools::freq_count::{create_frequency_map, FrequencyTable};

/// Compress the input file named in opts into the output file. The output must not be the
/// input file. A failure after the output was created removes the partial output.
pub fn compress(opts: &GrinOpts) -> Result<()> {
    check_distinct(&opts.input, &opts.output)?;

    // First pass: count the bytes
    let freqs = create_frequency_map(File::open(&opts.input)?)?;
    let in_size = fs::metadata(&opts.input)?.len();
    info!(
        "Read {} bytes with {} distinct values from {}",
        in_size,
        freqs.len(),
        opts.input.display()
    );

    // Second pass: write the codes
    encode_file(&freqs, opts)?;

    let out_size = fs::metadata(&opts.output)?.len();
    info!("Wrote {} bytes to {}", out_size, opts.output.display());
    Ok(())
}

/// Write the codes for opts.input into a fresh opts.output, removing it again on failure.
fn encode_file(freqs: &FrequencyTable, opts: &GrinOpts) -> Result<()> {
    let fin = File::open(&opts.input)?;
    let f_out = File::create(&opts.output)?;
    if let Err(e) = compress_stream(freqs, fin, f_out) {
        warn!("Removing partial output {}", opts.output.display());
        if let Err(rm) = fs::remove_file(&opts.output) {
            warn!("Could not remove {}: {}", opts.output.display(), rm);
        }
        return Err(e);
    }
    Ok(())
}

/// Write a complete grin stream for source to sink. freqs must count every byte in source.
/// Returns the sink once everything is flushed.
pub fn compress_stream<R: Read, W: Write>(freqs: &FrequencyTable, source: R, sink: W) -> Result<W> {
    let tree = HuffmanTree::from_frequencies(freqs)?;
    let mut br = BitReader::new(source);
    let mut bw = BitWriter::new(sink);

    bw.out_bits(MAGIC, MAGIC_BITS as u8)?;
    tree.serialize(&mut bw)?;
    debug!("Tree takes {} bits", bw.bits_written() - MAGIC_BITS as u64);
    tree.encode(&mut br, &mut bw)?;

    Ok(bw.finish()?)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let freqs = create_frequency_map(data)?;
    compress_stream(&freqs, data, Vec::new())
}
