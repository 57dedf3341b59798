use log::{error, info, warn};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{GrinError, Result};
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::GrinOpts;

use super::{check_distinct, MAGIC, MAGIC_BITS};

use std::{
    fs::{self, File},
    io::{Read, Write},
};

/// Decompress the file named in opts. Nothing is created at the output path unless the input
/// has a valid header and tree; a failure after that removes the partial output. The output
/// must not be the input file.
pub fn decompress(opts: &GrinOpts) -> Result<()> {
    check_distinct(&opts.input, &opts.output)?;
    let mut br = BitReader::new(File::open(&opts.input)?);

    let tree = match read_preamble(&mut br) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Fatal error: {} is not a valid grin file.", opts.input.display());
            return Err(e);
        }
    };

    // Good so far. Prepare to write the data.
    let f_out = File::create(&opts.output)?;
    if let Err(e) = decode_payload(&tree, &mut br, f_out) {
        warn!("Removing partial output {}", opts.output.display());
        if let Err(rm) = fs::remove_file(&opts.output) {
            warn!("Could not remove {}: {}", opts.output.display(), rm);
        }
        return Err(e);
    }

    let out_size = fs::metadata(&opts.output)?.len();
    info!("Wrote {} bytes to {}", out_size, opts.output.display());
    Ok(())
}

/// Check the magic header and read the tree that follows it.
pub fn read_preamble<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
    match br.bint(MAGIC_BITS)? {
        Some(magic) if magic as u32 == MAGIC => {
            info!("Found a valid grin signature.");
        }
        found => {
            return Err(GrinError::BadMagic {
                found: found.map(|magic| magic as u32),
            })
        }
    }
    HuffmanTree::deserialize(br)
}

fn decode_payload<R: Read, W: Write>(tree: &HuffmanTree, br: &mut BitReader<R>, sink: W) -> Result<W> {
    let mut bw = BitWriter::new(sink);
    tree.decode(br, &mut bw)?;
    Ok(bw.finish()?)
}

/// Decode a complete grin stream from source into sink. Returns the sink once flushed.
pub fn decompress_stream<R: Read, W: Write>(source: R, sink: W) -> Result<W> {
    let mut br = BitReader::new(source);
    let tree = read_preamble(&mut br)?;
    decode_payload(&tree, &mut br, sink)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decompress_stream(data, Vec::new())
}
