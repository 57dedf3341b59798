//! Error taxonomy for grin. Every failure is terminal for the current encode or decode run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrinError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The 32 bit header is missing or does not match `MAGIC`.
    #[error("not a grin file (header {})", fmt_magic(.found))]
    BadMagic { found: Option<u32> },

    #[error("malformed tree: {0}")]
    MalformedTree(&'static str),

    /// The tree has no leaf for a symbol in the data being encoded.
    #[error("symbol {0} has no code in this tree")]
    SymbolNotFound(u16),

    #[error("payload ended before the end-of-stream code")]
    TruncatedPayload,

    #[error("symbol {0} is out of range for a frequency table")]
    InvalidSymbol(u16),

    /// Symbol weights sum past u64::MAX while building the tree.
    #[error("frequency table weights overflow")]
    WeightOverflow,

    /// Input and output name the same file; writing would destroy the input.
    #[error("{} is both input and output", .0.display())]
    SameFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, GrinError>;

fn fmt_magic(found: &Option<u32>) -> String {
    match found {
        Some(magic) => format!("{:#010x}", magic),
        None => "missing".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::GrinError;

    #[test]
    fn bad_magic_message() {
        let e = GrinError::BadMagic { found: Some(0x1234) };
        assert_eq!(e.to_string(), "not a grin file (header 0x00001234)");
        let e = GrinError::BadMagic { found: None };
        assert_eq!(e.to_string(), "not a grin file (header missing)");
    }

    #[test]
    fn same_file_message() {
        let e = GrinError::SameFile("data.bin".into());
        assert_eq!(e.to_string(), "data.bin is both input and output");
    }

    #[test]
    fn io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: GrinError = io.into();
        assert!(matches!(e, GrinError::Io(_)));
    }
}
