use clap::{ArgEnum, Parser};
use log::info;
use std::{fmt::Display, fmt::Formatter, path::PathBuf};

/// Verbosity of user information
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Verbosity {
    Errors,
    Info,
    Debug,
    Trace,
}
impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Encode or Decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
pub enum Mode {
    Encode,
    Decode,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "grin",
    version,
    about = "Huffman compression for arbitrary files",
    long_about = None)]
pub struct Args {
    /// Operation to perform
    #[clap(arg_enum)]
    mode: Mode,

    /// File to read
    #[clap(parse(from_os_str))]
    input: PathBuf,

    /// File to write
    #[clap(parse(from_os_str))]
    output: PathBuf,

    /// Sets verbosity. -v adds tree statistics, -vv traces every leaf
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,

    /// Only report errors
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,
}

/// All user settable options that control a run.
#[derive(Debug)]
pub struct GrinOpts {
    /// Encode/Decode
    pub op_mode: Mode,
    /// File to read
    pub input: PathBuf,
    /// File to write
    pub output: PathBuf,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl GrinOpts {
    /// Copy the parsed command line into our internal structure.
    pub fn from_args(args: Args) -> Self {
        let verbose = if args.quiet {
            Verbosity::Errors
        } else {
            match args.verbose {
                0 => Verbosity::Info,
                1 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        };
        Self {
            op_mode: args.mode,
            input: args.input,
            output: args.output,
            verbose,
        }
    }
}

/// Parse the process arguments, set the log level and report the options. clap prints the
/// usage message and exits for a wrong argument count or an unknown mode.
pub fn grinopts_init() -> GrinOpts {
    let opts = GrinOpts::from_args(Args::parse());
    set_log_level(opts.verbose);

    info!("---- grin Initialization Start ----");
    info!("Verbosity set to {}", opts.verbose);
    info!("Operational mode set to {}", opts.op_mode);
    info!("Reading from {}", opts.input.display());
    info!("Writing to {}", opts.output.display());
    info!("---- grin Initialization End ----");
    opts
}

/// Set the log level based on verbosity
pub fn set_log_level(verbose: Verbosity) {
    match verbose {
        Verbosity::Errors => log::set_max_level(log::LevelFilter::Error),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<GrinOpts, clap::Error> {
        Args::try_parse_from(args).map(GrinOpts::from_args)
    }

    #[test]
    fn encode_args() {
        let opts = parse(&["grin", "encode", "in.txt", "out.grin"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Encode);
        assert_eq!(opts.input, PathBuf::from("in.txt"));
        assert_eq!(opts.output, PathBuf::from("out.grin"));
        assert_eq!(opts.verbose, Verbosity::Info);
    }

    #[test]
    fn decode_args_with_verbosity() {
        let opts = parse(&["grin", "-v", "decode", "a.grin", "a.txt"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Decode);
        assert_eq!(opts.verbose, Verbosity::Debug);
        let opts = parse(&["grin", "-vvv", "decode", "a.grin", "a.txt"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Trace);
        let opts = parse(&["grin", "decode", "a.grin", "a.txt", "-q"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Errors);
    }

    #[test]
    fn quiet_keeps_errors() {
        let opts = parse(&["grin", "-q", "encode", "a", "b"]).unwrap();
        set_log_level(opts.verbose);
        assert_eq!(log::max_level(), log::LevelFilter::Error);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(parse(&["grin", "squash", "a", "b"]).is_err());
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(parse(&["grin", "encode", "a"]).is_err());
        assert!(parse(&["grin", "encode", "a", "b", "c"]).is_err());
        assert!(parse(&["grin"]).is_err());
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::Encode.to_string(), "Encode");
        assert_eq!(Verbosity::Trace.to_string(), "Trace");
    }
}
