//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process::ExitCode;

use grin::compression::compress::compress;
use grin::compression::decompress::decompress;
use grin::tools::cli::{grinopts_init, Mode};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli narrows this down.
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("grin: could not start the logger");
    }

    let opts = grinopts_init();

    //----- Figure out what we need to do and go do it
    let result = match opts.op_mode {
        Mode::Encode => compress(&opts),
        Mode::Decode => decompress(&opts),
    };

    match result {
        Ok(()) => {
            info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{} failed: {}", opts.op_mode, e);
            ExitCode::FAILURE
        }
    }
}
