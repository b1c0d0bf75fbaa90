//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use bwzip::compression::files::{compress_file, decompress_file, is_file, test_file};
use bwzip::tools::cli::{opts_init, Mode};
use bwzip::Codec;

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), std::io::Error> {
    // Available log levels are Error, Warn, Info, Debug, Trace. The command line narrows this.
    // Logs go to stderr so -c can use stdout for data.
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Logger already initialized.");
    }

    let options = opts_init();
    let codec = Codec::new(options.config.clone());

    //----- Figure how what we need to do and go do it, one file at a time
    let mut failed = 0;
    for name in &options.files {
        if !is_file(name) {
            error!("{}: no such regular file, skipping.", name);
            failed += 1;
            continue;
        }
        let result = match options.op_mode {
            Mode::Zip => compress_file(&options, &codec, name),
            Mode::Unzip => decompress_file(&options, &codec, name),
            Mode::Test => test_file(&codec, name),
        };
        if let Err(e) = result {
            error!("{}: {}", name, e);
            failed += 1;
        }
    }

    info!("Done.\n");
    if failed > 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} of {} files failed", failed, options.files.len()),
        ));
    }
    Ok(())
}
