use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

use crate::compression::config::{CodecConfig, DEFAULT_MAX_INPUT_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Zip, Unzip, Test
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Define the two output channels
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A block-sorting single file compressor",
    long_about = "
    Compresses one file at a time into a single block: a Burrows-Wheeler transform for
    text-like data, a canonical Huffman code, and a checksummed header. Data that will not
    compress is stored as is, so output is never more than 13 bytes larger than input."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<String>,

    /// Perform compression on the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress", conflicts_with = "compress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with_all = &["compress", "decompress"])]
    test: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', long = "verbose", default_value_t = 1)]
    v: u8,

    /// Largest input accepted, in bytes
    #[clap(long = "max-size", default_value_t = DEFAULT_MAX_INPUT_SIZE)]
    max_size: usize,

    /// Fraction of printable bytes that selects the block transform
    #[clap(long = "text-ratio", default_value_t = 0.85)]
    text_ratio: f64,

    /// Largest compressed/original ratio kept before storing raw
    #[clap(long = "accept-ratio", default_value_t = 0.95)]
    accept_ratio: f64,

    /// Shortest single-byte run stored with the repeated-byte shortcut
    #[clap(long = "min-run", default_value_t = 32)]
    min_run: usize,
}

/// Define all user settable options to control program behavior
#[derive(Debug, Clone)]
pub struct Opts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Codec policy built from the tuning flags
    pub config: CodecConfig,
}

impl Opts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            output: Output::File,
            config: CodecConfig::default(),
        }
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Args> for Opts {
    fn from(args: Args) -> Self {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress {
            Mode::Unzip
        } else {
            Mode::Zip
        };
        Self {
            files: args.files,
            force_overwrite: args.force,
            keep_input_files: args.keep || args.stdout,
            op_mode,
            output: if args.stdout {
                Output::Stdout
            } else {
                Output::File
            },
            config: CodecConfig {
                max_input_size: args.max_size,
                text_ratio: args.text_ratio,
                acceptance_ratio: args.accept_ratio,
                min_degenerate_len: args.min_run,
                ..CodecConfig::default()
            },
        }
    }
}

/// Parse the command line, set the log level, and report the settings.
pub fn opts_init() -> Opts {
    let args = Args::parse();
    set_verbosity(args.v);
    let opts = Opts::from(args);

    // Below we report initialization status to the user
    info!("---- Initialization Start ----",);
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Output to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    if opts.config != CodecConfig::default() {
        warn!("Using non-default codec settings: {:?}", opts.config)
    };
    info!("---- Initialization End ----\n");
    opts
}

/// Set the log level
fn set_verbosity(v: u8) {
    match v {
        0 => log::set_max_level(log::LevelFilter::Off),
        1 => log::set_max_level(log::LevelFilter::Error),
        2 => log::set_max_level(log::LevelFilter::Warn),
        3 => log::set_max_level(log::LevelFilter::Info),
        4 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::from(Args::parse_from(args))
    }

    #[test]
    fn default_mode_test() {
        let opts = parse(&["bwzip", "a.txt"]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.output, Output::File);
        assert_eq!(opts.files, vec!["a.txt".to_string()]);
        assert_eq!(opts.config, CodecConfig::default());
    }

    #[test]
    fn flags_test() {
        let opts = parse(&["bwzip", "-d", "-k", "-f", "a.bwz", "b.bwz"]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert!(opts.keep_input_files);
        assert!(opts.force_overwrite);
        assert_eq!(opts.files.len(), 2);

        let opts = parse(&["bwzip", "-c", "-t", "a.bwz"]);
        assert_eq!(opts.op_mode, Mode::Test);
        assert_eq!(opts.output, Output::Stdout);
        assert!(opts.keep_input_files);
    }

    #[test]
    fn tuning_test() {
        let opts = parse(&[
            "bwzip",
            "--max-size",
            "1000",
            "--text-ratio",
            "0.5",
            "--accept-ratio",
            "0.8",
            "--min-run",
            "4",
            "a.txt",
        ]);
        assert_eq!(opts.config.max_input_size, 1000);
        assert_eq!(opts.config.text_ratio, 0.5);
        assert_eq!(opts.config.acceptance_ratio, 0.8);
        assert_eq!(opts.config.min_degenerate_len, 4);
    }

    #[test]
    fn conflicting_modes_test() {
        assert!(Args::try_parse_from(&["bwzip", "-z", "-d", "a"]).is_err());
        assert!(Args::try_parse_from(&["bwzip"]).is_err());
    }
}
