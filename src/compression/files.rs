//! File level driver for the command line: read a whole file, run the codec, write the result.
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::{info, warn};

use super::progress::LogProgress;
use super::Codec;
use crate::error::CodecError;
use crate::tools::cli::{Opts, Output};

/// Suffix added to compressed files.
pub const SUFFIX: &str = ".bwz";

fn to_io(e: CodecError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Read a file, refusing anything over the size ceiling before reading it.
fn read_input(path: &str, max: usize) -> io::Result<Vec<u8>> {
    let len = fs::metadata(path)?.len();
    if len > max as u64 {
        return Err(to_io(CodecError::InputTooLarge {
            size: len,
            max: max as u64,
        }));
    }
    fs::read(path)
}

/// Write to the output named, or stdout.
fn write_output(opts: &Opts, name: &str, data: &[u8]) -> io::Result<()> {
    match opts.output {
        Output::Stdout => io::stdout().lock().write_all(data),
        Output::File => {
            let mut f_out = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .create_new(!opts.force_overwrite)
                .open(name)?;
            f_out.write_all(data)
        }
    }
}

/// Remove the input file once its output is safely written, unless asked to keep it.
fn finish_input(opts: &Opts, name: &str) -> io::Result<()> {
    if !opts.keep_input_files {
        fs::remove_file(name)?;
        info!("Removed {}.", name);
    }
    Ok(())
}

/// Compress FILE to FILE.bwz.
pub fn compress_file(opts: &Opts, codec: &Codec, name: &str) -> io::Result<()> {
    let data = read_input(name, codec.config().max_input_size)?;
    let mut progress = LogProgress {
        label: name.to_string(),
    };
    let container = codec
        .compress_with_progress(&data, &mut progress)
        .map_err(to_io)?;

    let out_name = format!("{}{}", name, SUFFIX);
    write_output(opts, &out_name, &container.to_bytes())?;
    info!(
        "{}: {} bytes in, {} bytes out.",
        name,
        data.len(),
        container.serialized_len()
    );
    finish_input(opts, name)
}

/// Name to restore a compressed file to: strip the suffix, or add ".out" if it is missing.
pub fn restored_name(name: &str) -> String {
    match name.strip_suffix(SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", name),
    }
}

/// Decompress FILE.bwz to FILE.
pub fn decompress_file(opts: &Opts, codec: &Codec, name: &str) -> io::Result<()> {
    let bytes = fs::read(name)?;
    let mut progress = LogProgress {
        label: name.to_string(),
    };
    let (data, warnings) = codec
        .decompress_with_progress(&bytes, &mut progress)
        .map_err(to_io)?;
    for w in &warnings {
        warn!("{}: {}", name, w);
    }
    write_output(opts, &restored_name(name), &data)?;
    finish_input(opts, name)
}

/// Decode FILE.bwz in memory and report whether it is intact.
pub fn test_file(codec: &Codec, name: &str) -> io::Result<()> {
    let bytes = fs::read(name)?;
    let (data, warnings) = codec.decompress(&bytes).map_err(to_io)?;
    for w in &warnings {
        warn!("{}: {}", name, w);
    }
    info!("{}: ok ({} bytes).", name, data.len());
    Ok(())
}

/// Whether a path names an existing regular file.
pub fn is_file(name: &str) -> bool {
    Path::new(name).is_file()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::config::CodecConfig;
    use crate::tools::cli::Mode;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("bwzip_test_{}_{}", std::process::id(), name))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn restored_name_test() {
        assert_eq!(restored_name("notes.txt.bwz"), "notes.txt");
        assert_eq!(restored_name("notes.txt"), "notes.txt.out");
        assert_eq!(restored_name(".bwz"), ".bwz.out");
    }

    #[test]
    fn file_round_trip_test() {
        let name = temp_path("round_trip.csv");
        let data = "a,b,c\n1,2,3\n".repeat(100);
        fs::write(&name, &data).unwrap();

        let mut opts = Opts {
            files: vec![name.clone()],
            force_overwrite: true,
            op_mode: Mode::Zip,
            ..Opts::default()
        };
        let codec = Codec::new(CodecConfig::default());
        compress_file(&opts, &codec, &name).unwrap();
        assert!(!is_file(&name));

        let packed = format!("{}{}", name, SUFFIX);
        test_file(&codec, &packed).unwrap();
        opts.op_mode = Mode::Unzip;
        decompress_file(&opts, &codec, &packed).unwrap();
        assert!(!is_file(&packed));
        assert_eq!(fs::read_to_string(&name).unwrap(), data);
        fs::remove_file(&name).unwrap();
    }

    #[test]
    fn refuses_overwrite_test() {
        let name = temp_path("keep.txt");
        fs::write(&name, b"some words to keep around").unwrap();
        let packed = format!("{}{}", name, SUFFIX);
        fs::write(&packed, b"already here").unwrap();

        let opts = Opts {
            keep_input_files: true,
            ..Opts::default()
        };
        let codec = Codec::default();
        assert!(compress_file(&opts, &codec, &name).is_err());
        assert!(is_file(&name));
        fs::remove_file(&name).unwrap();
        fs::remove_file(&packed).unwrap();
    }

    #[test]
    fn oversized_input_test() {
        let name = temp_path("big.bin");
        fs::write(&name, vec![1_u8; 64]).unwrap();
        let opts = Opts {
            keep_input_files: true,
            ..Opts::default()
        };
        let codec = Codec::new(CodecConfig {
            max_input_size: 63,
            ..CodecConfig::default()
        });
        let err = compress_file(&opts, &codec, &name).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        fs::remove_file(&name).unwrap();
    }
}
