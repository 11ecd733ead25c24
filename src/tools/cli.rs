use std::path::{Path, PathBuf};
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{debug, info};

/// File extension added to compressed files.
pub const EXTENSION: &str = "hz";

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Off,
            Verbosity::Errors => log::LevelFilter::Error,
            Verbosity::Warnings => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

/// All user settable options that control program behavior
#[derive(Debug, Clone)]
pub struct HzOpts {
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// File to read for input
    pub input: PathBuf,
    /// File to write, None in test mode
    pub output: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HzOpts {
    pub fn new(op_mode: Mode, input: PathBuf) -> Self {
        let output = default_output(op_mode, &input);
        Self {
            op_mode,
            input,
            output,
            force_overwrite: false,
            verbose: Verbosity::Warnings,
        }
    }
}

/// Output file name used when none is given.
/// Compressing adds ".hz"; decompressing strips it, or adds ".out" if it is not there.
pub fn default_output(op_mode: Mode, input: &Path) -> Option<PathBuf> {
    match op_mode {
        Mode::Zip => {
            let mut name = input.as_os_str().to_owned();
            name.push(".");
            name.push(EXTENSION);
            Some(PathBuf::from(name))
        }
        Mode::Unzip => {
            if input.extension().map_or(false, |ext| ext == EXTENSION) {
                Some(input.with_extension(""))
            } else {
                let mut name = input.as_os_str().to_owned();
                name.push(".out");
                Some(PathBuf::from(name))
            }
        }
        Mode::Test => None,
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Static Huffman compressor with zero-run escapes",
    long_about = "
    Compresses a file with a static canonical Huffman code over an extended alphabet: the 256 byte
    values, an end of stream marker, and escape symbols that stand for runs of 2^i zero bytes.
    Decompress with -d, or check a compressed file with -t."
)]
pub struct Args {
    /// File to process
    #[clap()]
    input: PathBuf,

    /// Output file (default: INPUT.hz when compressing, INPUT without .hz when decompressing)
    #[clap()]
    output: Option<PathBuf>,

    /// Perform compression on the input file (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress", conflicts_with_all = &["compress", "test"])]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with = "compress")]
    test: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Sets verbosity. 0 is silent, 5 is chatty
    #[clap(short = 'v', long = "verbose", default_value_t = 2)]
    v: u8,
}

impl From<Args> for HzOpts {
    fn from(args: Args) -> Self {
        let op_mode = if args.decompress {
            Mode::Unzip
        } else if args.test {
            Mode::Test
        } else {
            Mode::Zip
        };
        let mut opts = HzOpts::new(op_mode, args.input);
        if op_mode != Mode::Test && args.output.is_some() {
            opts.output = args.output;
        }
        opts.force_overwrite = args.force;
        opts.verbose = Verbosity::from_level(args.v);
        opts
    }
}

/// Parse the command line, set the log level and report what we are going to do.
pub fn hzopts_init() -> HzOpts {
    let opts = HzOpts::from(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.level_filter());

    debug!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Getting input from the file {}", opts.input.display());
    if let Some(output) = &opts.output {
        info!("Sending output to the file {}", output.display());
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> HzOpts {
        HzOpts::from(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn default_compress_test() {
        let opts = parse(&["huffzip", "data.bin"]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.output, Some(PathBuf::from("data.bin.hz")));
        assert!(!opts.force_overwrite);
        assert_eq!(opts.verbose, Verbosity::Warnings);
    }

    #[test]
    fn decompress_test() {
        let opts = parse(&["huffzip", "-d", "-f", "data.bin.hz"]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert_eq!(opts.output, Some(PathBuf::from("data.bin")));
        assert!(opts.force_overwrite);

        let opts = parse(&["huffzip", "-d", "packed"]);
        assert_eq!(opts.output, Some(PathBuf::from("packed.out")));
    }

    #[test]
    fn explicit_output_test() {
        let opts = parse(&["huffzip", "-v", "5", "in", "out"]);
        assert_eq!(opts.output, Some(PathBuf::from("out")));
        assert_eq!(opts.verbose, Verbosity::Trace);
    }

    #[test]
    fn test_mode_test() {
        let opts = parse(&["huffzip", "-t", "in.hz"]);
        assert_eq!(opts.op_mode, Mode::Test);
        assert_eq!(opts.output, None);
    }

    #[test]
    fn usage_errors_test() {
        assert!(Args::try_parse_from(&["huffzip"]).is_err());
        assert!(Args::try_parse_from(&["huffzip", "-d", "-z", "in"]).is_err());
        assert!(Args::try_parse_from(&["huffzip", "a", "b", "c"]).is_err());
    }

    #[test]
    fn verbosity_test() {
        assert_eq!(Verbosity::from_level(0).level_filter(), log::LevelFilter::Off);
        assert_eq!(Verbosity::from_level(3).level_filter(), log::LevelFilter::Info);
        assert_eq!(Verbosity::from_level(9), Verbosity::Trace);
    }
}
