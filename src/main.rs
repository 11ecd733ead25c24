//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use huffzip::compression::compress::compress_file;
use huffzip::compression::decompress::{decompress_file, test_file};
use huffzip::tools::cli::{hzopts_init, Mode};

use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("huffzip: could not start logging: {}", e);
    }

    let options = hzopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress_file(&options).map(|_| ()),
        Mode::Unzip => decompress_file(&options).map(|_| ()),
        Mode::Test => test_file(&options).map(|_| println!("{}: ok", options.input.display())),
    };

    match result {
        Ok(()) => info!("Done."),
        Err(e) => {
            eprintln!("huffzip: {}: {}", options.input.display(), e);
            std::process::exit(1);
        }
    }
}
