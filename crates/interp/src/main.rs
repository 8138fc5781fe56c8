//! stax - run a Stax program from a file or stdin

use clap::Parser as ClapParser;
use stax::Program;
use std::io::Read;
use std::path::PathBuf;
use std::{fs, io, process};

#[derive(ClapParser)]
#[command(name = "stax")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a Stax program", long_about = None)]
struct Cli {
    /// Source file to run, or '-' to read from stdin
    file: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let source = if cli.file.as_os_str() == "-" {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("Cannot read from stdin: {}", e);
            process::exit(1);
        }
        buf
    } else {
        match fs::read_to_string(&cli.file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Cannot read file '{}': {}", cli.file.display(), e);
                process::exit(1);
            }
        }
    };

    let mut prog = Program::new();
    if let Err(err) = prog.run_source(&source) {
        eprintln!("\x1b[31m{}\x1b[0m", err);
        process::exit(1);
    }
}
