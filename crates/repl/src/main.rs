//! staxr - line-editing REPL for Stax
//!
//! Reads a line at a time, runs it against one persistent program, and
//! shows the current stack size in the prompt. The stack carries over
//! between lines, so values build up incrementally. Diagnostics print in
//! bold; Ctrl-D exits.

use clap::Parser as ClapParser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use stax::Program;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "staxr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive Stax REPL", long_about = None)]
struct Args {}

/// History lives next to other tool histories under the home directory.
fn history_file_path() -> Option<PathBuf> {
    home::home_dir().map(|d| d.join(".local/share/staxr_history"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let _args = Args::parse();

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = history_file_path() {
        let _ = editor.load_history(&path);
    }

    let mut prog = Program::new();

    loop {
        let prompt = match prog.stack_size() {
            0 => "> ".to_string(),
            n => format!("[{n}]> "),
        };
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if let Err(err) = prog.run_source(line) {
                    eprintln!("\x1b[1m{}\x1b[0m", err);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = history_file_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = editor.save_history(&path) {
            eprintln!("Warning: could not save history: {}", e);
        }
    }
}
