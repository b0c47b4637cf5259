//! # TinyBasic
//!
//! Interactive TinyBasic with a stepping debugger.
//!

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod term;

/// TinyBasic interpreter.
#[derive(Parser, Debug)]
#[command(name = "tinybasic", version, about = "TinyBasic interpreter with a stepping debugger")]
pub struct Cli {
    /// Program to load and run. Without it an interactive prompt starts.
    file: Option<PathBuf>,

    /// Step through FILE in the debugger instead of running it.
    #[arg(long, requires = "file")]
    debug: bool,

    /// Viewer program that receives the debugger's line protocol on stdin.
    #[arg(long, value_name = "CMD", requires = "debug")]
    viewer: Option<String>,

    /// Seed for RND, for repeatable runs.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = term::main(cli) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
