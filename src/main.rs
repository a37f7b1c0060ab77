use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use svgscrub::{BatchOptions, Options, ScrubError, run};

#[derive(Parser)]
#[command(name = "svgscrub")]
#[command(about = "Clean SVG(s) while preserving appearance", long_about = None)]
struct Cli {
    /// Input SVG file or directory
    input: PathBuf,

    /// Output SVG file (for single-file input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output directory (for directory input, or to place a single cleaned file)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Recurse into subdirectories when input is a directory
    #[arg(long)]
    recursive: bool,

    /// Remove more defaults (still preserves appearance)
    #[arg(long)]
    aggressive: bool,

    /// Decimal places for floats
    #[arg(long, default_value = "2")]
    precision: u8,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let options = Options {
        precision: cli.precision,
        aggressive: cli.aggressive,
        ..Options::default()
    };
    let batch = BatchOptions {
        output: cli.output,
        out_dir: cli.out_dir,
        recursive: cli.recursive,
    };

    let summary = match run(&cli.input, &batch, &options) {
        Ok(summary) => summary,
        Err(e @ ScrubError::InputNotFound(_)) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    eprintln!("{}", summary);

    if summary.failed() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
