use std::path::PathBuf;

use clap::Parser;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Arguments shared by the plotting binaries
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct PlotArgs {
    /// Input table (whitespace text, .csv, .json or .parquet)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the figure without opening the viewer window
    #[arg(long)]
    pub no_show: bool,

    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl PlotArgs {
    /// The input path, or [`PipelineError::Usage`] when none was given.
    pub fn input(&self) -> Result<&PathBuf, PipelineError> {
        self.input.as_ref().ok_or(PipelineError::Usage)
    }

    pub fn init_logging(&self) {
        init_logging(self.verbose);
    }
}

/// `RUST_LOG` wins; otherwise `info`, raised by each `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // A second init (tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// The line printed when no input is given.
pub fn usage_line(program: &str) -> String {
    format!("Usage: {program} <input_file>")
}

/// Program name as invoked, falling back to `fallback`.
pub fn program_name(fallback: &str) -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| fallback.to_string())
}
