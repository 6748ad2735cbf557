use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "msconv")]
#[command(
    about = "Convert a music folder into numbered mono tracks for a radio player",
    long_about = None
)]
pub struct Cli {
    /// Folder with the music to convert (asked interactively when omitted)
    #[arg(value_name = "INPUT_DIR")]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output folder, emptied before every run (overrides config)
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Conversion profile (overrides config)
    #[arg(long, short, global = true)]
    pub profile: Option<String>,

    /// ffmpeg executable to use (overrides config)
    #[arg(long, global = true)]
    pub engine: Option<PathBuf>,

    /// Install ffmpeg without asking when it is missing
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg is installed
    CheckFfmpeg,

    /// Show which files would be converted and their track names
    Scan {
        /// Folder to scan (defaults to current directory)
        directory: Option<PathBuf>,
    },

    /// Show ffmpeg commands without executing (dry run)
    DryRun {
        /// Folder to scan (defaults to current directory)
        directory: Option<PathBuf>,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
