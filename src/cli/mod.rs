pub mod consolidate;
pub mod doctypes;
pub mod login;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config;

#[derive(Parser)]
#[command(
    name = "afilcheck",
    version,
    about = "Batch-check affiliate registration against the Horus Health registry"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the input files; outputs land there too
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Query every identifier found in the category input files
    Run {
        /// Only run specific categories (comma-separated IDs)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// Pause between consecutive requests, in milliseconds
        #[arg(long, default_value_t = config::REQUEST_DELAY_MS)]
        delay_ms: u64,
    },
    /// Rebuild the unified CSV and Excel mirror from existing category CSVs
    Consolidate,
    /// Show the document-type codes in effect
    DocTypes,
    /// Verify the stored credentials by requesting a token
    Login,
}
