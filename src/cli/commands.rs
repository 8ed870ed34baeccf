//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - sweep: expand a hyperparameter range and optionally submit jobs
//! - status: fetch a job's current detail
//! - watch: poll a job until it settles
//! - curve: print plot geometry for a job's training curve
//! - cancel: request cancellation of a job

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Alphadesk - quant research job orchestration from the terminal
#[derive(Parser, Debug)]
#[command(name = "alphadesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a hyperparameter sweep and optionally submit one job per value
    Sweep {
        /// Parameter key to vary
        key: String,

        /// Range start (inclusive)
        #[arg(allow_negative_numbers = true)]
        start: f64,

        /// Range end
        #[arg(allow_negative_numbers = true)]
        end: f64,

        /// Step between values
        #[arg(allow_negative_numbers = true)]
        step: f64,

        /// Include the end value itself
        #[arg(long)]
        include_end: bool,

        /// Submit a training job per value instead of only printing them
        #[arg(long)]
        submit: bool,

        /// Name for submitted jobs
        #[arg(short, long, default_value = "sweep")]
        name: String,
    },

    /// Fetch the current detail of a job
    Status {
        /// Job ID to check
        id: String,
    },

    /// Poll a job until it reaches a terminal state
    Watch {
        /// Job ID to watch
        id: String,

        /// Metric to resolve from the final detail
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Print plot geometry for a job's training curve
    Curve {
        /// Job ID whose metrics hold the curve
        id: String,

        /// Plot width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Plot height in pixels
        #[arg(long)]
        height: Option<f64>,
    },

    /// Request cancellation of a job
    Cancel {
        /// Job ID to cancel
        id: String,
    },
}
