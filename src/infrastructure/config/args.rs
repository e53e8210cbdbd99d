use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "iur",
    version,
    about = "Replaces post and product image URLs with externally hosted copies",
    long_about = None
)]
pub struct CliArgs {
    /// Settings file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Content catalog path.
    #[arg(long, value_name = "PATH", default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Failure log path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a single post and print the replacement report.
    Process {
        /// The post to process.
        post_id: u64,
    },

    /// Process every eligible post in paced groups.
    Bulk {
        /// Re-process posts whose status record already says success.
        #[arg(long)]
        force: bool,
    },

    /// Print a post's persisted upload status.
    Status {
        /// The post to inspect.
        post_id: u64,
    },

    /// Clear the failure log.
    ClearErrors,
}
