//! Command-line arguments for the `gemchat` binary.

use std::path::PathBuf;

use clap::Parser;

/// Chat with a hosted generative model from your browser.
#[derive(Debug, Parser)]
#[command(name = "gemchat", version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, env = "GEMCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to listen on (overrides the config file).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Suppress all output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default tracing filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,gemchat=debug",
            _ => "trace",
        }
    }
}
