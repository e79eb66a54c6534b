//! CLI command definitions for the `interviewer` binary.

pub mod chat;
pub mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use interviewer_infra::config::DEFAULT_CONFIG_FILE;

/// Confidential AI intake interviewer.
#[derive(Parser)]
#[command(name = "interviewer", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "INTERVIEWER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Detailed logs (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST API server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },

    /// Run one interview in the terminal.
    Chat,

    /// Validate the configuration and print a summary.
    Check {
        /// Also send a one-word request to the oracle.
        #[arg(long)]
        ping: bool,
    },
}
