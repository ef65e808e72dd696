//! Command-line argument definitions for the archform CLI.
//!
//! Every command operates on the built-in demo workspace. Upload flags
//! override the values read from `~/.archform/settings.json`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build, review, export and upload an architecture workspace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a compact text rendering of the workspace
    Outline,

    /// Print modeling hints
    Review,

    /// Write the workspace as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the JSON schema of the workspace document
    Schema,

    /// Store the workspace in the local workspace directory
    Save {
        /// Name of the stored workspace
        #[arg(long, default_value = "inplacer")]
        name: String,

        /// Directory to store into instead of ~/.archform
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Send the workspace to the configured sink
    Upload {
        #[arg(long)]
        workspace_id: Option<u64>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        api_secret: Option<String>,

        /// Base URL of the workspace API
        #[arg(long)]
        url: Option<String>,

        /// Write `workspace-<id>.json` into this directory instead of
        /// sending it over HTTP
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
