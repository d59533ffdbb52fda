//! Command-line interface definitions for lexdigit

use crate::export::ExportFormat;
use crate::index_tree::NodePath;
use crate::selection::ExportMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the lexdigit application
#[derive(Parser)]
#[command(name = "lexdigit")]
#[command(version)]
#[command(about = "Legal document digitization toolkit", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./lexdigit.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for lexdigit
#[derive(Subcommand)]
pub enum Commands {
    /// Repair a raw model response and print it as JSON
    Repair {
        /// File holding the raw response
        raw: PathBuf,
    },

    /// Print the outline of a structure analysis response
    Outline {
        /// File holding the raw structure analysis response
        #[arg(long, value_name = "RAW")]
        structure: PathBuf,

        /// Show nested nodes too
        #[arg(long)]
        expand_all: bool,
    },

    /// Run the workflow on recorded responses and export the result
    Render {
        /// File holding the raw structure analysis response
        #[arg(long, value_name = "RAW")]
        structure: PathBuf,

        /// File holding the raw node conversion response
        #[arg(long, value_name = "RAW")]
        chunks: PathBuf,

        /// Source document (PDF or .docx) the responses belong to
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Document key printed in the export header
        #[arg(short, long)]
        key: Option<String>,

        /// Outline node to convert, as printed by `outline` (e.g. 0.1)
        #[arg(short, long, value_name = "PATH", default_value = "0")]
        node: NodePath,

        /// Export format (inferred from the output extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Export only the chunk with this id
        #[arg(long, value_name = "CHUNK_ID")]
        single: Option<String>,

        /// Export mode when --single is not given
        #[arg(long, value_enum)]
        mode: Option<ExportMode>,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the whole-batch snapshot stored at conversion time
        #[arg(long)]
        snapshot: bool,
    },

    /// Classify a source document and report what would be sent
    Inspect {
        /// PDF or Word document
        file: PathBuf,
    },

    /// Print a policy roadmap response
    Roadmap {
        /// File holding the raw roadmap response
        raw: PathBuf,
    },
}
