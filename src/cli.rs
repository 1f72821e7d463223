use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Split PDFs by page ranges into ZIP archives, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Check a page range specification and show the pages it selects
    Parse {
        /// Page ranges (e.g., "1-5,8,10-12")
        ranges: String,

        /// Reject pages beyond this page count
        #[arg(short, long)]
        total: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress page numbers into a range specification
    Format {
        /// Page numbers, in any order
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        pages: Vec<u32>,
    },

    /// List example page range specifications
    Examples,

    /// Split a PDF into a ZIP with one file per run of consecutive pages
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Page ranges (e.g., "1-3,5,7-9")
        ranges: String,

        /// Output archive (defaults to <name>_split.zip next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
