//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "flipbook",
    version,
    about = "Read a multi-section document one page turn at a time",
    long_about = "Read a multi-section document one page turn at a time.\n\n\
                  Sections are fetched over HTTP or read from a directory, cached,\n\
                  and prefetched around the current page. The last viewed section\n\
                  is remembered between sessions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Fetch sections from `<URL>/<id>.html`.
    #[arg(long, value_name = "URL", global = true, conflicts_with = "content_dir")]
    pub base_url: Option<String>,

    /// Read sections from `<DIR>/<id>.html`.
    #[arg(long, value_name = "DIR", global = true)]
    pub content_dir: Option<PathBuf>,

    /// Where the last viewed section is remembered.
    #[arg(long, value_name = "PATH", global = true)]
    pub state_file: Option<PathBuf>,

    /// Page-turn animation length in milliseconds.
    #[arg(long, value_name = "MS", global = true)]
    pub animation_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the book and read interactively from stdin.
    Read,

    /// List the pages of the book.
    Sections,

    /// Fetch one section and print its page markup.
    Fetch {
        /// Section id, with or without a leading `#`.
        section: String,
    },
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
