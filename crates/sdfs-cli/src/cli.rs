use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sdfs_store::file::DEFAULT_CARD_DIR;

#[derive(Parser)]
#[command(
    name = "sdfs",
    about = "Flat file store for SD-card style media: 256-byte blocks, one root directory",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory standing in for the card
    #[arg(long, global = true, default_value = DEFAULT_CARD_DIR)]
    pub root: PathBuf,

    /// TOML file overriding the default limits
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a new file
    Create(CreateArgs),
    /// Show the blocks of a file
    Read(ReadArgs),
    /// List files in creation order
    List,
    /// Show size and block layout of a file
    Stat(StatArgs),
    /// Show directory and block usage
    Status,
}

#[derive(Args)]
pub struct CreateArgs {
    pub name: String,
    /// Content to write
    pub data: Option<String>,
    /// Read the content from a file instead
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReadArgs {
    pub name: String,
}

#[derive(Args)]
pub struct StatArgs {
    pub name: String,
}
