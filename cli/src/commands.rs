pub mod audit;
pub mod screen;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "listguard")]
#[command(about = "Identifies marketplace listings against an authorized catalog and audits their compliance.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat to print only warnings and errors
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify and audit every listing of a file
    #[command(alias = "a")]
    Audit {
        #[command(flatten)]
        inputs: Inputs,
        /// Write the reports as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the listings that are unrelated to the catalog
    #[command(alias = "s")]
    Screen {
        #[command(flatten)]
        inputs: Inputs,
    },
}

/// Files every command reads.
#[derive(Args)]
pub struct Inputs {
    /// Authorized catalog, a JSON array of entries
    #[arg(short, long)]
    pub catalog: PathBuf,
    /// Harvested listings, a JSON array
    #[arg(short, long)]
    pub listings: PathBuf,
    /// Brand, exclusion and house-brand word lists
    #[arg(short, long, default_value = "data/vocabulary.json")]
    pub vocabulary: PathBuf,
    /// Policy overrides; built-in defaults otherwise
    #[arg(short, long)]
    pub policy: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
