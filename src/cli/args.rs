//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Path-mapped document builder: project flat claim-form values onto an XML schema
#[derive(Parser, Debug)]
#[command(name = "claimdoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .claimdoc.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build XML documents from values files
    Build {
        /// Schema file (default: `schema` from config)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
        /// Values files; several are built in parallel
        #[arg(required = true, num_args = 1.., value_hint = ValueHint::FilePath)]
        values: Vec<PathBuf>,
        /// Output file (one input) or directory (several inputs); stdout if omitted
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        output: Option<PathBuf>,
        /// Indent nested elements
        #[arg(long)]
        pretty: bool,
        /// Omit the XML declaration
        #[arg(long)]
        no_declaration: bool,
    },

    /// Show a built document as a tree
    Tree {
        /// Schema file (default: `schema` from config)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
        /// Values file
        #[arg(value_hint = ValueHint::FilePath)]
        values: PathBuf,
    },

    /// Validate a schema file
    Check {
        /// Schema file (default: `schema` from config)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
