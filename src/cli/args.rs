//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::Operation;
use crate::domain::AccessSpec;

/// Tree-shaped argument matching: call plain functions over hierarchically addressed data trees
#[derive(Parser, Debug)]
#[command(name = "treehandler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Local config file (default: ./.treehandler.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the iteration plan for a set of argument trees
    Plan {
        /// Tree documents, one per argument
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        trees: Vec<PathBuf>,
        /// Access per argument, e.g. item,list (default: config default_access)
        #[arg(short, long, value_delimiter = ',', value_parser = parse_access, value_name = "LIST")]
        access: Option<Vec<AccessSpec>>,
    },

    /// Run a built-in operation over argument trees
    Apply {
        /// Operation to run
        #[arg(value_enum)]
        operation: Operation,
        /// Tree documents, one per argument
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        trees: Vec<PathBuf>,
        /// Override the operation's declared access, e.g. item,item
        #[arg(short, long, value_delimiter = ',', value_parser = parse_access, value_name = "LIST")]
        access: Option<Vec<AccessSpec>>,
        /// Print the result as a JSON tree document
        #[arg(long)]
        json: bool,
        /// Write the result document to a file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show a tree document
    Show {
        /// Tree document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
        /// Print as a JSON tree document
        #[arg(long)]
        json: bool,
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
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}

fn parse_access(s: &str) -> Result<AccessSpec, String> {
    s.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}
