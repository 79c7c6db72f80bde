//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::{toy::ToyArgs, RunArgs};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = branchsite::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of space separated strings. Here is a manual example of setting the command-line input:
/// ```rust
/// # use clap::Parser;
/// let input = ["branchsite", "run", "--input", "OG0001", "OG0002", "--output-dir", "output", "--clade", "Puccinia_graminis,Puccinia_triticina"];
/// let args = branchsite::Cli::parse_from(input);
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
/// With the following pretty JSON representation:
/// ```json
/// {
///   "command": {
///     "Run": {
///       "input": ["OG0001", "OG0002"],
///       "output_dir": "output",
///       "clade": ["Puccinia_graminis", "Puccinia_triticina"],
///       "write_alignments": false,
///       "trends": false,
///       "suffix": ".mlc",
///       "alternative_dir": "Alternative",
///       "null_dir": "Null"
///     }
///   },
///   "verbosity": "Info"
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "branchsite", author, version)]
#[clap(about = "branchsite tests genes for positive selection with the branch-site model and classifies the selected sites.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Run the analysis on a cohort of gene folders.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use branchsite::{Cli, cli::Command};
    /// use clap::Parser;
    /// let input = ["branchsite", "run", "--input", "OG0001", "--output-dir", "output", "--trends"];
    /// let args = Cli::parse_from(input);
    /// assert!(matches!(args.command, Command::Run(ref run) if run.trends));
    /// ```
    #[clap(about = "Test genes for positive selection and classify the selected sites.")]
    Run(RunArgs),
    /// List the named clade presets.
    #[clap(about = "List clade presets.")]
    Presets,
    /// Write a toy cohort of gene folders.
    #[clap(about = "Write a toy dataset.")]
    Toy(ToyArgs),
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
