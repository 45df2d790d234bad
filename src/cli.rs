use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flowlens")]
#[command(about = "Multi-language CFG/DFG/PDG extraction and program slicing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the control flow graph for a function
    Cfg {
        /// Source file containing the function
        #[arg(long)]
        file: PathBuf,
        /// Name of the function to analyze
        #[arg(long)]
        function: String,
    },

    /// Extract the def/use dataflow graph for a function
    Dfg {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        function: String,
    },

    /// Build the program dependence graph for a function
    Pdg {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        function: String,
    },

    /// Slice a function's PDG forward or backward from a line
    Slice {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        function: String,
        /// Line number to slice from
        #[arg(long)]
        line: usize,
        /// Slice direction
        #[arg(long, value_enum, default_value_t = Direction::Backward)]
        direction: Direction,
        /// Restrict data-dependency traversal to this variable
        #[arg(long)]
        var: Option<String>,
    },

    /// Show a line's control/data dependencies
    Deps {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        function: String,
        #[arg(long)]
        line: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Forward,
    Backward,
}
