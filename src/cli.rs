use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Optional path to config file (YAML)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract local browser history and write the classified outputs
    Collect {
        /// Output directory for the history files
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Keep query strings and fragments (overrides config when set)
        #[arg(long)]
        private: bool,

        /// Ignore the run interval
        #[arg(long)]
        force: bool,
    },
    /// Score two private history files against each other
    Compare {
        /// First `browser_history` file (matrix rows)
        first: PathBuf,

        /// Second `browser_history` file (matrix columns)
        second: PathBuf,

        /// Matrix output format
        #[arg(long, value_enum, default_value_t = MatrixFormat::Json)]
        format: MatrixFormat,

        /// Write the matrix here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of worker threads
        #[arg(long, default_value_t = num_cpus::get())]
        workers: usize,
    },
    /// Print the category of each URL
    Classify {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
