use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// tspec command line interface
#[derive(Parser)]
#[command(name = "tspec")]
#[command(version, about = "Checks tspec modules and generates Java from them", long_about = None)]
pub struct CliCommand {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colors in the output
    #[arg(long, global = true)]
    pub no_colors: bool,

    /// Print diagnostics in debug format
    #[arg(long, global = true)]
    pub print_debug: bool,

    /// Log more, repeat for even more (overridden by `RUST_LOG`)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check modules and report diagnostics
    Check {
        /// Parsed modules in JSON form
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Check modules and generate Java source for them
    Generate {
        /// Parsed modules in JSON form
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Directory the Java files are written to
        #[arg(long, short, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Java package of the generated classes
        #[arg(long)]
        package: Option<String>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Leave out the error behaviour tables of encoded types
        #[arg(long)]
        no_error_behavior: bool,
    },
    /// Development tools for debugging and testing
    Dev {
        #[command(subcommand)]
        command: DevCommands,
    },
}

#[derive(Subcommand)]
pub enum DevCommands {
    /// Print every reference in a module with its location
    PrintReferences {
        /// Parsed module in JSON form
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only print references inside this definition
        #[arg(long)]
        definition: Option<String>,
    },
}
