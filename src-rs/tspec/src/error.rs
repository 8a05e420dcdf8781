//! Failures of the command line front end itself

use std::{io, path::PathBuf};

/// An error that stops a command before or after analysis
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A module file could not be read
    #[error("cannot read `{path}`: {source}")]
    Read {
        /// The file
        path: PathBuf,
        /// The underlying failure
        source: io::Error,
    },
    /// A module file is not a valid JSON syntax tree
    #[error("`{path}` is not a valid module: {source}")]
    Parse {
        /// The file
        path: PathBuf,
        /// The underlying failure
        source: serde_json::Error,
    },
    /// A generated file could not be written
    #[error("cannot write `{path}`: {source}")]
    Write {
        /// The file
        path: PathBuf,
        /// The underlying failure
        source: io::Error,
    },
    /// `--definition` names nothing in the module
    #[error("`{path}` defines no definition named `{name}`")]
    NoSuchDefinition {
        /// The module file
        path: PathBuf,
        /// The requested definition
        name: String,
    },
}
