//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    /// A file named on the command line couldn't be read
    #[display("could not read {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// A file was read but isn't an implementors file
    #[display("could not decode {}", _0.display())]
    Decode(#[error(not(source))] PathBuf),
    #[display("could not write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    /// Writing results to stdout failed
    #[display("could not write output")]
    Output,
    #[display("could not merge {}", _0.display())]
    Merge(#[error(not(source))] PathBuf),
    /// Merge inputs (or the output's place in the doc root) name different traits
    #[display("{} documents {found}, expected {expected}", path.display())]
    TraitMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}
