//! Error types for quipt-collator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the collator library
#[derive(Error, Debug)]
pub enum Error {
    /// Splitting a received PDF failed
    #[error("Split error: {0}")]
    Split(#[from] SplitError),

    /// A print job could not be submitted
    #[error("Print submission error: {0}")]
    PrintSubmission(#[from] PrintSubmissionError),

    /// Clearing the scratch directory or deleting a source failed
    #[error("Cleanup error: {0}")]
    Cleanup(#[from] CleanupError),

    /// The watched directory could not be set up
    #[error("Watch setup error: {0}")]
    WatchSetup(#[from] WatchSetupError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger was already installed
    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Failure to break a source PDF into single pages
#[derive(Error, Debug)]
pub enum SplitError {
    /// Source file is missing
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Source could not be read or parsed as a PDF
    #[error("Not a readable PDF: {}: {source}", path.display())]
    InvalidPdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Output directory could not be created
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single-page document could not be written
    #[error("Failed to write page {page} to {}: {reason}", path.display())]
    WritePage {
        page: u32,
        path: PathBuf,
        reason: String,
    },
}

/// Failure to hand a page over to the print command
#[derive(Error, Debug)]
pub enum PrintSubmissionError {
    /// Print command could not be launched
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Print command ran but reported failure
    #[error("'{command}' exited with {status} for {}", path.display())]
    ExitStatus {
        command: String,
        path: PathBuf,
        status: std::process::ExitStatus,
    },
}

/// Failure while purging scratch files or removing a processed source
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Directory path cannot be turned into a glob pattern
    #[error("Directory path is not valid UTF-8: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(String),

    /// A directory entry could not be read
    #[error("Cannot read entry in {}: {reason}", dir.display())]
    ReadEntry { dir: PathBuf, reason: String },

    /// A scratch file could not be removed
    #[error("Cannot remove {}: {source}", path.display())]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The processed source PDF could not be removed
    #[error("Cannot delete source PDF {}: {source}", path.display())]
    RemoveSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to prepare or subscribe to the watched directory
#[derive(Error, Debug)]
pub enum WatchSetupError {
    /// Watched directory is missing and could not be created
    #[error("Cannot create watched directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Watched path exists but is a file
    #[error("Watched path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The filesystem watcher could not be started
    #[error("Cannot watch directory: {0}")]
    Subscribe(#[from] notify::Error),
}
