//! Error handling for the Stencil application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Custom error types for Stencil operations.
///
/// This enum represents all possible errors that can occur within the Stencil application.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(Error, Debug)]
pub enum StencilError {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A single template entry could not be processed.
    #[error("Failed to {operation} '{path}': {source}.")]
    ProcessError {
        operation: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    /// Represents errors raised while traversing the template tree
    #[error("Template walk error: {0}.")]
    WalkError(#[from] walkdir::Error),

    #[error("Template directory does not exist: '{template_dir}'.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Template path is not a directory: '{template_dir}'.")]
    TemplateNotADirectoryError { template_dir: String },

    /// Template paths must be valid UTF-8 and live under the template root.
    #[error("Invalid template path '{path}': {reason}.")]
    InvalidPathError { path: String, reason: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors that occur while talking to the terminal
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

impl StencilError {
    /// Wraps an I/O error with the operation and the offending path.
    pub fn process<P: AsRef<Path>>(operation: &'static str, path: P, source: io::Error) -> Self {
        StencilError::ProcessError {
            operation,
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Convenience type alias for Results with StencilError as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type StencilResult<T> = Result<T, StencilError>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The StencilError to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: StencilError) {
    eprintln!("{err}");
    std::process::exit(1);
}
