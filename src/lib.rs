//! Stencil is a project scaffolding generator.
//! It copies a template directory to an output location, substituting variable
//! placeholders in file contents, file names and directory names.

/// Binary file detection
pub mod binary;

/// Command-line interface module for the Stencil application
pub mod cli;

/// Configuration loading and command-line merging
/// Supports JSON and YAML formats (stencil.json, stencil.yml, ...)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for the Stencil application
pub mod error;

/// Logger setup
pub mod logger;

/// Template tree generation and variable discovery
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder extraction and substitution
pub mod replacer;
