//! Common constants used throughout the Stencil application.

/// Configuration file names checked in the working directory, in order.
pub const CONFIG_FILES: [&str; 5] = [
    "stencil.json",
    ".stencil.json",
    "stencil.config.json",
    "stencil.yml",
    "stencil.yaml",
];

/// Number of leading bytes inspected by the binary classifier.
pub const BINARY_SNIFF_LEN: usize = 512;

/// Number of characters shown in a dry-run content preview.
pub const PREVIEW_LEN: usize = 200;

/// Default template directory when neither the config nor the CLI names one.
pub const DEFAULT_TEMPLATE_DIR: &str = "./template";

/// Default output directory when neither the config nor the CLI names one.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
