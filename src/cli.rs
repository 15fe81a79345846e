//! Command-line interface implementation for Stencil.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = r#"Configuration files are detected automatically in the working directory
(stencil.json, .stencil.json, stencil.config.json, stencil.yml, stencil.yaml).
Command-line flags override config file values.

Placeholders are replaced in file contents, file names and directory names:
  {{variable}}  <<variable>>  __variable__  %variable%

Examples:
  stencil -t ./template -o ./output -v "project_name=MyApp,author=John"
  stencil -t ./template -o ./output -i
  stencil -c config.json --dry-run"#;

/// Command-line arguments structure for Stencil.
#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    author,
    version,
    about = "Stencil: project scaffolding generator",
    long_about = None,
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Template directory path [default: ./template]
    #[arg(short, long = "template", value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Output directory path [default: ./output]
    #[arg(short, long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Configuration file path (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Variables in format 'key1=value1,key2=value2'
    #[arg(short, long, value_name = "VARS")]
    pub vars: Option<String>,

    /// Prompt for the value of every variable found in the template
    #[arg(short, long)]
    pub interactive: bool,

    /// Show what would be generated without creating files
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt in interactive mode
    #[arg(short = 'y', long = "yes")]
    pub skip_confirm: bool,

    /// Disable the {{variable}} format
    #[arg(long)]
    pub no_braces: bool,

    /// Disable the <<variable>> format
    #[arg(long)]
    pub no_angle_brackets: bool,

    /// Disable the __variable__ format
    #[arg(long)]
    pub no_underscores: bool,

    /// Disable the %variable% format
    #[arg(long)]
    pub no_percent: bool,

    /// Write the resolved configuration to FILE before generating
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 0 after printing help or version information
/// * With status code 1 on any argument error
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.use_stderr() {
                let _ = e.print();
                std::process::exit(1);
            }
            e.exit();
        }
    }
}
