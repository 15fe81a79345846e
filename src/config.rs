//! Configuration handling for Stencil.
//! Loads the optional configuration file (JSON or YAML), fills in defaults and
//! merges command-line overrides on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::constants::{CONFIG_FILES, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_DIR};
use crate::error::{StencilError, StencilResult};
use crate::replacer::{Format, Formats, Variables};

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Source template directory
    pub template_dir: PathBuf,
    /// Target output directory
    pub output_dir: PathBuf,
    /// Key-value pairs for replacement
    pub variables: Variables,
    /// Prompt for variable values
    pub interactive: bool,
    /// Report what would be generated without creating files
    pub dry_run: bool,
    /// Skip the confirmation prompt in interactive mode
    pub skip_confirm: bool,
    /// Enabled placeholder formats
    pub formats: Formats,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            variables: Variables::new(),
            interactive: false,
            dry_run: false,
            skip_confirm: false,
            formats: Formats::default(),
        }
    }
}

impl Config {
    /// Parses configuration content, trying JSON first and YAML second.
    ///
    /// # Errors
    /// * `StencilError::ConfigError` if the content is neither valid JSON nor valid YAML
    pub fn parse(content: &str) -> StencilResult<Self> {
        match serde_json::from_str::<Self>(content) {
            Ok(config) => Ok(config),
            Err(json_err) => {
                debug!("Not JSON ({json_err}), trying YAML");
                serde_yaml::from_str(content).map_err(|e| {
                    StencilError::ConfigError(format!("Invalid configuration format: {e}"))
                })
            }
        }
    }

    /// Loads configuration from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> StencilResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            StencilError::ConfigError(format!(
                "failed to load config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::parse(&content).map_err(|e| match e {
            StencilError::ConfigError(reason) => StencilError::ConfigError(format!(
                "failed to load config file '{}': {reason}",
                path.display()
            )),
            other => other,
        })
    }

    /// Writes the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> StencilResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StencilError::process("create directory", parent, e))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            StencilError::ConfigError(format!("failed to serialize configuration: {e}"))
        })?;
        fs::write(path, content).map_err(|e| StencilError::process("write", path, e))
    }

    /// Applies command-line overrides. Only values given on the command line
    /// replace configured ones; variables are merged with the command line
    /// winning.
    pub fn merge_args(&mut self, args: &Args) {
        if let Some(template_dir) = &args.template_dir {
            self.template_dir = template_dir.clone();
        }
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(vars) = &args.vars {
            self.variables.extend(parse_vars(vars));
        }
        self.interactive |= args.interactive;
        self.dry_run |= args.dry_run;
        self.skip_confirm |= args.skip_confirm;

        for (disabled, format) in [
            (args.no_braces, Format::Braces),
            (args.no_angle_brackets, Format::AngleBrackets),
            (args.no_underscores, Format::Underscores),
            (args.no_percent, Format::Percent),
        ] {
            if disabled {
                self.formats = self.formats.with(format, false);
            }
        }
    }
}

/// Returns the first known configuration file present in `dir`.
pub fn find_config_file<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.as_ref().join(name))
        .find(|path| path.is_file())
}

/// Parses inline assignments of the form `key1=value1,key2=value2`.
/// Keys and values are trimmed; malformed entries are skipped.
pub fn parse_vars(vars: &str) -> Variables {
    let mut variables = Variables::new();
    for assignment in vars.split(',') {
        if assignment.trim().is_empty() {
            continue;
        }
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                variables.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => warn!(
                "Ignoring malformed variable assignment '{}'",
                assignment.trim()
            ),
        }
    }
    variables
}

/// Resolves the effective configuration: an explicit `--config` file, else an
/// auto-detected one in the working directory, else defaults; command-line
/// overrides are applied last.
///
/// # Returns
/// * The merged configuration and the configuration file that was used, if any
pub fn get_config(args: &Args) -> StencilResult<(Config, Option<PathBuf>)> {
    let config_file = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config_file("."),
    };

    let mut config = match &config_file {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.merge_args(args);

    Ok((config, config_file))
}
