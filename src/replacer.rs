//! Placeholder substitution for file contents and template paths.
//!
//! Four delimiter grammars are recognised and can be toggled independently:
//! `{{name}}`, `<<name>>`, `__name__` and `%name%`. Substitution is literal:
//! only names present in the variable set are replaced, everything else is
//! left verbatim.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::bytes;
use serde::{Deserialize, Serialize};

use crate::error::{StencilError, StencilResult};

/// Variable name to replacement value. Display order follows insertion order.
pub type Variables = IndexMap<String, String>;

static BRACES_PATTERN: LazyLock<bytes::Regex> =
    LazyLock::new(|| bytes::Regex::new(r"\{\{([^}]+)\}\}").expect("valid braces pattern"));
static ANGLE_BRACKETS_PATTERN: LazyLock<bytes::Regex> =
    LazyLock::new(|| bytes::Regex::new(r"<<([^>]+)>>").expect("valid angle brackets pattern"));
static UNDERSCORES_PATTERN: LazyLock<bytes::Regex> = LazyLock::new(|| {
    bytes::Regex::new(r"__([A-Za-z0-9_]+)__").expect("valid underscores pattern")
});
static PERCENT_PATTERN: LazyLock<bytes::Regex> =
    LazyLock::new(|| bytes::Regex::new(r"%([A-Za-z0-9_]+)%").expect("valid percent pattern"));

/// A placeholder delimiter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `{{name}}`
    Braces,
    /// `<<name>>`
    AngleBrackets,
    /// `__name__`
    Underscores,
    /// `%name%`
    Percent,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Braces,
        Format::AngleBrackets,
        Format::Underscores,
        Format::Percent,
    ];

    /// Wraps `name` in this format's delimiters.
    pub fn wrap(&self, name: &str) -> String {
        match self {
            Format::Braces => format!("{{{{{name}}}}}"),
            Format::AngleBrackets => format!("<<{name}>>"),
            Format::Underscores => format!("__{name}__"),
            Format::Percent => format!("%{name}%"),
        }
    }

    /// Extraction pattern; capture group 1 is the variable name.
    fn pattern(&self) -> &'static bytes::Regex {
        match self {
            Format::Braces => &BRACES_PATTERN,
            Format::AngleBrackets => &ANGLE_BRACKETS_PATTERN,
            Format::Underscores => &UNDERSCORES_PATTERN,
            Format::Percent => &PERCENT_PATTERN,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wrap("var"))
    }
}

/// Which placeholder formats are active. Every format is enabled unless
/// explicitly turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Formats {
    pub enable_braces: bool,
    pub enable_angle_brackets: bool,
    pub enable_underscores: bool,
    pub enable_percent: bool,
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            enable_braces: true,
            enable_angle_brackets: true,
            enable_underscores: true,
            enable_percent: true,
        }
    }
}

impl Formats {
    /// No format enabled; substitution becomes the identity.
    pub fn none() -> Self {
        Self {
            enable_braces: false,
            enable_angle_brackets: false,
            enable_underscores: false,
            enable_percent: false,
        }
    }

    /// Only `format` enabled.
    pub fn only(format: Format) -> Self {
        Self::none().with(format, true)
    }

    pub fn with(mut self, format: Format, enabled: bool) -> Self {
        match format {
            Format::Braces => self.enable_braces = enabled,
            Format::AngleBrackets => self.enable_angle_brackets = enabled,
            Format::Underscores => self.enable_underscores = enabled,
            Format::Percent => self.enable_percent = enabled,
        }
        self
    }

    pub fn is_enabled(&self, format: Format) -> bool {
        match format {
            Format::Braces => self.enable_braces,
            Format::AngleBrackets => self.enable_angle_brackets,
            Format::Underscores => self.enable_underscores,
            Format::Percent => self.enable_percent,
        }
    }

    /// Enabled formats in a fixed order.
    pub fn enabled(&self) -> impl Iterator<Item = Format> + '_ {
        Format::ALL
            .into_iter()
            .filter(|format| self.is_enabled(*format))
    }
}

/// Substitutes variables into file contents and template paths.
///
/// All `(variable, format)` placeholders are compiled into one literal
/// alternation when the replacer is built, longest placeholder first, and
/// applied in a single pass. A substituted value is never scanned again.
#[derive(Debug, Clone)]
pub struct Replacer {
    variables: Variables,
    formats: Formats,
    content_matcher: Option<bytes::Regex>,
    path_matcher: Option<regex::Regex>,
    values: HashMap<Vec<u8>, String>,
}

impl Replacer {
    /// Creates a replacer for `variables` using the `formats` that are enabled.
    ///
    /// # Errors
    /// * `StencilError::ConfigError` if the combined matcher exceeds the regex size limit
    pub fn new(variables: Variables, formats: Formats) -> StencilResult<Self> {
        let mut values = HashMap::new();
        for (name, value) in &variables {
            if name.is_empty() {
                debug!("Skipping variable with an empty name");
                continue;
            }
            for format in formats.enabled() {
                values
                    .entry(format.wrap(name).into_bytes())
                    .or_insert_with(|| value.clone());
            }
        }

        let mut needles: Vec<&str> = values
            .keys()
            .map(|needle| std::str::from_utf8(needle).unwrap_or_default())
            .collect();
        needles.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let (content_matcher, path_matcher) = if needles.is_empty() {
            (None, None)
        } else {
            let pattern = needles
                .iter()
                .map(|needle| regex::escape(needle))
                .collect::<Vec<_>>()
                .join("|");
            let content = bytes::Regex::new(&pattern).map_err(|e| {
                StencilError::ConfigError(format!("Failed to build placeholder matcher: {e}"))
            })?;
            let path = regex::Regex::new(&pattern).map_err(|e| {
                StencilError::ConfigError(format!("Failed to build placeholder matcher: {e}"))
            })?;
            (Some(content), Some(path))
        };

        Ok(Self {
            variables,
            formats,
            content_matcher,
            path_matcher,
            values,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn formats(&self) -> Formats {
        self.formats
    }

    /// Replaces every known placeholder in a file's content.
    pub fn replace_in_content(&self, content: &[u8]) -> Vec<u8> {
        match &self.content_matcher {
            Some(matcher) => matcher
                .replace_all(content, |caps: &bytes::Captures<'_>| {
                    self.value_for(&caps[0])
                        .map(|v| v.as_bytes().to_vec())
                        .unwrap_or_else(|| caps[0].to_vec())
                })
                .into_owned(),
            None => content.to_vec(),
        }
    }

    /// Replaces every known placeholder in a relative template path.
    pub fn replace_in_path(&self, path: &str) -> String {
        match &self.path_matcher {
            Some(matcher) => matcher
                .replace_all(path, |caps: &regex::Captures<'_>| {
                    self.value_for(caps[0].as_bytes())
                        .map(str::to_string)
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => path.to_string(),
        }
    }

    fn value_for(&self, placeholder: &[u8]) -> Option<&str> {
        self.values.get(placeholder).map(String::as_str)
    }
}

/// Collects the distinct variable names referenced in `content`, considering
/// only the enabled formats. Names are returned in lexicographic order.
pub fn extract_variables(content: &[u8], formats: Formats) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for format in formats.enabled() {
        for caps in format.pattern().captures_iter(content) {
            if let Some(name) = caps.get(1) {
                names.insert(String::from_utf8_lossy(name.as_bytes()).into_owned());
            }
        }
    }
    names
}

/// Path flavour of [`extract_variables`].
pub fn extract_variables_from_path(path: &str, formats: Formats) -> BTreeSet<String> {
    extract_variables(path.as_bytes(), formats)
}
