//! User input and interaction handling.
//! Collects variable values from the terminal for interactive generation.

use dialoguer::{Confirm, Input};
use log::debug;

use crate::config::Config;
use crate::error::{StencilError, StencilResult};
use crate::processor::scan_template;
use crate::replacer::Variables;

/// Source of user answers.
pub trait Prompter {
    /// Asks for a free-form value. An empty answer means "keep the default".
    fn input(&self, prompt: &str, default: &str) -> StencilResult<String>;

    /// Asks a yes/no question. Returns `true` without asking when `skip` is set.
    fn confirm(&self, skip: bool, prompt: String) -> StencilResult<bool>;
}

/// Terminal prompter backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: &str) -> StencilResult<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(|e| StencilError::PromptError(e.to_string()))
    }

    fn confirm(&self, skip: bool, prompt: String) -> StencilResult<bool> {
        if skip {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| StencilError::PromptError(e.to_string()))
    }
}

/// Uses configured values as defaults for the discovered names.
pub fn seed_defaults(discovered: Variables, configured: &Variables) -> Variables {
    discovered
        .into_iter()
        .map(|(name, default)| {
            let default = configured.get(&name).cloned().unwrap_or(default);
            (name, default)
        })
        .collect()
}

/// Prompts for each variable in order. Empty answers keep the default.
///
/// # Returns
/// * Variables with the same names as `variables`, in the same order
pub fn collect_values(
    prompter: &dyn Prompter,
    variables: &Variables,
) -> StencilResult<Variables> {
    let total = variables.len();
    let mut values = Variables::with_capacity(total);

    for (index, (name, default)) in variables.iter().enumerate() {
        let prompt = format!("[{}/{}] {}", index + 1, total, name);
        let answer = prompter.input(&prompt, default)?;
        let answer = answer.trim();
        let value = if answer.is_empty() {
            default.clone()
        } else {
            answer.to_string()
        };
        values.insert(name.clone(), value);
    }

    Ok(values)
}

/// Runs the interactive flow: scan the template, ask for every discovered
/// variable, show a summary and ask for confirmation.
///
/// # Returns
/// * `Some(variables)` to generate with, or `None` when the user declined
pub fn interactive_variables(
    prompter: &dyn Prompter,
    config: &Config,
) -> StencilResult<Option<Variables>> {
    println!("Scanning template for variables...");
    let discovered = scan_template(&config.template_dir, config.formats)?;

    if discovered.is_empty() {
        println!("No variables found in template.");
        return Ok(Some(config.variables.clone()));
    }
    println!("Found {} variables in template.", discovered.len());

    let defaults = seed_defaults(discovered, &config.variables);
    let values = collect_values(prompter, &defaults)?;

    println!("\nTemplate: {}", config.template_dir.display());
    println!("Output: {}", config.output_dir.display());
    println!("Variables:");
    for (name, value) in &values {
        println!("  {name} = {value}");
    }

    if !prompter.confirm(config.skip_confirm, "Proceed with generation?".to_string())? {
        println!("Generation cancelled.");
        return Ok(None);
    }

    let mut variables = config.variables.clone();
    variables.extend(values);
    debug!("Generating with {} variable(s)", variables.len());
    Ok(Some(variables))
}
