//! Stencil's main application entry point and orchestration logic.
//! Handles command-line argument parsing, configuration resolution, the
//! interactive flow and template generation.

use stencil::{
    cli::{get_args, Args},
    config::{get_config, Config},
    error::{default_error_handler, StencilError, StencilResult},
    logger::init_logger,
    processor::{validate_template_root, Processor},
    prompt::{interactive_variables, DialoguerPrompter},
    replacer::Replacer,
};

const GETTING_STARTED: &str = r#"GETTING STARTED:

  Option 1: Use a config file (recommended)
    1. Create a stencil.json file:
       {
         "templateDir": "./path/to/your/template",
         "outputDir": "./output",
         "variables": {
           "project_name": "myproject"
         }
       }

    2. Run: stencil

  Option 2: Use command-line flags
    stencil -t ./path/to/template -o ./output

  Option 3: Try the demo template
    stencil -t ./demos/template-go-basic -o ./myproject -i

  For more information, run: stencil --help
"#;

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        if let StencilError::TemplateDoesNotExistsError { .. } = err {
            eprintln!("{err}\n");
            eprint!("{GETTING_STARTED}");
            std::process::exit(1);
        }
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves configuration (config file, then command-line overrides)
/// 2. Optionally saves the resolved configuration
/// 3. Validates the template directory
/// 4. Collects variables interactively when requested
/// 5. Generates the project (or previews it in a dry run)
fn run(args: Args) -> StencilResult<()> {
    let (mut config, config_file) = get_config(&args)?;
    if let Some(config_file) = config_file {
        println!("Using config file: {}", config_file.display());
    }

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Saved configuration to {}", path.display());
    }

    validate_template_root(&config.template_dir)?;

    if config.interactive {
        println!("=== Stencil - Interactive Mode ===");
        let prompter = DialoguerPrompter::new();
        match interactive_variables(&prompter, &config)? {
            Some(variables) => config.variables = variables,
            None => return Ok(()),
        }
        println!("\nGenerating project...");
    }

    generate(&config)
}

fn generate(config: &Config) -> StencilResult<()> {
    let replacer = Replacer::new(config.variables.clone(), config.formats)?;
    let processor = Processor::new(
        &replacer,
        &config.template_dir,
        &config.output_dir,
        config.dry_run,
    );

    // Report each entry as it is produced so a failure leaves a trail.
    processor.generate_with(|action| println!("{action}"))?;

    println!(
        "\nProject generated successfully in {}.",
        config.output_dir.display()
    );
    if config.dry_run {
        println!("  (This was a dry run - no files were actually created)");
    }
    Ok(())
}
