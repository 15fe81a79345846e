use std::fs;
use std::path::PathBuf;

use clap::Parser;
use stencil::{
    cli::Args,
    config::{find_config_file, parse_vars, Config},
    error::StencilError,
    replacer::{Format, Formats, Variables},
};
use tempfile::TempDir;

fn args(list: &[&str]) -> Args {
    let argv = std::iter::once("stencil").chain(list.iter().copied());
    Args::try_parse_from(argv).unwrap()
}

fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.template_dir, PathBuf::from("./template"));
    assert_eq!(config.output_dir, PathBuf::from("./output"));
    assert!(config.variables.is_empty());
    assert!(!config.interactive && !config.dry_run && !config.skip_confirm);
    assert_eq!(config.formats, Formats::default());
}

#[test]
fn test_parse_json() {
    let config = Config::parse(
        r#"{
            "templateDir": "./tpl",
            "outputDir": "./out",
            "variables": {"project_name": "MyApp", "author": "John"},
            "dryRun": true,
            "formats": {"enablePercent": false}
        }"#,
    )
    .unwrap();

    assert_eq!(config.template_dir, PathBuf::from("./tpl"));
    assert_eq!(config.output_dir, PathBuf::from("./out"));
    assert_eq!(
        config.variables,
        vars(&[("project_name", "MyApp"), ("author", "John")])
    );
    assert!(config.dry_run);
    assert!(!config.interactive);
    // Unlisted formats stay enabled.
    assert_eq!(
        config.formats,
        Formats::default().with(Format::Percent, false)
    );
}

#[test]
fn test_parse_yaml() {
    let content = "templateDir: ./tpl\nvariables:\n  name: World\nskipConfirm: true\n";
    let config = Config::parse(content).unwrap();

    assert_eq!(config.template_dir, PathBuf::from("./tpl"));
    assert_eq!(config.output_dir, PathBuf::from("./output"));
    assert_eq!(config.variables, vars(&[("name", "World")]));
    assert!(config.skip_confirm);
}

#[test]
fn test_parse_invalid() {
    let result = Config::parse("templateDir: [unclosed");
    assert!(matches!(result, Err(StencilError::ConfigError(_))));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::load(temp_dir.path().join("stencil.json"));
    match result {
        Err(StencilError::ConfigError(msg)) => assert!(msg.contains("stencil.json")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/stencil.json");
    let config = Config {
        variables: vars(&[("b", "2"), ("a", "1")]),
        formats: Formats::only(Format::Braces),
        ..Config::default()
    };

    config.save(&path).unwrap();
    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\"templateDir\""));
    assert!(saved.contains("\"enableBraces\": true"));

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
    let keys: Vec<&str> = loaded.variables.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["b", "a"]);
}

#[test]
fn test_find_config_file_order() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    assert_eq!(find_config_file(dir), None);

    fs::write(dir.join("stencil.yaml"), "{}").unwrap();
    assert_eq!(find_config_file(dir), Some(dir.join("stencil.yaml")));

    fs::write(dir.join(".stencil.json"), "{}").unwrap();
    assert_eq!(find_config_file(dir), Some(dir.join(".stencil.json")));

    fs::write(dir.join("stencil.json"), "{}").unwrap();
    assert_eq!(find_config_file(dir), Some(dir.join("stencil.json")));
}

#[test]
fn test_parse_vars() {
    assert_eq!(
        parse_vars("project_name=MyApp, author = John Doe ,url=http://x?a=b"),
        vars(&[
            ("project_name", "MyApp"),
            ("author", "John Doe"),
            ("url", "http://x?a=b"),
        ])
    );
}

#[test]
fn test_parse_vars_skips_malformed() {
    assert_eq!(
        parse_vars("novalue,=orphan,,ok=1,empty="),
        vars(&[("ok", "1"), ("empty", "")])
    );
    assert!(parse_vars("").is_empty());
}

#[test]
fn test_merge_args_overrides_only_given_values() {
    let mut config = Config {
        template_dir: PathBuf::from("./from-file"),
        output_dir: PathBuf::from("./file-out"),
        variables: vars(&[("name", "File"), ("author", "Jane")]),
        ..Config::default()
    };

    let cli = args(&["-o", "./cli-out", "-v", "name=Cli,version=2", "--dry-run"]);
    config.merge_args(&cli);

    assert_eq!(config.template_dir, PathBuf::from("./from-file"));
    assert_eq!(config.output_dir, PathBuf::from("./cli-out"));
    assert_eq!(
        config.variables,
        vars(&[("name", "Cli"), ("author", "Jane"), ("version", "2")])
    );
    assert!(config.dry_run);
    assert!(!config.interactive);
}

#[test]
fn test_merge_args_keeps_file_flags() {
    let mut config = Config {
        interactive: true,
        skip_confirm: true,
        ..Config::default()
    };
    config.merge_args(&args(&[]));
    assert!(config.interactive);
    assert!(config.skip_confirm);
}

#[test]
fn test_merge_args_disables_formats() {
    let mut config = Config::default();
    config.merge_args(&args(&["--no-percent", "--no-angle-brackets"]));

    assert!(config.formats.is_enabled(Format::Braces));
    assert!(!config.formats.is_enabled(Format::AngleBrackets));
    assert!(config.formats.is_enabled(Format::Underscores));
    assert!(!config.formats.is_enabled(Format::Percent));
}
