use assert_cmd::cargo::cargo_bin_cmd;
use clap::Parser;
use predicates::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use stencil::cli::Args;
use tempfile::TempDir;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stencil")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_no_args() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();

    assert_eq!(parsed.template_dir, None);
    assert_eq!(parsed.output_dir, None);
    assert_eq!(parsed.config, None);
    assert_eq!(parsed.vars, None);
    assert!(!parsed.interactive);
    assert!(!parsed.dry_run);
    assert!(!parsed.skip_confirm);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--template",
        "./template",
        "--output",
        "./output",
        "--config",
        "stencil.json",
        "--vars",
        "name=World",
        "--interactive",
        "--dry-run",
        "--yes",
        "--no-braces",
        "--no-angle-brackets",
        "--no-underscores",
        "--no-percent",
        "--save-config",
        "saved.json",
        "--verbose",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template_dir, Some(PathBuf::from("./template")));
    assert_eq!(parsed.output_dir, Some(PathBuf::from("./output")));
    assert_eq!(parsed.config, Some(PathBuf::from("stencil.json")));
    assert_eq!(parsed.vars.as_deref(), Some("name=World"));
    assert!(parsed.interactive);
    assert!(parsed.dry_run);
    assert!(parsed.skip_confirm);
    assert!(parsed.no_braces && parsed.no_angle_brackets);
    assert!(parsed.no_underscores && parsed.no_percent);
    assert_eq!(parsed.save_config, Some(PathBuf::from("saved.json")));
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&[
        "-t", "tpl", "-o", "out", "-c", "cfg.json", "-v", "a=1", "-i", "-y",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template_dir, Some(PathBuf::from("tpl")));
    assert_eq!(parsed.output_dir, Some(PathBuf::from("out")));
    assert_eq!(parsed.config, Some(PathBuf::from("cfg.json")));
    assert_eq!(parsed.vars.as_deref(), Some("a=1"));
    assert!(parsed.interactive);
    assert!(parsed.skip_confirm);
}

#[test]
fn test_unknown_flag() {
    assert!(Args::try_parse_from(make_args(&["--force"])).is_err());
}

#[test]
fn test_binary_help_and_version() {
    cargo_bin_cmd!("stencil")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("__variable__"));

    cargo_bin_cmd!("stencil")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_binary_bad_flag_exits_with_one() {
    cargo_bin_cmd!("stencil").arg("--bogus").assert().code(1);
}

#[test]
fn test_binary_missing_template() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(temp_dir.path())
        .args(["-t", "missing", "-o", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template directory does not exist"))
        .stderr(predicate::str::contains("GETTING STARTED"));

    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_binary_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("stencil.json"), "templateDir: [oops").unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load config file"));
}

#[test]
fn test_binary_generates_project() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    fs::create_dir_all(&template).unwrap();
    fs::write(template.join("README.md"), "Hello {{name}}!").unwrap();
    fs::write(template.join("__name__.txt"), "v%version%").unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(temp_dir.path())
        .args(["-t", "template", "-o", "out", "-v", "name=World,version=1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project generated successfully"));

    let out = temp_dir.path().join("out");
    assert_eq!(
        fs::read_to_string(out.join("README.md")).unwrap(),
        "Hello World!"
    );
    assert_eq!(fs::read_to_string(out.join("World.txt")).unwrap(), "v1.0");
}

#[test]
fn test_binary_uses_detected_config_and_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    fs::create_dir_all(&template).unwrap();
    fs::write(template.join("README.md"), "Hello {{name}}!").unwrap();
    fs::write(
        temp_dir.path().join("stencil.json"),
        r#"{"templateDir": "template", "outputDir": "out", "variables": {"name": "Config"}}"#,
    )
    .unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using config file"))
        .stdout(predicate::str::contains("[DRY RUN] Would create file:"))
        .stdout(predicate::str::contains("Hello Config!"));

    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_binary_save_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("template")).unwrap();

    cargo_bin_cmd!("stencil")
        .current_dir(temp_dir.path())
        .args(["-t", "template", "-o", "out", "-v", "a=1", "--no-percent"])
        .args(["--save-config", "saved/stencil.json", "--dry-run"])
        .assert()
        .success();

    let saved = fs::read_to_string(temp_dir.path().join("saved/stencil.json")).unwrap();
    assert!(saved.contains("\"a\": \"1\""));
    assert!(saved.contains("\"enablePercent\": false"));
}
