use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tinytest::cli::{Cli, RunOptions, Selection, list_suites, select};
use tinytest::report::OutputKind;
use tinytest::settings::{Settings, load_settings};
use tinytest::{CaseDefinition, RunnableSuite, SuiteDefinition};

#[test]
fn loads_and_trims_settings_from_yaml() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("tinytest.yaml");
    let yaml = r#"
Parallel: true
Output: terse
Suites: [ "  Parser ", "Lexer", "   " ]
Colour: false
"#;
    fs::write(&file, yaml)?;

    let settings = load_settings(&file)?;
    assert!(settings.parallel);
    assert_eq!(settings.output, OutputKind::Terse);
    assert_eq!(settings.suites, ["Parser", "Lexer"]);
    assert_eq!(settings.color, Some(false));
    assert!(!settings.verbose);
    Ok(())
}

#[test]
fn missing_file_names_the_path() {
    let err = load_settings(Path::new("/nonexistent/tinytest.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/tinytest.yaml"));
}

#[test]
fn bad_output_kind_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("bad.yaml");
    fs::write(&file, "Output: loud\n")?;
    assert!(load_settings(&file).is_err());
    Ok(())
}

#[test]
fn settings_apply_when_the_command_line_is_silent() {
    let settings = Settings {
        parallel: true,
        output: OutputKind::Final,
        suites: vec!["Lexer".into()],
        ..Settings::default()
    };
    let options = RunOptions::merge(&Cli::default(), settings);
    assert!(options.parallel);
    assert_eq!(options.output, OutputKind::Final);
    assert_eq!(options.suites, ["Lexer"]);
    assert_eq!(options.color, None);
}

fn suites() -> Vec<Box<dyn RunnableSuite>> {
    vec![
        Box::new(
            SuiteDefinition::new("Lexer", |s: &'static str| s.len())
                .case(CaseDefinition::new("len", 3, ("abc",))),
        ),
        Box::new(SuiteDefinition::<bool, ()>::new("Parser", || true)),
    ]
}

fn labels(selection: Selection) -> Vec<String> {
    match selection {
        Selection::Run(suites) => suites.iter().map(|s| s.label().to_string()).collect(),
        Selection::List => vec!["<list>".to_string()],
    }
}

#[test]
fn selects_by_label_or_number_in_declaration_order() -> Result<()> {
    let picked = select(suites(), &["Parser".to_string(), "1".to_string()])?;
    assert_eq!(labels(picked), ["Lexer", "Parser"]);
    assert_eq!(labels(select(suites(), &[])?), ["Lexer", "Parser"]);
    assert_eq!(labels(select(suites(), &["list".to_string()])?), ["<list>"]);
    Ok(())
}

#[test]
fn unknown_selection_is_an_error() {
    assert!(select(suites(), &["Codegen".to_string()]).is_err());
    assert!(select(suites(), &["3".to_string()]).is_err());
}

#[test]
fn lists_suites_with_case_counts() {
    assert_eq!(
        list_suites(&suites()),
        "Available suites:\n  1. Lexer (1 cases)\n  2. Parser (0 cases)\n"
    );
}
