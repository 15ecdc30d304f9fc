use anyhow::Result;
use std::process::ExitCode;
use tinytest::compare::sequence_mismatch;
use tinytest::{CaseDefinition, RunnableSuite, SuiteDefinition, cli, raise};
use tracing::debug;

fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

fn parse_port(text: &str) -> u16 {
    text.trim().parse().unwrap_or_else(|e| raise(e))
}

fn sorted(mut values: Vec<i32>) -> Vec<i32> {
    values.sort_unstable();
    values
}

fn demo_suites() -> Vec<Box<dyn RunnableSuite>> {
    let text = SuiteDefinition::new("Text::reverse", |s: &'static str| reverse(s)).cases([
        CaseDefinition::new("reverses ascii", "cba".to_string(), ("abc",)),
        CaseDefinition::new("keeps empty text", String::new(), ("",)),
        CaseDefinition::new("reverses by character", "cbå".to_string(), ("åbc",)),
    ]);

    // The failed parse records an error and then matches the default port 0.
    let ports = SuiteDefinition::new("Config::parse_port", |s: &'static str| parse_port(s))
        .before_all(|| debug!("port suite starting"))
        .after_all(|| debug!("port suite done"))
        .cases([
            CaseDefinition::new("plain number", 8080u16, ("8080",)),
            CaseDefinition::new("surrounding blanks", 443, (" 443 ",)),
            CaseDefinition::new("not a number", 0, ("http",)),
        ]);

    let sorting = SuiteDefinition::new("Collections::sorted", sorted)
        .compare(|expected: &Vec<i32>, actual: &Vec<i32>| {
            sequence_mismatch(expected, actual).is_none()
        })
        .cases([
            CaseDefinition::new("already sorted", vec![1, 2, 3], (vec![1, 2, 3],)),
            CaseDefinition::new("reversed", vec![1, 2, 3], (vec![3, 2, 1],)),
            CaseDefinition::new("with duplicates", vec![1, 1, 2], (vec![2, 1, 1],)),
        ]);

    let arithmetic = SuiteDefinition::new("Math::add", |a: i64, b: i64| a + b).cases([
        CaseDefinition::new("small numbers", 3, (1, 2)),
        CaseDefinition::new("negative numbers", -5, (-2, -3)),
        CaseDefinition::new("overflowing", 0, (i64::MAX, 1)).disabled(),
    ]);

    let network = SuiteDefinition::new("Network::resolve", |host: &'static str| host.len())
        .case(CaseDefinition::new("localhost", 9, ("localhost",)))
        .disabled();

    let pending = SuiteDefinition::<bool, ()>::new("Pending", || true);

    vec![
        Box::new(text),
        Box::new(ports),
        Box::new(sorting),
        Box::new(arithmetic),
        Box::new(network),
        Box::new(pending),
    ]
}

fn main() -> Result<ExitCode> {
    cli::run(demo_suites())
}
