use crate::results::ResultCounter;
use colored::Colorize;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Narration followed by the full report.
    #[default]
    Normal,
    /// The full report without narration.
    Terse,
    /// Only the one-line totals.
    Final,
}

impl OutputKind {
    pub fn shows_narration(self) -> bool {
        matches!(self, OutputKind::Normal)
    }
}

/// The summary report: message sections (only when non-empty) and the totals.
pub fn format_report(results: &ResultCounter) -> String {
    let mut out = String::new();
    if !results.skip_messages().is_empty() {
        out.push_str("Skipped:\n");
        for message in results.skip_messages() {
            out.push_str(&format!("🚧Skipped: {message}\n"));
        }
    }
    if !results.failure_messages().is_empty() {
        out.push_str("Failures:\n");
        for message in results.failure_messages() {
            out.push_str(&format!("❌FAILED: {message}\n"));
        }
    }
    if !results.error_messages().is_empty() {
        out.push_str("Errors:\n");
        for message in results.error_messages() {
            out.push_str(&format!("🔥ERROR: {message}\n"));
        }
    }
    out.push_str(&format!("Total tests: {}\n", results.total()));
    out.push_str(&format!("Passed:      {} ✅\n", results.passed()));
    out.push_str(&format!("Failed:      {} ❌\n", results.failed()));
    out.push_str(&format!("Skipped:     {} 🚧\n", results.skipped()));
    out.push_str(&format!("Errors:      {} 🔥\n", results.errors()));
    out
}

pub fn format_final(results: &ResultCounter) -> String {
    format!(
        "Total: {}, Passed: {}, Failed: {}, Skipped: {}, Errors: {}",
        results.total(),
        results.passed(),
        results.failed(),
        results.skipped(),
        results.errors()
    )
}

pub fn print_report(results: &ResultCounter, kind: OutputKind) {
    match kind {
        OutputKind::Normal | OutputKind::Terse => print!("{}", format_report(results)),
        OutputKind::Final => {
            let line = format_final(results);
            if results.is_success() {
                println!("{}", line.green());
            } else {
                println!("{}", line.red().bold());
            }
        }
    }
}
