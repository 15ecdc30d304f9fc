pub mod apply;
pub mod cli;
pub mod compare;
pub mod engine;
pub mod format;
pub mod hooks;
pub mod narration;
pub mod report;
pub mod results;
pub mod settings;
pub mod types;

pub use crate::engine::{
    CaseFault, QuietContainedPanics, RunnableSuite, execute_suite, execute_suite_with, raise,
    run_case, run_suites,
};
pub use crate::format::{Pretty, format, format_plain};
pub use crate::hooks::coalesce;
pub use crate::narration::capture;
pub use crate::report::format_report;
pub use crate::results::ResultCounter;
pub use crate::types::{CaseDefinition, CompareFn, Hook, SuiteDefinition, TestFn};
