use crate::compare::resolve;
use crate::format::{Pretty, format_plain};
use crate::narration::{self, Tone, emit};
use crate::results::ResultCounter;
use crate::types::{CaseDefinition, CompareFn, Hook, SuiteDefinition, TestFn};
use rayon::prelude::*;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a function under test stopped without returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseFault {
    /// A typed error, see [`raise`].
    Exception(String),
    /// An owned `String` payload, as produced by formatted panics and `unwrap`.
    String(String),
    /// A `&'static str` payload, as produced by `panic!("literal")`.
    CString(String),
    /// Any other payload.
    Unknown,
}

impl CaseFault {
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        if let Some(e) = payload.downcast_ref::<anyhow::Error>() {
            CaseFault::Exception(e.to_string())
        } else if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
            CaseFault::Exception(e.to_string())
        } else if let Some(s) = payload.downcast_ref::<String>() {
            CaseFault::String(s.clone())
        } else if let Some(s) = payload.downcast_ref::<&'static str>() {
            CaseFault::CString((*s).to_string())
        } else {
            CaseFault::Unknown
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CaseFault::Exception(msg) => format!("Caught exception \"{msg}\"."),
            CaseFault::String(msg) => format!("Caught string \"{msg}\"."),
            CaseFault::CString(msg) => format!("Caught c-string \"{msg}\"."),
            CaseFault::Unknown => {
                "Caught something that is neither an exception nor a string.".to_string()
            }
        }
    }
}

/// Aborts the current function under test with a typed error.
///
/// The case is recorded as `Caught exception "{error}".` and then scored
/// against the default value of its result type.
pub fn raise<E>(error: E) -> !
where
    E: Into<anyhow::Error>,
{
    panic::panic_any(error.into())
}

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

struct Containing(bool);

impl Containing {
    fn enter() -> Self {
        Self(CONTAINING.with(|c| c.replace(true)))
    }
}

impl Drop for Containing {
    fn drop(&mut self) {
        CONTAINING.with(|c| c.set(self.0));
    }
}

/// Runs `f`, turning a panic into a [`CaseFault`].
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R, CaseFault> {
    let _containing = Containing::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(CaseFault::from_payload)
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Keeps panics caught by [`contain`] off stderr while alive.
///
/// Other panics, such as a failing hook, still reach the previous panic hook.
/// Dropping the guard reinstalls the previous hook.
#[must_use = "contained panics are only silenced while the guard is alive"]
pub struct QuietContainedPanics {
    previous: Option<Arc<PanicHook>>,
}

impl QuietContainedPanics {
    pub fn install() -> Self {
        let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
        let fallback = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) {
                debug!(location = ?info.location(), "contained panic");
            } else {
                fallback(info);
            }
        }));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for QuietContainedPanics {
    fn drop(&mut self) {
        // set_hook panics on a panicking thread; the filtering hook stays.
        if std::thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            let _ = panic::take_hook();
            panic::set_hook(Box::new(move |info| previous(info)));
        }
    }
}

fn qualified_label(suite_label: &str, case_label: &str) -> String {
    format!("{suite_label}::{case_label}")
}

/// Records a skipped case and narrates it, with an optional reason.
pub fn skip_case(
    results: &mut ResultCounter,
    suite_label: &str,
    case_label: &str,
    reason: Option<&str>,
) {
    let qualified = qualified_label(suite_label, case_label);
    match reason {
        Some(reason) => {
            emit(
                1,
                Tone::Skip,
                &format!("🚧Skipping Test: {case_label} because {reason}"),
            );
            results.skip_with(format!("{qualified} because {reason}"));
        }
        None => {
            emit(1, Tone::Skip, &format!("🚧Skipping Test: {case_label}"));
            results.skip_with(qualified);
        }
    }
}

/// Runs one case of a suite and scores it into `results`.
///
/// Only the call to the function under test is guarded: a panicking hook or
/// comparator unwinds to the caller.
pub fn run_case<R, Args>(
    suite_label: &str,
    case: &CaseDefinition<R, Args>,
    function: &TestFn<R, Args>,
    suite_compare: Option<&CompareFn<R>>,
    results: &mut ResultCounter,
) where
    R: PartialEq + Pretty + Default,
    Args: Clone,
{
    if !case.enabled {
        debug!(suite = suite_label, case = %case.label, "case disabled");
        skip_case(results, suite_label, &case.label, None);
        return;
    }

    let qualified = qualified_label(suite_label, &case.label);
    emit(1, Tone::Plain, &format!("Beginning Test: {}", case.label));
    if let Some(before_each) = &case.before_each {
        before_each();
    }

    let comparator = resolve(case.compare.as_ref(), suite_compare);
    debug!(
        suite = suite_label,
        case = %case.label,
        compare = comparator.source(),
        "invoking function under test"
    );
    let inputs = case.inputs.clone();
    let actual = match contain(|| function(inputs)) {
        Ok(actual) => actual,
        Err(fault) => {
            let text = fault.describe();
            warn!(suite = suite_label, case = %case.label, "{text}");
            results.error_with(format!("{qualified} {text}"));
            emit(2, Tone::Error, &format!("🔥ERROR: {text}"));
            R::default()
        }
    };

    if comparator.judge(&case.expected, &actual) {
        results.pass();
        emit(2, Tone::Pass, "✅PASSED");
    } else {
        let message = format!(
            "expected: \"{}\", actual: \"{}\"",
            format_plain(&case.expected),
            format_plain(&actual)
        );
        results.fail_with(format!("{qualified} {message}"));
        emit(2, Tone::Fail, &format!("❌FAILED: {message}"));
    }

    if let Some(after_each) = &case.after_each {
        after_each();
    }
    emit(1, Tone::Plain, &format!("Ending Test: {}", case.label));
}

/// Runs a whole suite and returns its tally.
pub fn execute_suite<R, Args>(suite: &SuiteDefinition<R, Args>) -> ResultCounter
where
    R: PartialEq + Pretty + Default,
    Args: Clone,
{
    execute_suite_with(
        &suite.label,
        &suite.function,
        &suite.cases,
        suite.compare.as_ref(),
        suite.before_all.as_ref(),
        suite.after_all.as_ref(),
        suite.enabled,
    )
}

/// Same as [`execute_suite`] with the suite's parts passed separately.
pub fn execute_suite_with<R, Args>(
    label: &str,
    function: &TestFn<R, Args>,
    cases: &[CaseDefinition<R, Args>],
    suite_compare: Option<&CompareFn<R>>,
    before_all: Option<&Hook>,
    after_all: Option<&Hook>,
    enabled: bool,
) -> ResultCounter
where
    R: PartialEq + Pretty + Default,
    Args: Clone,
{
    let mut results = ResultCounter::new();

    if !enabled {
        debug!(suite = label, cases = cases.len(), "suite disabled");
        emit(
            0,
            Tone::Skip,
            &format!("🚧Skipping suite: {label} because it is disabled."),
        );
        for case in cases {
            skip_case(
                &mut results,
                label,
                &case.label,
                Some("the suite is disabled."),
            );
        }
        return results;
    }

    if cases.is_empty() {
        debug!(suite = label, "suite empty");
        emit(
            0,
            Tone::Skip,
            &format!("🚧Skipping suite: {label} because it is empty."),
        );
        return results;
    }

    debug!(suite = label, cases = cases.len(), "beginning suite");
    emit(0, Tone::Banner, &format!("🚀Beginning Suite: {label}"));
    if let Some(before_all) = before_all {
        before_all();
    }

    for case in cases {
        run_case(label, case, function, suite_compare, &mut results);
    }

    if let Some(after_all) = after_all {
        after_all();
    }
    emit(0, Tone::Banner, &format!("Ending Suite: {label}"));
    debug!(
        suite = label,
        passed = results.passed(),
        failed = results.failed(),
        skipped = results.skipped(),
        errors = results.errors(),
        "ending suite"
    );
    results
}

/// A suite with its result and input types erased, so suites of different
/// shapes can be run together.
pub trait RunnableSuite: Send + Sync {
    fn label(&self) -> &str;
    fn case_count(&self) -> usize;
    fn execute(&self) -> ResultCounter;
}

impl<R, Args> RunnableSuite for SuiteDefinition<R, Args>
where
    R: PartialEq + Pretty + Default + Send + Sync,
    Args: Clone + Send + Sync,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn case_count(&self) -> usize {
        self.cases.len()
    }

    fn execute(&self) -> ResultCounter {
        execute_suite(self)
    }
}

/// Runs every suite and folds the tallies in declaration order.
///
/// In parallel mode each suite runs on a rayon worker with its own narration
/// buffer and counter; the buffers are replayed, colours included, in
/// declaration order once every suite has finished. Cases inside a suite
/// always run one after another.
///
/// A panic escaping a suite (a failing hook) is re-raised after the narration of
/// every earlier suite and of the failing suite itself has been written, the
/// same output a serial run leaves behind.
pub fn run_suites(suites: &[Box<dyn RunnableSuite>], parallel: bool) -> ResultCounter {
    if !parallel {
        return suites.iter().map(|suite| suite.execute()).sum();
    }

    let runs: Vec<(std::thread::Result<ResultCounter>, Vec<narration::Line>)> = suites
        .par_iter()
        .map(|suite| {
            narration::capture_lines_with(|| {
                panic::catch_unwind(AssertUnwindSafe(|| suite.execute()))
            })
        })
        .collect();

    let mut total = ResultCounter::new();
    for (outcome, lines) in runs {
        narration::replay(&lines);
        match outcome {
            Ok(results) => total += results,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
    total
}
