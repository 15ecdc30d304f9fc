use crate::apply::Apply;
use std::fmt;
use std::sync::Arc;

/// Zero-argument lifecycle hook (before/after each case or the whole suite).
pub type Hook = Arc<dyn Fn() + Send + Sync>;

/// Decides whether `(expected, actual)` counts as a pass.
pub type CompareFn<R> = Arc<dyn Fn(&R, &R) -> bool + Send + Sync>;

/// The function under test after its positional arguments were packed into a tuple.
pub type TestFn<R, Args> = Arc<dyn Fn(Args) -> R + Send + Sync>;

pub fn hook(f: impl Fn() + Send + Sync + 'static) -> Hook {
    Arc::new(f)
}

pub fn compare_fn<R>(f: impl Fn(&R, &R) -> bool + Send + Sync + 'static) -> CompareFn<R> {
    Arc::new(f)
}

pub fn test_fn<R, Args, F>(f: F) -> TestFn<R, Args>
where
    F: Apply<Args, Output = R> + Send + Sync + 'static,
    R: 'static,
    Args: 'static,
{
    Arc::new(move |args: Args| f.apply(args))
}

#[derive(Clone)]
pub struct CaseDefinition<R, Args> {
    pub label: String,
    pub expected: R,
    pub inputs: Args,
    pub compare: Option<CompareFn<R>>,
    pub before_each: Option<Hook>,
    pub after_each: Option<Hook>,
    pub enabled: bool,
}

impl<R, Args> CaseDefinition<R, Args> {
    pub fn new(label: impl Into<String>, expected: R, inputs: Args) -> Self {
        Self {
            label: label.into(),
            expected,
            inputs,
            compare: None,
            before_each: None,
            after_each: None,
            enabled: true,
        }
    }

    /// Overrides the suite comparator for this case only.
    pub fn compare(mut self, f: impl Fn(&R, &R) -> bool + Send + Sync + 'static) -> Self {
        self.compare = Some(Arc::new(f));
        self
    }

    pub fn before_each(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_each = Some(Arc::new(f));
        self
    }

    pub fn after_each(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.after_each = Some(Arc::new(f));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn disabled(self) -> Self {
        self.enabled(false)
    }
}

impl<R: fmt::Debug, Args: fmt::Debug> fmt::Debug for CaseDefinition<R, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseDefinition")
            .field("label", &self.label)
            .field("expected", &self.expected)
            .field("inputs", &self.inputs)
            .field("compare", &self.compare.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Clone)]
pub struct SuiteDefinition<R, Args> {
    pub label: String,
    pub function: TestFn<R, Args>,
    pub cases: Vec<CaseDefinition<R, Args>>,
    pub compare: Option<CompareFn<R>>,
    pub before_all: Option<Hook>,
    pub after_all: Option<Hook>,
    pub enabled: bool,
}

impl<R, Args> SuiteDefinition<R, Args> {
    pub fn new<F>(label: impl Into<String>, function: F) -> Self
    where
        F: Apply<Args, Output = R> + Send + Sync + 'static,
        R: 'static,
        Args: 'static,
    {
        Self::from_test_fn(label, test_fn(function))
    }

    pub fn from_test_fn(label: impl Into<String>, function: TestFn<R, Args>) -> Self {
        Self {
            label: label.into(),
            function,
            cases: Vec::new(),
            compare: None,
            before_all: None,
            after_all: None,
            enabled: true,
        }
    }

    pub fn case(mut self, case: CaseDefinition<R, Args>) -> Self {
        self.cases.push(case);
        self
    }

    pub fn cases(mut self, cases: impl IntoIterator<Item = CaseDefinition<R, Args>>) -> Self {
        self.cases.extend(cases);
        self
    }

    /// Comparator for every case that does not bring its own.
    pub fn compare(mut self, f: impl Fn(&R, &R) -> bool + Send + Sync + 'static) -> Self {
        self.compare = Some(Arc::new(f));
        self
    }

    pub fn before_all(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_all = Some(Arc::new(f));
        self
    }

    pub fn after_all(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.after_all = Some(Arc::new(f));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn disabled(self) -> Self {
        self.enabled(false)
    }
}

impl<R: fmt::Debug, Args: fmt::Debug> fmt::Debug for SuiteDefinition<R, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteDefinition")
            .field("label", &self.label)
            .field("cases", &self.cases)
            .field("compare", &self.compare.is_some())
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}
