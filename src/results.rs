use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Tally of case outcomes for one or more suite runs.
///
/// `total` counts passes, failures and skips. Errors are tracked on their own:
/// an errored case is also scored as a pass, fail or skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCounter {
    errors: u32,
    failed: u32,
    passed: u32,
    skipped: u32,
    total: u32,
    error_messages: Vec<String>,
    failure_messages: Vec<String>,
    skip_messages: Vec<String>,
}

impl ResultCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self) -> &mut Self {
        self.total += 1;
        self.passed += 1;
        self
    }

    pub fn fail(&mut self) -> &mut Self {
        self.total += 1;
        self.failed += 1;
        self
    }

    pub fn fail_with(&mut self, message: impl Into<String>) -> &mut Self {
        self.fail();
        self.failure_messages.push(message.into());
        self
    }

    pub fn skip(&mut self) -> &mut Self {
        self.total += 1;
        self.skipped += 1;
        self
    }

    pub fn skip_with(&mut self, message: impl Into<String>) -> &mut Self {
        self.skip();
        self.skip_messages.push(message.into());
        self
    }

    /// Records an error. Does not touch `total`.
    pub fn error(&mut self) -> &mut Self {
        self.errors += 1;
        self
    }

    pub fn error_with(&mut self, message: impl Into<String>) -> &mut Self {
        self.error();
        self.error_messages.push(message.into());
        self
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn passed(&self) -> u32 {
        self.passed
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    pub fn failure_messages(&self) -> &[String] {
        &self.failure_messages
    }

    pub fn skip_messages(&self) -> &[String] {
        &self.skip_messages
    }

    /// True when nothing failed and nothing errored.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Sum of both counters, messages ordered `self` then `other`. Neither operand changes.
    pub fn combine(&self, other: &ResultCounter) -> ResultCounter {
        let mut out = self.clone();
        out.accumulate_from(other);
        out
    }

    /// Adds `other` into `self`, appending its messages after ours.
    pub fn accumulate_from(&mut self, other: &ResultCounter) -> &mut Self {
        self.errors += other.errors;
        self.failed += other.failed;
        self.passed += other.passed;
        self.skipped += other.skipped;
        self.total += other.total;
        self.error_messages.extend_from_slice(&other.error_messages);
        self.failure_messages
            .extend_from_slice(&other.failure_messages);
        self.skip_messages.extend_from_slice(&other.skip_messages);
        self
    }

    /// Accumulates the counter into itself: every count doubles and every
    /// message list is followed by a copy of itself.
    pub fn accumulate_self(&mut self) -> &mut Self {
        let snapshot = self.clone();
        self.accumulate_from(&snapshot)
    }
}

impl Add for &ResultCounter {
    type Output = ResultCounter;

    fn add(self, other: &ResultCounter) -> ResultCounter {
        self.combine(other)
    }
}

impl Add for ResultCounter {
    type Output = ResultCounter;

    fn add(mut self, other: ResultCounter) -> ResultCounter {
        self.accumulate_from(&other);
        self
    }
}

impl AddAssign<&ResultCounter> for ResultCounter {
    fn add_assign(&mut self, other: &ResultCounter) {
        self.accumulate_from(other);
    }
}

impl AddAssign for ResultCounter {
    fn add_assign(&mut self, other: ResultCounter) {
        self.accumulate_from(&other);
    }
}

impl Sum for ResultCounter {
    fn sum<I: Iterator<Item = ResultCounter>>(iter: I) -> Self {
        iter.fold(ResultCounter::new(), |acc, next| acc + next)
    }
}

impl<'a> Sum<&'a ResultCounter> for ResultCounter {
    fn sum<I: Iterator<Item = &'a ResultCounter>>(iter: I) -> Self {
        iter.fold(ResultCounter::new(), |mut acc, next| {
            acc += next;
            acc
        })
    }
}
