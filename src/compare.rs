use crate::format::{Pretty, format, format_plain};
use crate::types::CompareFn;

/// The comparator that judges one case.
pub enum Comparator<'a, R> {
    Case(&'a CompareFn<R>),
    Suite(&'a CompareFn<R>),
    Structural,
}

/// Picks the case comparator, then the suite comparator, then `==`.
pub fn resolve<'a, R>(
    case: Option<&'a CompareFn<R>>,
    suite: Option<&'a CompareFn<R>>,
) -> Comparator<'a, R> {
    match (case, suite) {
        (Some(f), _) => Comparator::Case(f),
        (None, Some(f)) => Comparator::Suite(f),
        (None, None) => Comparator::Structural,
    }
}

impl<R: PartialEq> Comparator<'_, R> {
    pub fn judge(&self, expected: &R, actual: &R) -> bool {
        match self {
            Comparator::Case(f) | Comparator::Suite(f) => f(expected, actual),
            Comparator::Structural => expected == actual,
        }
    }
}

impl<R> Comparator<'_, R> {
    pub fn source(&self) -> &'static str {
        match self {
            Comparator::Case(_) => "case",
            Comparator::Suite(_) => "suite",
            Comparator::Structural => "structural",
        }
    }
}

/// Explains how two sequences differ, or `None` when they are equal.
pub fn sequence_mismatch<T>(expected: &[T], actual: &[T]) -> Option<String>
where
    T: PartialEq + Pretty,
{
    if expected.len() != actual.len() {
        return Some(format!(
            "size mismatch expected: {}, actual: {}",
            expected.len(),
            actual.len()
        ));
    }
    let index = expected.iter().zip(actual).position(|(e, a)| e != a)?;
    Some(format!(
        "vectors differ at index {index}, \"{}\" != \"{}\", expected: \"{}\", actual: \"{}\"",
        format_plain(&expected[index]),
        format_plain(&actual[index]),
        format(expected),
        format(actual)
    ))
}
