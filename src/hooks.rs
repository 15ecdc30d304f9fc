use crate::types::Hook;
use std::sync::Arc;

/// Chains two optional hooks into one.
///
/// With a single hook present that same `Arc` comes back unwrapped. With both
/// present the result runs `first` and then `second`.
pub fn coalesce(first: Option<Hook>, second: Option<Hook>) -> Option<Hook> {
    match (first, second) {
        (Some(first), Some(second)) => Some(Arc::new(move || {
            first();
            second();
        })),
        (first, None) => first,
        (None, second) => second,
    }
}
