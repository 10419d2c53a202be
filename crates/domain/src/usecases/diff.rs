//! Differ: additions between old and new normalized unit sequences
//!
//! Only insertions are surfaced; deletions and unchanged context never
//! reach the user. "What's new" is the whole product here.

use similar::{Algorithm, ChangeTag, capture_diff_slices};

/// Units present in `new` but absent from `old`, in the relative order
/// they appear in the diff output.
pub fn added_units(old: &[String], new: &[String]) -> Vec<String> {
    capture_diff_slices(Algorithm::Myers, old, new)
        .iter()
        .flat_map(|op| op.iter_changes(old, new))
        .filter(|change| change.tag() == ChangeTag::Insert)
        .map(|change| change.value())
        .collect()
}
