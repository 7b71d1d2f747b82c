//! Deterministic reform placement.
//!
//! The canonical convention: the first filter in registration order writes
//! directly into the reform root as `<stem>.<format>`; every subsequent
//! filter writes the same file name into a subdirectory named after its
//! path segment. Generation, listing, and deletion all derive paths here,
//! so the filesystem itself serves as the cache index — no other index is
//! maintained.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::filters::Filter;

/// Compute the output path for one (source, filter) pair.
///
/// `position` is the filter's index in the namespace's registration order.
/// For a fixed registration order this is a pure function: the same inputs
/// always produce the same path, and distinct filters never collide (the
/// first filter owns the root; later filters each own a subdirectory
/// keyed by their unique path segment).
pub fn reform_path(
    reform_root: &Path,
    stem: &str,
    filter: &dyn Filter,
    position: usize,
) -> PathBuf {
    let file_name = format!("{stem}.{}", filter.format().as_str());
    if position == 0 {
        reform_root.join(file_name)
    } else {
        reform_root.join(filter.path_segment()).join(file_name)
    }
}

/// Every reform path for a source stem, in registration order.
pub fn reform_paths<'a>(
    reform_root: &'a Path,
    stem: &'a str,
    filters: &'a [Arc<dyn Filter>],
) -> impl Iterator<Item = (PathBuf, &'a Arc<dyn Filter>)> + 'a {
    filters.iter().enumerate().map(move |(position, filter)| {
        (
            reform_path(reform_root, stem, filter.as_ref(), position),
            filter,
        )
    })
}
