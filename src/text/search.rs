//! Literal substring and line-marker scanning over raw buffer content.
//!
//! These helpers work on byte slices so the store can run them directly on
//! its backing storage. Matching is literal: no case folding, no
//! normalization, no regex.

use memchr::{memchr_iter, memmem};

/// Line separator used by the store.
pub const NEWLINE: u8 = b'\n';

/// Find all non-overlapping occurrences of `needle`, scanning left to right.
///
/// After a match at `p` the scan resumes at `p + needle.len()`, so `"aa"`
/// in `"aaaa"` yields `[0, 2]`. An empty needle matches nothing.
#[must_use]
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }

    let finder = memmem::Finder::new(needle);
    let mut positions = Vec::new();
    let mut from = 0;
    while let Some(found) = finder.find(&haystack[from..]) {
        let pos = from + found;
        positions.push(pos);
        from = pos + needle.len();
    }
    positions
}

/// Find the first occurrence of `needle` starting at or after `start`.
#[must_use]
pub fn find_first(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || start > haystack.len() {
        return None;
    }
    memmem::find(&haystack[start..], needle).map(|found| start + found)
}

/// Number of lines: markers plus one.
#[must_use]
pub fn line_count(haystack: &[u8]) -> usize {
    memchr_iter(NEWLINE, haystack).count() + 1
}

/// `(start, length)` of line `n`, excluding its terminating marker.
///
/// Line `n` runs from just after marker `n - 1` (or the start of the content)
/// up to marker `n` (or the end of the content).
#[must_use]
pub fn line_span(haystack: &[u8], n: usize) -> Option<(usize, usize)> {
    let mut start = 0;
    let mut markers = memchr_iter(NEWLINE, haystack);
    for _ in 0..n {
        start = markers.next()? + 1;
    }
    let end = markers.next().unwrap_or(haystack.len());
    Some((start, end - start))
}
