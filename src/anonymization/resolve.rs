//! Overlap resolution between candidate spans
//!
//! Candidates from all detectors are ranked by source priority
//! (custom term, then pattern, then entity), then by length (longer first),
//! then by start offset (earlier first). Spans are accepted greedily in that
//! order; a candidate overlapping anything already accepted is discarded.

use crate::anonymization::mapping::placeholder_regex;
use crate::anonymization::models::SensitiveSpan;
use std::cmp::Reverse;

/// Reduce candidates to a non-overlapping set, ordered by start offset
///
/// Candidates that overlap a placeholder token already present in `text`
/// are dropped, so re-anonymizing anonymized text leaves tokens intact.
pub fn resolve_overlaps(text: &str, mut candidates: Vec<SensitiveSpan>) -> Vec<SensitiveSpan> {
    let protected: Vec<(usize, usize)> = placeholder_regex()
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    candidates.sort_by_key(|span| (Reverse(span.source), Reverse(span.len()), span.start));

    let mut accepted: Vec<SensitiveSpan> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        if protected
            .iter()
            .any(|&(start, end)| candidate.start < end && start < candidate.end)
        {
            continue;
        }
        if accepted.iter().any(|span| span.overlaps(&candidate)) {
            continue;
        }
        accepted.push(candidate);
    }

    accepted.sort_by_key(|span| span.start);
    accepted
}
