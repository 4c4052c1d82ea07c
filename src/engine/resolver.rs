//! Overlap resolution.
//!
//! Raw occurrences overlap all the time: "Minneapolis" sits inside
//! "Minneapolis Mayoral Election 2025", two names can share a word. A
//! highlight layer can only draw non-overlapping spans, but the candidate
//! list should still show everything. Resolution gives every occurrence one
//! of three classes:
//!
//! ```text
//! text:     Minneapolis Mayoral Election 2025 starts
//!           [================================]         Primary
//!           [=========]                                Nested   (inside a primary)
//!
//! text:     Jacob Frey Administration
//!           [========]                                 Primary
//!                 [=================]                  Dropped  (partial overlap)
//! ```
//!
//! ## Sweep
//!
//! 1. Order by start ascending, then span length descending. The sort is
//!    stable, so fully tied occurrences keep their input order. This order
//!    decides which of two co-starting names becomes primary: the longer one.
//! 2. Walk the order keeping the ranges claimed by primaries so far.
//!    - overlaps nothing claimed -> Primary, claim its range
//!    - overlaps and lies inside a claimed range -> Nested
//!    - overlaps without lying inside one -> Dropped
//!
//! Partial overlaps are never split or merged. Claimed ranges are pairwise
//! disjoint, so an occurrence lying inside one claimed range overlaps no
//! other, and checking the first overlapping range is enough.

use crate::{MatchResult, Occurrence, Range, ResolvedSpan, SpanClass};
use tracing::debug;

pub(crate) fn resolve(occurrences: &[Occurrence]) -> MatchResult {
    if occurrences.is_empty() {
        return MatchResult::default();
    }

    let mut order: Vec<usize> = (0..occurrences.len()).collect();
    order.sort_by(|&a, &b| {
        let (oa, ob) = (&occurrences[a], &occurrences[b]);
        oa.start.cmp(&ob.start).then(ob.span_len().cmp(&oa.span_len()))
    });

    let mut classes = vec![SpanClass::Dropped; occurrences.len()];
    let mut covered: Vec<Range> = Vec::new();
    for &idx in &order {
        let range = occurrences[idx].range();
        classes[idx] = match covered.iter().find(|c| c.overlaps(&range)) {
            None => {
                covered.push(range);
                SpanClass::Primary
            }
            Some(claimed) if claimed.contains(&range) => SpanClass::Nested,
            Some(_) => SpanClass::Dropped,
        };
    }

    // `order` is already start-ascending, so primaries come out left to right.
    let primary_spans: Vec<ResolvedSpan> = order
        .iter()
        .filter(|&&idx| classes[idx] == SpanClass::Primary)
        .map(|&idx| ResolvedSpan { occurrence: occurrences[idx].clone(), class: SpanClass::Primary })
        .collect();

    let mut all_candidates: Vec<ResolvedSpan> = occurrences
        .iter()
        .zip(&classes)
        .map(|(occ, &class)| ResolvedSpan { occurrence: occ.clone(), class })
        .collect();
    all_candidates.sort_by(|a, b| {
        let (oa, ob) = (&a.occurrence, &b.occurrence);
        ob.entity
            .chars()
            .count()
            .cmp(&oa.entity.chars().count())
            .then(oa.start.cmp(&ob.start))
            .then(oa.entity.cmp(&ob.entity))
    });

    debug!(
        candidates = all_candidates.len(),
        primary = primary_spans.len(),
        nested = classes.iter().filter(|&&c| c == SpanClass::Nested).count(),
        dropped = classes.iter().filter(|&&c| c == SpanClass::Dropped).count(),
        "resolved spans"
    );

    MatchResult { primary_spans, all_candidates }
}
