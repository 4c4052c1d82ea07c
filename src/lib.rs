//! Knowledge-graph entity detection for highlight overlays.
//!
//! Given a block of text and a catalog of known entity names, `kgmatch`
//! finds every case-insensitive occurrence of every name, then decides which
//! of the (often overlapping) occurrences should be highlighted while keeping
//! the rest available for an "all matches" list.
//!
//! ```text
//! relationship JSON ─▶ RelationshipGraph ─▶ EntityCatalog
//!                                              │
//! text ─────────────────▶ find_occurrences ◀───┘
//!                               │  Vec<Occurrence>
//!                               ▼
//!                            resolve ─▶ MatchResult { primary_spans, all_candidates }
//! ```
//!
//! # Example
//! ```
//! use kgmatch::{EntityCatalog, MatchOptions, SpanClass, detect};
//!
//! let catalog = EntityCatalog::from_names(["Minneapolis", "Minneapolis Mayoral Election 2025"]);
//! let text = "Minneapolis Mayoral Election 2025 starts soon";
//! let result = detect(text, &catalog, &MatchOptions::default()).unwrap();
//!
//! assert_eq!(result.primary_spans.len(), 1);
//! assert_eq!(result.primary_spans[0].occurrence.entity, "Minneapolis Mayoral Election 2025");
//! assert!(result.all_candidates.iter().any(|c| c.class == SpanClass::Nested));
//! ```

mod api;
mod catalog;
mod engine;
mod error;


pub use api::{
    DetectMetrics, DetectReport, MatchOptions, MatchResult, Occurrence, OccurrenceKind, ResolvedSpan, Segment,
    SpanClass, detect, detect_verbose, find_occurrences, resolve,
};
pub use catalog::{EntityCatalog, Relationship, RelationshipGraph, RelationshipRecord};
pub use error::{Error, Result};

// --- Internal types ---------------------------------------------------------

/// Half-open byte range `[start, end)` into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    /// Half-open overlap: `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies within `self` (equal ranges included).
    pub fn contains(&self, other: &Range) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}
