use crate::engine;
use crate::{EntityCatalog, Error, Range, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Options that affect matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Texts shorter than this many characters (after trimming) are also
    /// checked as fragments of longer catalog names.
    pub short_text_threshold: usize,
    /// Fragments must be longer than this many characters to trigger the
    /// inverse check.
    pub min_fragment_len: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions { short_text_threshold: 30, min_fragment_len: 2 }
    }
}

impl MatchOptions {
    pub fn with_short_text_threshold(mut self, threshold: usize) -> Self {
        self.short_text_threshold = threshold;
        self
    }

    pub fn with_min_fragment_len(mut self, len: usize) -> Self {
        self.min_fragment_len = len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_text_threshold == 0 {
            return Err(Error::invalid("short_text_threshold must be at least 1"));
        }
        Ok(())
    }
}

/// How an occurrence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// The entity name appears in the text.
    Direct,
    /// The (short) text appears inside the longer entity name; the range
    /// covers the whole trimmed text.
    Containing,
}

/// A single raw match of a catalog entity.
///
/// `start`/`end` are byte offsets into the original text, half-open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Catalog name, as stored (not as it appears in the text).
    pub entity: String,
    pub start: usize,
    pub end: usize,
    pub kind: OccurrenceKind,
}

impl Occurrence {
    pub fn new(entity: impl Into<String>, start: usize, end: usize) -> Self {
        Occurrence { entity: entity.into(), start, end, kind: OccurrenceKind::Direct }
    }

    pub fn with_kind(mut self, kind: OccurrenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Width of the matched range in bytes.
    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Label shown next to the entity in the candidate popup.
    pub fn label(&self) -> &'static str {
        match self.kind {
            OccurrenceKind::Direct => "match",
            OccurrenceKind::Containing => "related entity",
        }
    }

    pub(crate) fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

/// Resolver verdict for one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanClass {
    /// Highlighted. Primary spans never overlap each other.
    Primary,
    /// Inside a primary span; listed but not highlighted.
    Nested,
    /// Partially overlaps a primary span; listed but not highlighted.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub class: SpanClass,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Highlight spans, ascending by start.
    pub primary_spans: Vec<ResolvedSpan>,
    /// Every input occurrence with its class, longest entity name first.
    pub all_candidates: Vec<ResolvedSpan>,
}

/// A piece of the scanned text: plain when `entity` is `None`, otherwise a
/// highlighted primary span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub entity: Option<&'a str>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.all_candidates.is_empty()
    }

    pub fn nested(&self) -> impl Iterator<Item = &ResolvedSpan> {
        self.all_candidates.iter().filter(|c| c.class == SpanClass::Nested)
    }

    pub fn dropped(&self) -> impl Iterator<Item = &ResolvedSpan> {
        self.all_candidates.iter().filter(|c| c.class == SpanClass::Dropped)
    }

    /// Split `text` into plain and highlighted segments, left to right.
    ///
    /// `text` must be the text the result was computed from; spans that do
    /// not fit it are skipped.
    pub fn segments<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        let mut out = Vec::new();
        let mut cursor = 0;

        for span in &self.primary_spans {
            let occ = &span.occurrence;
            let Some(body) = text.get(occ.start..occ.end) else {
                continue;
            };
            if occ.start < cursor {
                continue;
            }
            if occ.start > cursor {
                if let Some(plain) = text.get(cursor..occ.start) {
                    out.push(Segment { text: plain, start: cursor, end: occ.start, entity: None });
                }
            }
            out.push(Segment { text: body, start: occ.start, end: occ.end, entity: Some(occ.entity.as_str()) });
            cursor = occ.end;
        }

        if cursor < text.len() {
            if let Some(rest) = text.get(cursor..) {
                out.push(Segment { text: rest, start: cursor, end: text.len(), entity: None });
            }
        }
        out
    }
}

/// Timing for one [`detect_verbose`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectMetrics {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent finding occurrences (includes compiling the catalog on
    /// first use).
    pub matching: Duration,
    /// Time spent classifying occurrences.
    pub resolving: Duration,
    /// Number of names in the catalog.
    pub catalog_size: usize,
    /// Raw occurrence count before resolution.
    pub occurrences: usize,
}

/// Result from [`detect_verbose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectReport {
    pub result: MatchResult,
    pub metrics: DetectMetrics,
}

/// Find every occurrence of every catalog entity in `text`.
///
/// Matching is a case-insensitive literal substring search; no word
/// boundaries are required. Short texts are additionally checked as
/// fragments of longer names (see [`MatchOptions::short_text_threshold`]).
///
/// ```
/// use kgmatch::{EntityCatalog, MatchOptions, OccurrenceKind, find_occurrences};
///
/// let catalog = EntityCatalog::from_names(["Omar Fateh"]);
/// let found = find_occurrences("Omar", &catalog, &MatchOptions::default()).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].entity, "Omar Fateh");
/// assert_eq!(found[0].kind, OccurrenceKind::Containing);
/// ```
pub fn find_occurrences(text: &str, catalog: &EntityCatalog, options: &MatchOptions) -> Result<Vec<Occurrence>> {
    engine::find(text, catalog, options)
}

/// Pick non-overlapping highlight spans out of raw occurrences.
///
/// Longer spans win contested ranges; shorter spans fully inside a winner
/// are kept as [`SpanClass::Nested`], partial overlaps as
/// [`SpanClass::Dropped`].
pub fn resolve(occurrences: &[Occurrence]) -> MatchResult {
    engine::resolve(occurrences)
}

/// [`find_occurrences`] followed by [`resolve`].
pub fn detect(text: &str, catalog: &EntityCatalog, options: &MatchOptions) -> Result<MatchResult> {
    let occurrences = find_occurrences(text, catalog, options)?;
    Ok(resolve(&occurrences))
}

/// Like [`detect`], but also returns stage timings.
pub fn detect_verbose(text: &str, catalog: &EntityCatalog, options: &MatchOptions) -> Result<DetectReport> {
    let total_start = Instant::now();
    let occurrences = find_occurrences(text, catalog, options)?;
    let matching = total_start.elapsed();

    let resolve_start = Instant::now();
    let result = resolve(&occurrences);
    let resolving = resolve_start.elapsed();

    let metrics = DetectMetrics {
        total: total_start.elapsed(),
        matching,
        resolving,
        catalog_size: catalog.len(),
        occurrences: occurrences.len(),
    };
    Ok(DetectReport { result, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = MatchOptions::default();
        assert_eq!(opts.short_text_threshold, 30);
        assert_eq!(opts.min_fragment_len, 2);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let catalog = EntityCatalog::from_names(["Tim Walz"]);
        let opts = MatchOptions::default().with_short_text_threshold(0);
        let err = find_occurrences("Tim Walz", &catalog, &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn labels_follow_kind() {
        let direct = Occurrence::new("Jacob Frey", 0, 10);
        assert_eq!(direct.label(), "match");
        assert_eq!(direct.with_kind(OccurrenceKind::Containing).label(), "related entity");
    }

    #[test]
    fn segments_interleave_plain_and_highlighted_text() {
        let text = "Tim Walz met Jacob Frey today";
        let catalog = EntityCatalog::from_names(["Tim Walz", "Jacob Frey", "Frey"]);
        let result = detect(text, &catalog, &MatchOptions::default()).unwrap();

        let segments = result.segments(text);
        let rendered: Vec<(&str, Option<&str>)> = segments.iter().map(|s| (s.text, s.entity)).collect();
        assert_eq!(
            rendered,
            vec![
                ("Tim Walz", Some("Tim Walz")),
                (" met ", None),
                ("Jacob Frey", Some("Jacob Frey")),
                (" today", None),
            ]
        );

        let rebuilt: String = segments.iter().map(|s| s.text).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn segments_of_unmatched_text_is_one_plain_piece() {
        let result = MatchResult::default();
        let segments = result.segments("nothing here");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].entity, None);
        assert!(result.segments("").is_empty());
    }

    #[test]
    fn detect_verbose_reports_counts() {
        let catalog = EntityCatalog::from_names(["Minneapolis", "Minnesota"]);
        let report = detect_verbose("Minneapolis is a city in Minnesota", &catalog, &MatchOptions::default()).unwrap();

        assert_eq!(report.metrics.catalog_size, 2);
        assert_eq!(report.metrics.occurrences, 2);
        assert!(report.metrics.matching <= report.metrics.total);
        assert_eq!(report.result.primary_spans.len(), 2);
    }

    #[test]
    fn match_result_serializes_flat_spans() {
        let result = resolve(&[Occurrence::new("Minneapolis", 0, 11)]);
        let value = serde_json::to_value(&result).unwrap();
        let span = &value["primary_spans"][0];
        assert_eq!(span["entity"], "Minneapolis");
        assert_eq!(span["start"], 0);
        assert_eq!(span["kind"], "direct");
        assert_eq!(span["class"], "primary");
    }
}
