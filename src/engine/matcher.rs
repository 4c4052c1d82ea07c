//! Raw occurrence discovery.
//!
//! Two directions are checked:
//!
//! ```text
//! Direct:      text  "Mayor Jacob Frey spoke"     catalog "Jacob Frey"
//!                           ^^^^^^^^^^ 6..16
//!
//! Containing:  text  "Omar"  (short selection)    catalog "Omar Fateh"
//!                     ^^^^ 0..4  -> reported as "Omar Fateh"
//! ```
//!
//! Direct matching is a literal substring search on folded text, with no
//! word-boundary requirement: "Omar" is found inside "Omarville". Every
//! occurrence is reported, including a name overlapping itself ("aa" in
//! "aaa" at 0..2 and 1..3); the resolver sorts out what to highlight.
//!
//! The containing direction only runs for short texts, the "user selected a
//! fragment of a longer name" case.

use super::compiled::CompiledCatalog;
use super::dedup::OccurrenceKey;
use super::fold::{FoldedText, fold};
use crate::{EntityCatalog, MatchOptions, Occurrence, OccurrenceKind, Result};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Find all occurrences of `catalog` names in `text`.
///
/// Output is deduplicated and ordered by `(start, catalog index, end)`.
pub(crate) fn find(text: &str, catalog: &EntityCatalog, options: &MatchOptions) -> Result<Vec<Occurrence>> {
    options.validate()?;
    if text.is_empty() || catalog.is_empty() {
        return Ok(Vec::new());
    }

    let compiled = catalog.compiled()?;
    let direct = direct_matches(text, compiled);
    let containing = containing_matches(text, compiled, options);
    debug!(direct = direct.len(), containing = containing.len(), text_len = text.len(), "matched catalog");

    let mut seen: HashSet<OccurrenceKey> = HashSet::with_capacity(direct.len() + containing.len());
    let mut found: Vec<(OccurrenceKey, OccurrenceKind)> = Vec::with_capacity(direct.len() + containing.len());
    let tagged = direct
        .into_iter()
        .map(|k| (k, OccurrenceKind::Direct))
        .chain(containing.into_iter().map(|k| (k, OccurrenceKind::Containing)));
    for (key, kind) in tagged {
        if seen.insert(key) {
            found.push((key, kind));
        }
    }
    found.sort_unstable_by_key(|(key, _)| *key);

    let names = catalog.names();
    Ok(found
        .into_iter()
        .map(|(key, kind)| Occurrence { entity: names[key.entity].clone(), start: key.start, end: key.end, kind })
        .collect())
}

/// Every catalog name found inside `text`, offsets into the original text.
fn direct_matches(text: &str, compiled: &CompiledCatalog) -> Vec<OccurrenceKey> {
    let Some(automaton) = compiled.automaton() else {
        return Vec::new();
    };

    let folded = FoldedText::new(text);
    let mut out = Vec::new();
    for m in automaton.find_overlapping_iter(folded.as_str()) {
        let Some((start, end)) = folded.to_original(m.start(), m.end()) else {
            trace!(start = m.start(), end = m.end(), "match splits a folded character, skipped");
            continue;
        };
        for &entity in compiled.owners(m.pattern().as_usize()) {
            out.push(OccurrenceKey::new(entity, start, end));
        }
    }
    out
}

/// Catalog names that contain the whole (short) text.
///
/// The reported range covers the trimmed text, so surrounding whitespace in
/// a selection is not highlighted.
fn containing_matches(text: &str, compiled: &CompiledCatalog, options: &MatchOptions) -> Vec<OccurrenceKey> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if chars >= options.short_text_threshold || chars <= options.min_fragment_len {
        return Vec::new();
    }

    let start = text.len() - text.trim_start().len();
    let end = start + trimmed.len();
    let fragment = fold(trimmed);

    compiled
        .folded_names()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.len() > fragment.len() && name.contains(fragment.as_str()))
        .map(|(entity, _)| OccurrenceKey::new(entity, start, end))
        .collect()
}
