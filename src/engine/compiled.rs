//! Catalog compilation.
//!
//! This is the *static* side of matching: everything derived from the
//! catalog alone, built once per catalog and reused for every text scanned
//! against it.
//!
//! - Names are folded once.
//! - Names that fold to the same string ("Minneapolis", "MINNEAPOLIS") share
//!   one automaton pattern; the pattern keeps a list of owning catalog
//!   indices so each name is still reported.
//! - The automaton uses `MatchKind::Standard`, the only kind that supports
//!   overlapping iteration. Leftmost-longest would hide exactly the nested
//!   matches the resolver needs to see.
//!
//! ## Invariants
//!
//! - `owners[p]` lists catalog indices for automaton pattern `p`, ascending.
//! - `folded[i]` is the fold of catalog name `i`; the vectors stay aligned
//!   with `EntityCatalog::names`.

use super::fold::fold;
use crate::{Error, Result};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct CompiledCatalog {
    /// `None` when the catalog has no names.
    automaton: Option<AhoCorasick>,
    owners: Vec<Vec<usize>>,
    folded: Vec<String>,
}

impl CompiledCatalog {
    pub(crate) fn new(names: &[String]) -> Result<Self> {
        let folded: Vec<String> = names.iter().map(|n| fold(n)).collect();

        let mut patterns: Vec<&str> = Vec::new();
        let mut owners: Vec<Vec<usize>> = Vec::new();
        let mut by_pattern: HashMap<&str, usize> = HashMap::new();
        for (idx, f) in folded.iter().enumerate() {
            match by_pattern.get(f.as_str()) {
                Some(&pid) => owners[pid].push(idx),
                None => {
                    by_pattern.insert(f.as_str(), patterns.len());
                    patterns.push(f.as_str());
                    owners.push(vec![idx]);
                }
            }
        }

        let automaton = if patterns.is_empty() {
            None
        } else {
            let ac = AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
                .map_err(|e| Error::invalid(format!("catalog cannot be compiled: {e}")))?;
            Some(ac)
        };

        debug!(names = names.len(), patterns = patterns.len(), "compiled entity catalog");

        Ok(CompiledCatalog { automaton, owners, folded })
    }

    pub(crate) fn automaton(&self) -> Option<&AhoCorasick> {
        self.automaton.as_ref()
    }

    /// Catalog indices that own automaton pattern `pattern`.
    pub(crate) fn owners(&self, pattern: usize) -> &[usize] {
        self.owners.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn folded_names(&self) -> &[String] {
        &self.folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn case_variants_share_a_pattern() {
        let compiled = CompiledCatalog::new(&names(&["Minneapolis", "Tim Walz", "MINNEAPOLIS"])).unwrap();
        assert_eq!(compiled.automaton().unwrap().patterns_len(), 2);
        assert_eq!(compiled.owners(0), &[0, 2]);
        assert_eq!(compiled.owners(1), &[1]);
        assert_eq!(compiled.folded_names()[2], "minneapolis");
    }

    #[test]
    fn empty_catalog_has_no_automaton() {
        let compiled = CompiledCatalog::new(&[]).unwrap();
        assert!(compiled.automaton().is_none());
        assert!(compiled.owners(0).is_empty());
    }
}
