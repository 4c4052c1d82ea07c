//! Case folding with an offset map back into the original text.
//!
//! Matching runs on lower-cased copies of both the text and the catalog
//! names, but every offset we hand out must index the *original* text.
//! For ASCII input the two are byte-for-byte aligned. Outside ASCII,
//! lower-casing can change a character's encoded length (`'İ'` becomes
//! `"i\u{307}"`, three bytes instead of two), so [`FoldedText`] keeps a
//! per-byte map from folded positions to original positions.
//!
//! ```text
//! original: K  ö  l  n        bytes 0 1 3 4 (5)
//! folded:   k  ö  l  n        bytes 0 1 3 4 (5)
//! origin:   0  1  -  3  4  5
//! ```
//!
//! A folded position that falls in the middle of one character's expansion
//! maps to `None`; matches starting or ending there are discarded by the
//! matcher rather than widened.

/// Fold a catalog name (or a selection fragment) for comparison.
pub(crate) fn fold(s: &str) -> String {
    if s.is_ascii() {
        return s.to_ascii_lowercase();
    }
    s.chars().flat_map(char::to_lowercase).collect()
}

/// A folded copy of the scanned text plus the map back to the original.
#[derive(Debug, Clone)]
pub(crate) struct FoldedText {
    folded: String,
    /// `origin[i]` is the original byte offset for folded byte `i` when `i`
    /// begins a source character's expansion (or is the end of the text).
    /// Empty for ASCII input, where offsets are the identity.
    origin: Vec<Option<usize>>,
}

impl FoldedText {
    pub(crate) fn new(text: &str) -> Self {
        if text.is_ascii() {
            return FoldedText { folded: text.to_ascii_lowercase(), origin: Vec::new() };
        }

        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            origin.push(Some(offset));
            folded.extend(ch.to_lowercase());
            origin.resize(folded.len(), None);
        }
        origin.push(Some(text.len()));

        FoldedText { folded, origin }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.folded
    }

    /// Map a folded half-open range back to the original text.
    ///
    /// Returns `None` when either end lands inside a multi-character
    /// expansion.
    pub(crate) fn to_original(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if self.origin.is_empty() {
            return (end <= self.folded.len()).then_some((start, end));
        }
        let start = self.origin.get(start).copied().flatten()?;
        let end = self.origin.get(end).copied().flatten()?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_are_identity() {
        let f = FoldedText::new("Jacob FREY");
        assert_eq!(f.as_str(), "jacob frey");
        assert_eq!(f.to_original(6, 10), Some((6, 10)));
    }

    #[test]
    fn multibyte_text_keeps_original_offsets() {
        let text = "Über Köln";
        let f = FoldedText::new(text);
        assert_eq!(f.as_str(), "über köln");

        let start = f.as_str().find("köln").unwrap();
        let (s, e) = f.to_original(start, start + "köln".len()).unwrap();
        assert_eq!(&text[s..e], "Köln");
    }

    #[test]
    fn expansion_changes_length_but_not_mapping() {
        // 'İ' (2 bytes) folds to "i\u{307}" (3 bytes).
        let text = "İstanbul Örs";
        let f = FoldedText::new(text);
        assert!(f.as_str().len() > text.len());

        let start = f.as_str().find("örs").unwrap();
        let (s, e) = f.to_original(start, start + "örs".len()).unwrap();
        assert_eq!(&text[s..e], "Örs");
    }

    #[test]
    fn split_expansion_is_rejected() {
        let f = FoldedText::new("İx");
        // folded: "i" "\u{307}" "x"; position 1 is inside the expansion of 'İ'.
        assert_eq!(f.to_original(0, 1), None);
        assert_eq!(f.to_original(1, 4), None);
        assert_eq!(f.to_original(0, 4), Some((0, 3)));
    }

    #[test]
    fn fold_matches_folded_text() {
        for s in ["Minneapolis", "İstanbul", "ΣΟΦΙΑ", "Jürgen Klopp"] {
            assert_eq!(fold(s), FoldedText::new(s).as_str());
        }
    }
}
