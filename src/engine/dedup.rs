//! Identity of a raw occurrence.
//!
//! The matcher finds occurrences from two directions (names inside the text,
//! the text inside names) and the union must never report the same entity
//! twice for the same range. `OccurrenceKey` is that identity: the catalog
//! index rather than the name, so keys are `Copy` and hashing is cheap.
//!
//! Kind is not part of the key: whichever direction reaches a key first
//! keeps it, and direct matches are collected first.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct OccurrenceKey {
    pub(crate) start: usize,
    pub(crate) entity: usize,
    pub(crate) end: usize,
}

impl OccurrenceKey {
    pub(crate) fn new(entity: usize, start: usize, end: usize) -> Self {
        OccurrenceKey { start, entity, end }
    }
}
