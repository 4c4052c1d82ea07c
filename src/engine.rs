//! Matching and resolution engine.
//!
//! ## How the parts work together
//!
//! ```text
//! catalog names ──┐
//!                 │  CompiledCatalog::new        (compiled.rs)
//!                 └───────────────┬───────────  (once per catalog)
//!                                 │
//! text ── FoldedText::new ────────┼─ lower-cased copy + offset map (fold.rs)
//!                                 v
//!                        find (matcher.rs)
//!                          - overlapping automaton scan  (Direct)
//!                          - short-text fragment check   (Containing)
//!                          - dedup via OccurrenceKey      (dedup.rs)
//!                                 │  Vec<Occurrence>
//!                                 v
//!                        resolve (resolver.rs)
//!                          - start asc, length desc
//!                          - greedy sweep over covered ranges
//!                          - Primary / Nested / Dropped
//!                                 │
//!                                 v
//!                            MatchResult
//! ```
//!
//! Both stages are pure functions of their inputs. The only state is the
//! compiled automaton cached inside `EntityCatalog`, which is written once
//! and read-only afterwards.
//!
//! ## Responsibilities by module
//!
//! - `fold.rs`: case folding that keeps offsets into the original text.
//! - `compiled.rs`: folds catalog names and builds the search automaton.
//! - `matcher.rs`: produces raw occurrences in both directions.
//! - `dedup.rs`: the identity of a raw occurrence.
//! - `resolver.rs`: classifies occurrences for highlighting.
//!
//! ## Debugging
//!
//! Stage counts are logged at `debug` level and discarded matches at
//! `trace` level via `tracing`; the CLI reads its filter from `KGMATCH_LOG`.

#[path = "engine/compiled.rs"]
mod compiled;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/fold.rs"]
mod fold;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/resolver.rs"]
mod resolver;

pub(crate) use compiled::CompiledCatalog;
pub(crate) use matcher::find;
pub(crate) use resolver::resolve;
