//! Relationship data and the entity catalog derived from it.
//!
//! The data provider hands us a JSON object mapping an entity name to the
//! ordered list of relationships it is the source of:
//!
//! ```json
//! {
//!   "Jacob Frey": [
//!     { "relationship": "PROPOSED", "target": "Third Precinct",
//!       "evidence": "...", "articleID": "600312948",
//!       "date": "2023-10-17T22:27:51.242Z" }
//!   ]
//! }
//! ```
//!
//! The catalog of matchable names is every key plus every `target`. Both the
//! graph and the catalog are immutable snapshots; a refreshed mapping means
//! a new catalog, never an in-place update.

use crate::engine::CompiledCatalog;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// One outgoing edge of an entity, as the data provider delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Edge label, e.g. `"HAS_LOCATION"`.
    pub relationship: String,
    /// Name of the entity on the other end.
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Source article identifier. Accepts a JSON string or number.
    #[serde(
        rename = "articleID",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub article_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}

/// A relationship record seen from a particular entity, with its source
/// filled in. Returned by [`RelationshipGraph::relationships_for`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relationship<'a> {
    pub source: &'a str,
    pub record: &'a RelationshipRecord,
}

/// Ordered `entity -> relationships` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipGraph {
    entries: Vec<(String, Vec<RelationshipRecord>)>,
}

impl RelationshipGraph {
    /// Parse the provider's JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::invalid(format!("relationship data is not JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build from an already-parsed JSON value, keeping key order.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::invalid("relationship data must be a JSON object"));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (entity, records) in map {
            let records: Vec<RelationshipRecord> = serde_json::from_value(records)
                .map_err(|e| Error::invalid(format!("relationships of `{entity}`: {e}")))?;
            entries.push((entity, records));
        }

        debug!(entities = entries.len(), "loaded relationship graph");
        Ok(RelationshipGraph { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<RelationshipRecord>)>,
        S: Into<String>,
    {
        RelationshipGraph { entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outgoing records of `entity` (exact name).
    pub fn get(&self, entity: &str) -> Option<&[RelationshipRecord]> {
        self.entries.iter().find(|(k, _)| k == entity).map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RelationshipRecord])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every relationship touching `entity`: first those where it is the
    /// source, then those where it is the target, each in mapping order.
    pub fn relationships_for<'a>(&'a self, entity: &str) -> Vec<Relationship<'a>> {
        let outgoing = self
            .entries
            .iter()
            .filter(|(source, _)| source == entity)
            .flat_map(|(source, records)| records.iter().map(move |record| Relationship { source, record }));

        let incoming = self.entries.iter().flat_map(|(source, records)| {
            records.iter().filter(|r| r.target == entity).map(move |record| Relationship { source, record })
        });

        outgoing.chain(incoming).collect()
    }

    /// Derive the matchable catalog: keys and targets, first-seen order.
    pub fn catalog(&self) -> EntityCatalog {
        let names = self
            .entries
            .iter()
            .flat_map(|(source, records)| std::iter::once(source.as_str()).chain(records.iter().map(|r| r.target.as_str())));
        EntityCatalog::from_names(names)
    }
}

/// Deduplicated, ordered set of entity names to match against.
///
/// Names are stored as given and compared case-insensitively. The search
/// automaton is compiled on first use and shared by every later scan, so a
/// catalog is cheap to reuse across selections and safe to share between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    names: Vec<String>,
    compiled: OnceCell<CompiledCatalog>,
}

impl EntityCatalog {
    /// Build from names, dropping exact duplicates and blank names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() || seen.contains(name) {
                continue;
            }
            seen.insert(name.to_string());
            kept.push(name.to_string());
        }

        debug!(entities = kept.len(), "built entity catalog");
        EntityCatalog { names: kept, compiled: OnceCell::new() }
    }

    pub fn from_graph(graph: &RelationshipGraph) -> Self {
        graph.catalog()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact (case-sensitive) membership.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub(crate) fn compiled(&self) -> Result<&CompiledCatalog> {
        self.compiled.get_or_try_init(|| CompiledCatalog::new(&self.names))
    }
}

impl PartialEq for EntityCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl From<&RelationshipGraph> for EntityCatalog {
    fn from(graph: &RelationshipGraph) -> Self {
        graph.catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_graph() -> RelationshipGraph {
        RelationshipGraph::from_value(json!({
            "Jacob Frey": [
                {
                    "relationship": "PROPOSED",
                    "target": "Third Precinct",
                    "evidence": "Council members postponed a vote on Mayor Jacob Frey's choice.",
                    "articleID": "600312948",
                    "headline": "Minneapolis City Council delays vote on Third Precinct police station",
                    "date": "2023-10-17T22:27:51.242Z"
                },
                { "relationship": "MAYOR_OF", "target": "Minneapolis", "articleID": 600312949, "relevance": 0.8 }
            ],
            "Kyrees Darius Johnson": [
                { "relationship": "HAS_LOCATION", "target": "Minneapolis" }
            ],
            "Minneapolis": []
        }))
        .unwrap()
    }

    #[test]
    fn parses_provider_records() {
        let graph = sample_graph();
        assert_eq!(graph.len(), 3);

        let frey = graph.get("Jacob Frey").unwrap();
        assert_eq!(frey[0].article_id.as_deref(), Some("600312948"));
        assert_eq!(frey[0].date.unwrap().to_rfc3339(), "2023-10-17T22:27:51.242+00:00");
        assert_eq!(frey[1].article_id.as_deref(), Some("600312949"));
        assert_eq!(frey[1].relevance, Some(0.8));
        assert_eq!(frey[1].evidence, None);
    }

    #[test]
    fn catalog_is_keys_and_targets_in_first_seen_order() {
        let catalog = sample_graph().catalog();
        assert_eq!(catalog.names(), &["Jacob Frey", "Third Precinct", "Minneapolis", "Kyrees Darius Johnson"]);
    }

    #[test]
    fn catalog_skips_blank_and_duplicate_names() {
        let catalog = EntityCatalog::from_names(["Tim Walz", "  ", "", "Tim Walz", "tim walz"]);
        assert_eq!(catalog.names(), &["Tim Walz", "tim walz"]);
        assert!(catalog.contains("tim walz"));
        assert!(!catalog.contains("TIM WALZ"));
    }

    #[test]
    fn relationships_for_collects_outgoing_then_incoming() {
        let graph = sample_graph();
        let rels = graph.relationships_for("Minneapolis");
        let summary: Vec<(&str, &str)> = rels.iter().map(|r| (r.source, r.record.relationship.as_str())).collect();
        assert_eq!(summary, vec![("Jacob Frey", "MAYOR_OF"), ("Kyrees Darius Johnson", "HAS_LOCATION")]);

        let rels = graph.relationships_for("Jacob Frey");
        assert_eq!(rels.len(), 2);
        assert!(rels.iter().all(|r| r.source == "Jacob Frey"));

        assert!(graph.relationships_for("Nobody").is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        let cases = [
            ("[]", "JSON object"),
            ("not json", "not JSON"),
            (r#"{"A": {"relationship": "X", "target": "B"}}"#, "relationships of `A`"),
            (r#"{"A": [{"relationship": "X"}]}"#, "missing field `target`"),
            (r#"{"A": [{"relationship": "X", "target": 7}]}"#, "relationships of `A`"),
            (r#"{"A": [{"relationship": "X", "target": "B", "date": "last tuesday"}]}"#, "relationships of `A`"),
            (r#"{"A": [{"relationship": "X", "target": "B", "relevance": "high"}]}"#, "relationships of `A`"),
        ];

        for (input, needle) in cases {
            match RelationshipGraph::from_json_str(input) {
                Err(Error::InvalidArgument(msg)) => assert!(msg.contains(needle), "{input}: {msg}"),
                Ok(_) => panic!("{input} should be rejected"),
            }
        }
    }

    #[test]
    fn record_serializes_with_provider_field_names() {
        let graph = sample_graph();
        let record = &graph.get("Jacob Frey").unwrap()[0];
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["articleID"], "600312948");
        assert!(value.get("relevance").is_none());
    }

    #[test]
    fn compiled_automaton_is_built_once() {
        let catalog = EntityCatalog::from_names(["Omar Fateh"]);
        let first = catalog.compiled().unwrap() as *const CompiledCatalog;
        let second = catalog.compiled().unwrap() as *const CompiledCatalog;
        assert_eq!(first, second);
    }
}
