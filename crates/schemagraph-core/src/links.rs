//! Run-level audit of cross-document links.

use crate::assemble::{Document, Embed};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Keys a node may carry and still count as a pointer rather than a definition.
const REFERENCE_KEYS: [&str; 3] = ["@id", "@type", "name"];

/// Identifiers minted by the registry always carry a fragment; anything
/// else (Wikidata entities, profile URLs) is external and not audited.
fn is_local(id: &str) -> bool {
    id.contains('#')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub document: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateDefinition {
    pub id: String,
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// References whose target is not defined anywhere in the run.
    pub unresolved: Vec<UnresolvedReference>,
    /// Identifiers embedded in full by more than one document.
    pub duplicates: Vec<DuplicateDefinition>,
    /// Stubbed identifiers that no document embeds in full.
    pub orphan_stubs: Vec<String>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.duplicates.is_empty() && self.orphan_stubs.is_empty()
    }
}

/// Audit all documents of one run together.
pub fn audit(documents: &[Document]) -> LinkReport {
    let mut full: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut stubs: BTreeSet<String> = BTreeSet::new();
    let mut defined: BTreeSet<String> = BTreeSet::new();

    for doc in documents {
        for entry in &doc.graph {
            let id = entry.id();
            if id.is_empty() {
                continue;
            }
            match entry.embed {
                Embed::Full => full.entry(id.to_string()).or_default().push(doc.key.clone()),
                Embed::Stub => {
                    stubs.insert(id.to_string());
                }
            }
            defined.insert(id.to_string());
        }
        for entry in doc.entries(Embed::Full) {
            collect_nested_definitions(&entry.node, true, &mut defined);
        }
    }

    let mut unresolved = Vec::new();
    for doc in documents {
        let mut seen = BTreeSet::new();
        for entry in &doc.graph {
            let mut refs = Vec::new();
            collect_references(&entry.node, true, &mut refs);
            for id in refs {
                if !defined.contains(&id) && seen.insert(id.clone()) {
                    unresolved.push(UnresolvedReference {
                        document: doc.key.clone(),
                        id,
                    });
                }
            }
        }
    }

    let duplicates = full
        .iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|(id, docs)| DuplicateDefinition {
            id: id.clone(),
            documents: docs.clone(),
        })
        .collect();

    let orphan_stubs = stubs.into_iter().filter(|id| !full.contains_key(id)).collect();

    LinkReport {
        unresolved,
        duplicates,
        orphan_stubs,
    }
}

fn is_reference(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("@id") && map.keys().all(|k| REFERENCE_KEYS.contains(&k.as_str()))
}

fn collect_references(value: &Value, top: bool, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if !top && is_reference(map) {
                if let Some(id) = map.get("@id").and_then(Value::as_str).filter(|id| is_local(id)) {
                    out.push(id.to_string());
                }
                return;
            }
            for child in map.values() {
                collect_references(child, false, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, false, out)),
        _ => {}
    }
}

/// Nested nodes with their own `@id` and content (departments, the
/// application inside a pricing offer) define that identifier too.
fn collect_nested_definitions(value: &Value, top: bool, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if !top && !is_reference(map) {
                if let Some(id) = map.get("@id").and_then(Value::as_str) {
                    out.insert(id.to_string());
                }
            }
            for child in map.values() {
                collect_nested_definitions(child, false, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_nested_definitions(v, false, out)),
        _ => {}
    }
}
