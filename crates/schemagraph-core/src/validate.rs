//! Field presence validation.
//!
//! A static table lists, per schema.org type, which dot-separated paths
//! must be present (errors) and which should be (warnings). This is a
//! completeness check for rich-result eligibility, not a validation against
//! the schema.org vocabulary.

use crate::assemble::Document;
use crate::node::is_empty_value;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Required and recommended paths for one primary type.
#[derive(Debug, Clone, Copy)]
pub struct TypeRules {
    pub type_name: &'static str,
    pub required: &'static [&'static str],
    pub recommended: &'static [&'static str],
}

const PAGE_REQUIRED: &[&str] = &["name", "url"];
const PAGE_RECOMMENDED: &[&str] = &["description", "isPartOf", "inLanguage"];

pub const RULES: &[TypeRules] = &[
    TypeRules {
        type_name: "Organization",
        required: &["name", "url"],
        recommended: &["description", "logo", "sameAs", "contactPoint"],
    },
    TypeRules {
        type_name: "LocalBusiness",
        required: &["name", "address", "address.streetAddress", "address.addressLocality"],
        recommended: &["telephone", "url", "geo", "openingHoursSpecification", "priceRange", "image"],
    },
    TypeRules {
        type_name: "Person",
        required: &["name"],
        recommended: &["jobTitle", "worksFor", "description", "image", "sameAs"],
    },
    TypeRules {
        type_name: "WebSite",
        required: &["name", "url"],
        recommended: &["publisher", "inLanguage", "description"],
    },
    TypeRules {
        type_name: "WebPage",
        required: PAGE_REQUIRED,
        recommended: PAGE_RECOMMENDED,
    },
    TypeRules {
        type_name: "AboutPage",
        required: PAGE_REQUIRED,
        recommended: PAGE_RECOMMENDED,
    },
    TypeRules {
        type_name: "ContactPage",
        required: PAGE_REQUIRED,
        recommended: PAGE_RECOMMENDED,
    },
    TypeRules {
        type_name: "FAQPage",
        required: &["mainEntity", "mainEntity.name", "mainEntity.acceptedAnswer.text"],
        recommended: &["name", "url", "isPartOf", "reviewedBy"],
    },
    TypeRules {
        type_name: "Service",
        required: &["name", "provider"],
        recommended: &["serviceType", "description", "areaServed", "url"],
    },
    TypeRules {
        type_name: "BlogPosting",
        required: &["headline", "author", "datePublished"],
        recommended: &["image", "publisher", "dateModified", "description", "mainEntityOfPage"],
    },
    TypeRules {
        type_name: "Product",
        required: &["name", "offers", "offers.price", "offers.priceCurrency"],
        recommended: &["image", "description", "sku", "brand", "offers.availability"],
    },
    TypeRules {
        type_name: "WebApplication",
        required: &["name", "applicationCategory"],
        recommended: &["offers", "operatingSystem", "description", "url"],
    },
    TypeRules {
        type_name: "BreadcrumbList",
        required: &[
            "itemListElement",
            "itemListElement.position",
            "itemListElement.name",
            "itemListElement.item",
        ],
        recommended: &[],
    },
];

pub fn rules_for(type_name: &str) -> Option<&'static TypeRules> {
    RULES.iter().find(|r| r.type_name == type_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}**: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn rendered_errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn rendered_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Check a document's primary node against the rule table.
pub fn validate(document: &Document) -> ValidationReport {
    let graph: Vec<&Value> = document.graph.iter().map(|e| &e.node).collect();
    match document.primary() {
        Some(primary) => validate_node(primary, &graph),
        None => ValidationReport {
            errors: vec![ValidationIssue::new("@graph", "Document has no primary entity")],
            warnings: Vec::new(),
        },
    }
}

/// Check one node; `graph` is used to follow `{"@id"}` references.
pub fn validate_node(node: &Value, graph: &[&Value]) -> ValidationReport {
    let types = type_names(node);
    let Some(rules) = types.iter().find_map(|t| rules_for(t)) else {
        let shown = if types.is_empty() {
            "(none)".to_string()
        } else {
            types.join(", ")
        };
        return ValidationReport {
            errors: Vec::new(),
            warnings: vec![ValidationIssue::new(
                "@type",
                format!("No validation rules for type {shown}"),
            )],
        };
    };

    let missing = |paths: &'static [&'static str], message: &str| -> Vec<ValidationIssue> {
        paths
            .iter()
            .filter(|path| !satisfied(node, &path.split('.').collect::<Vec<_>>(), graph))
            .map(|path| ValidationIssue::new(*path, message))
            .collect()
    };

    ValidationReport {
        errors: missing(rules.required, "Missing required field"),
        warnings: missing(rules.recommended, "Missing recommended field"),
    }
}

fn type_names(node: &Value) -> Vec<&str> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Replace a bare `{"@id": ...}` by the graph node it names, when present.
fn follow<'a>(value: &'a Value, graph: &[&'a Value]) -> &'a Value {
    match value.as_object() {
        Some(map) if map.len() == 1 => match map.get("@id").and_then(Value::as_str) {
            Some(id) => graph
                .iter()
                .find(|n| n.get("@id").and_then(Value::as_str) == Some(id))
                .copied()
                .unwrap_or(value),
            None => value,
        },
        _ => value,
    }
}

fn satisfied(value: &Value, path: &[&str], graph: &[&Value]) -> bool {
    let value = follow(value, graph);
    let Some((head, rest)) = path.split_first() else {
        return !is_empty_value(value);
    };
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(|item| satisfied(item, path, graph)),
        Value::Object(map) => map
            .get(*head)
            .is_some_and(|child| satisfied(child, rest, graph)),
        _ => false,
    }
}
