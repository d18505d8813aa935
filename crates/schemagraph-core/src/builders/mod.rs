//! Entity builders: one pure function per schema.org type.
//!
//! Builders take a typed field set, the run's [`Site`] and the
//! [`IdentifierRegistry`], and return an [`Entity`]. They never fail:
//! missing input leads to omitted properties, not errors. Shared entities
//! (Organization, WebSite, Person) are always referenced by `@id`; only
//! value objects without identity of their own are nested.

pub mod blog;
pub mod breadcrumb;
pub mod common;
pub mod faq;
pub mod organization;
pub mod person;
pub mod product;
pub mod saas;
pub mod service;
pub mod site;

pub use blog::blog_posting;
pub use breadcrumb::breadcrumb_list;
pub use faq::faq_page;
pub use organization::organization;
pub use person::{person, person_reference};
pub use product::product;
pub use saas::{pricing_offer, web_application};
pub use service::{service, service_categories};
pub use site::{web_page, website};

use crate::fields::BusinessFields;
use crate::ids::{normalize_url, IdentifierRegistry, Role, PLACEHOLDER_BASE};
use serde_json::Value;

/// Per-run facts every builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Normalized site URL; the identifier base for shared entities.
    pub base_url: String,
    pub name: String,
    pub language: String,
}

impl Site {
    pub fn from_business(business: &BusinessFields) -> Self {
        let base = normalize_url(&business.website_url);
        Self {
            base_url: if base.is_empty() {
                PLACEHOLDER_BASE.to_string()
            } else {
                base
            },
            name: business.name.trim().to_string(),
            language: if business.language.trim().is_empty() {
                "en".to_string()
            } else {
                business.language.trim().to_string()
            },
        }
    }

    /// `<base>/<path>`, for pages without an explicit URL.
    pub fn page_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    /// Normalized `explicit` URL, or `<base>/<fallback_path>` when blank.
    pub fn url_or(&self, explicit: Option<&str>, fallback_path: &str) -> String {
        match explicit.map(normalize_url) {
            Some(url) if !url.is_empty() => url,
            _ => self.page_url(fallback_path),
        }
    }

    pub fn id(&self, ids: &IdentifierRegistry, role: &Role) -> String {
        ids.identifier_for(role, &self.base_url)
    }
}

/// A built node together with the role it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub role: Role,
    pub id: String,
    pub node: Value,
}

impl Entity {
    pub fn new(role: Role, node: Value) -> Self {
        let id = node
            .get("@id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { role, id, node }
    }

    /// First `@type` of the node.
    pub fn type_name(&self) -> &str {
        match self.node.get("@type") {
            Some(Value::String(t)) => t,
            Some(Value::Array(types)) => types.first().and_then(Value::as_str).unwrap_or(""),
            _ => "",
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.node.get(key)
    }

    /// Add a property after building; blank values are ignored.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let (Value::Object(map), Some(v)) = (&mut self.node, crate::node::prune(value.into())) {
            map.insert(key.to_string(), v);
        }
        self
    }
}
