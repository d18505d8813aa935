//! Entity identifiers.
//!
//! Every addressable entity gets an `@id` of the form `<base>#<fragment>`,
//! where `<base>` is a normalized URL and `<fragment>` is fixed per role.
//! The identifier is a pure function of `(role, base)`, so documents built
//! in any order (or on different machines) agree on the same strings.
//!
//! The registry additionally keeps a ledger of what it handed out. The
//! ledger is observational: it lets callers discover an identifier that was
//! already assigned, and it never influences the value returned.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Base used when no site URL was supplied.
pub const PLACEHOLDER_BASE: &str = "https://example.com";

/// The role an entity plays in the generated site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Organization,
    WebSite,
    Person,
    WebPage,
    FaqPage,
    Service,
    /// One of several services on a multi-service page (1-based).
    ServiceItem(usize),
    Product,
    BlogPosting,
    WebApplication,
    AggregateOffer,
    Breadcrumb,
    /// One branch of a multi-location organization (1-based).
    Location(usize),
}

impl Role {
    /// The `#fragment` used for this role.
    pub fn fragment(&self) -> String {
        match self {
            Role::Organization => "organization".to_string(),
            Role::WebSite => "website".to_string(),
            Role::Person => "person".to_string(),
            Role::WebPage => "webpage".to_string(),
            Role::FaqPage => "faqpage".to_string(),
            Role::Service => "service".to_string(),
            Role::ServiceItem(n) => format!("service-{n}"),
            Role::Product => "product".to_string(),
            Role::BlogPosting => "blogposting".to_string(),
            Role::WebApplication => "webapp".to_string(),
            Role::AggregateOffer => "aggregateoffer".to_string(),
            Role::Breadcrumb => "breadcrumb".to_string(),
            Role::Location(n) => format!("location-{n}"),
        }
    }

    /// Shared entities are defined once per run and referenced elsewhere.
    pub fn shared(&self) -> Option<SharedEntity> {
        match self {
            Role::Organization => Some(SharedEntity::Organization),
            Role::WebSite => Some(SharedEntity::Website),
            Role::Person => Some(SharedEntity::Person),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

/// Entities that appear in many documents of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedEntity {
    Organization,
    #[serde(alias = "web_site")]
    Website,
    Person,
}

impl SharedEntity {
    pub const ALL: [SharedEntity; 3] = [
        SharedEntity::Organization,
        SharedEntity::Website,
        SharedEntity::Person,
    ];

    pub fn role(self) -> Role {
        match self {
            SharedEntity::Organization => Role::Organization,
            SharedEntity::Website => Role::WebSite,
            SharedEntity::Person => Role::Person,
        }
    }
}

/// Normalize a URL for use as an identifier base.
///
/// Adds `https://` when no http(s) scheme is present, drops any fragment,
/// lower-cases the host and strips trailing slashes. Returns an empty string
/// for blank input.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let normalized = match url::Url::parse(&with_scheme) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => with_scheme
            .split('#')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    normalized.trim_end_matches('/').to_string()
}

/// Join a normalized base and a role fragment.
pub fn build_id(base_url: &str, role: &Role) -> String {
    let base = normalize_url(base_url);
    let base = if base.is_empty() {
        PLACEHOLDER_BASE.to_string()
    } else {
        base
    };
    format!("{base}#{}", role.fragment())
}

/// `{"@id": ...}` reference to an entity defined elsewhere.
pub fn reference(id: &str) -> serde_json::Value {
    serde_json::json!({ "@id": id })
}

/// Hands out stable identifiers and remembers what it handed out.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    assigned: Mutex<BTreeMap<(Role, String), String>>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for `role` under `base_url`. Same inputs, same string.
    pub fn identifier_for(&self, role: &Role, base_url: &str) -> String {
        let id = build_id(base_url, role);
        let key = (role.clone(), normalize_url(base_url));
        self.assigned.lock().entry(key).or_insert_with(|| id.clone());
        id
    }

    /// An identifier previously assigned for `(role, base_url)`, if any.
    pub fn lookup(&self, role: &Role, base_url: &str) -> Option<String> {
        let key = (role.clone(), normalize_url(base_url));
        self.assigned.lock().get(&key).cloned()
    }

    /// All identifiers assigned so far, ordered by role then base.
    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.assigned.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_id_uses_bare_fragment() {
        let ids = IdentifierRegistry::new();
        assert_eq!(
            ids.identifier_for(&Role::Organization, "https://acme.com"),
            "https://acme.com#organization"
        );
    }

    #[test]
    fn normalization_folds_equivalent_spellings() {
        assert_eq!(normalize_url("acme.com/"), "https://acme.com");
        assert_eq!(normalize_url("  https://ACME.com/faq/ "), "https://acme.com/faq");
        assert_eq!(normalize_url("https://acme.com/#top"), "https://acme.com");
        assert_eq!(normalize_url("http://acme.com"), "http://acme.com");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn blank_base_falls_back_to_placeholder() {
        let ids = IdentifierRegistry::new();
        assert_eq!(
            ids.identifier_for(&Role::WebSite, "   "),
            "https://example.com#website"
        );
    }

    #[test]
    fn indexed_roles_get_distinct_fragments() {
        assert_eq!(build_id("acme.com", &Role::ServiceItem(2)), "https://acme.com#service-2");
        assert_eq!(build_id("acme.com", &Role::Location(1)), "https://acme.com#location-1");
        assert_ne!(
            build_id("acme.com", &Role::ServiceItem(1)),
            build_id("acme.com", &Role::Service)
        );
    }

    #[test]
    fn ledger_records_without_changing_results() {
        let ids = IdentifierRegistry::new();
        assert!(ids.lookup(&Role::Person, "acme.com").is_none());

        let first = ids.identifier_for(&Role::Person, "acme.com");
        let second = ids.identifier_for(&Role::Person, "https://acme.com/");
        assert_eq!(first, second);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.lookup(&Role::Person, "acme.com"), Some(first));
    }

    #[test]
    fn shared_roles_map_back_to_their_entity() {
        for entity in SharedEntity::ALL {
            assert_eq!(entity.role().shared(), Some(entity));
        }
        assert_eq!(Role::WebPage.shared(), None);
    }
}
