//! Document assembly.
//!
//! A document is one page's `@graph`: the primary entity, the chain of
//! containing entities it belongs to (page → site → publisher), and any
//! supporting entities. Shared entities are embedded in full by exactly one
//! document of the run, chosen by the [`EmbedPolicy`]; every other document
//! carries a minimal stub that points at the same `@id`.

use crate::builders::Entity;
use crate::ids::{reference, Role, SharedEntity};
use crate::node::Node;
use crate::request::PageKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// How an entity appears in a document's graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Embed {
    Full,
    Stub,
}

/// One step up the containment chain: the role of the ancestor and the
/// property the previous element uses to point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub property: &'static str,
    pub role: Role,
}

impl ChainLink {
    pub const fn new(property: &'static str, role: Role) -> Self {
        Self { property, role }
    }
}

/// The fixed containment order for one kind of page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSpec {
    pub links: Vec<ChainLink>,
}

impl ChainSpec {
    pub fn for_page(kind: PageKind) -> Self {
        let site = || {
            vec![
                ChainLink::new("isPartOf", Role::WebSite),
                ChainLink::new("publisher", Role::Organization),
            ]
        };
        let via_page = |property: &'static str| {
            let mut links = vec![ChainLink::new(property, Role::WebPage)];
            links.extend(site());
            links
        };

        let links = match kind {
            PageKind::Home
            | PageKind::About
            | PageKind::Contact
            | PageKind::Services
            | PageKind::WebApp
            | PageKind::Pricing => site(),
            PageKind::Website => vec![ChainLink::new("publisher", Role::Organization)],
            PageKind::Person => vec![ChainLink::new("worksFor", Role::Organization)],
            PageKind::Faq => via_page("isPartOf"),
            PageKind::Service | PageKind::Blog | PageKind::Product => via_page("mainEntityOfPage"),
            PageKind::Organization | PageKind::Breadcrumb => Vec::new(),
        };
        Self { links }
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.links.iter().map(|l| &l.role)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Which document carries the full form of each shared entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedPolicy {
    canonical: BTreeMap<SharedEntity, String>,
}

/// What a planned page will contain, for policy resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutline {
    pub key: String,
    pub kind: PageKind,
    pub carries: BTreeSet<SharedEntity>,
}

impl EmbedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entity: SharedEntity, page_key: impl Into<String>) -> Self {
        self.canonical.insert(entity, page_key.into());
        self
    }

    /// Default resolution, then explicit overrides.
    ///
    /// Per entity: the dedicated page, else the owning page, else the first
    /// page that carries the entity at all. An override naming a page that
    /// is not part of the run is ignored.
    pub fn resolve(pages: &[PageOutline], overrides: &BTreeMap<SharedEntity, String>) -> Self {
        let mut canonical = BTreeMap::new();

        for entity in SharedEntity::ALL {
            let carriers: Vec<&PageOutline> =
                pages.iter().filter(|p| p.carries.contains(&entity)).collect();

            let preferred = PageKind::owner_preference(entity)
                .iter()
                .find_map(|kind| carriers.iter().find(|p| p.kind == *kind))
                .or_else(|| carriers.first());

            if let Some(page) = preferred {
                canonical.insert(entity, page.key.clone());
            }
        }

        for (entity, key) in overrides {
            if pages.iter().any(|p| &p.key == key) {
                canonical.insert(*entity, key.clone());
            } else {
                tracing::warn!(entity = ?entity, page = %key, "canonical override names an unknown page; ignored");
            }
        }

        Self { canonical }
    }

    pub fn canonical_page(&self, entity: SharedEntity) -> Option<&str> {
        self.canonical.get(&entity).map(String::as_str)
    }

    /// Shared entities this document must carry in full.
    pub fn canonical_for(&self, doc_key: &str) -> Vec<SharedEntity> {
        self.canonical
            .iter()
            .filter(|(_, key)| key.as_str() == doc_key)
            .map(|(entity, _)| *entity)
            .collect()
    }

    /// Non-shared entities are always owned by the document that builds them.
    pub fn embed_for(&self, role: &Role, doc_key: &str) -> Embed {
        match role.shared() {
            Some(entity) if self.canonical_page(entity) != Some(doc_key) => Embed::Stub,
            _ => Embed::Full,
        }
    }
}

/// One node of a document's graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEntry {
    pub role: Role,
    pub embed: Embed,
    pub node: Value,
}

impl GraphEntry {
    pub fn id(&self) -> &str {
        self.node.get("@id").and_then(Value::as_str).unwrap_or_default()
    }
}

/// One page's JSON-LD document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub primary_type: String,
    pub graph: Vec<GraphEntry>,
}

impl Document {
    pub fn primary(&self) -> Option<&Value> {
        self.graph.first().map(|e| &e.node)
    }

    /// Top-level node with the given `@id`.
    pub fn node(&self, id: &str) -> Option<&Value> {
        self.graph.iter().find(|e| e.id() == id).map(|e| &e.node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph.iter().any(|e| e.id() == id)
    }

    pub fn entries(&self, embed: Embed) -> impl Iterator<Item = &GraphEntry> {
        self.graph.iter().filter(move |e| e.embed == embed)
    }

    /// Append a supporting entity unless a node with its `@id` is already present.
    pub fn push_supporting(&mut self, entity: Entity, policy: &EmbedPolicy) {
        if !entity.id.is_empty() && self.contains(&entity.id) {
            return;
        }
        let embed = policy.embed_for(&entity.role, &self.key);
        let node = match embed {
            Embed::Full => entity.node,
            Embed::Stub => stub(&entity, None),
        };
        self.graph.push(GraphEntry {
            role: entity.role,
            embed,
            node,
        });
    }

    /// `{"@context": "https://schema.org", "@graph": [...]}`.
    pub fn to_json(&self) -> Value {
        let nodes: Vec<Value> = self.graph.iter().map(|e| e.node.clone()).collect();
        json!({ "@context": SCHEMA_CONTEXT, "@graph": nodes })
    }
}

/// An ancestor entity paired with the link that reaches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ancestor {
    pub link: ChainLink,
    pub entity: Entity,
}

/// Pair a chain with the entities that fill it. Links without an entity are
/// skipped, and the chain continues from the last element present.
pub fn bind_chain(chain: &ChainSpec, mut resolve: impl FnMut(&Role) -> Option<Entity>) -> Vec<Ancestor> {
    chain
        .links
        .iter()
        .filter_map(|link| {
            resolve(&link.role).map(|entity| Ancestor {
                link: link.clone(),
                entity,
            })
        })
        .collect()
}

/// Compose one document.
///
/// The primary entity is embedded in full and linked to the first ancestor.
/// Each ancestor is linked to the next one and embedded either in full or
/// as a stub (`@id`, `@type`, `url`, link), as the policy decides. Supporting
/// entities follow; an entity already in the graph is not repeated.
pub fn assemble(
    key: &str,
    primary: Entity,
    chain: Vec<Ancestor>,
    supporting: Vec<Entity>,
    policy: &EmbedPolicy,
) -> Document {
    let primary_type = primary.type_name().to_string();
    let mut doc = Document {
        key: key.to_string(),
        primary_type,
        graph: Vec::with_capacity(1 + chain.len() + supporting.len()),
    };

    let first_link = chain
        .first()
        .map(|a| (a.link.property, reference(&a.entity.id)));
    let primary = match first_link {
        Some((property, target)) => primary.with(property, target),
        None => primary,
    };
    doc.graph.push(GraphEntry {
        role: primary.role.clone(),
        embed: Embed::Full,
        node: primary.node,
    });

    for (idx, ancestor) in chain.iter().enumerate() {
        if doc.contains(&ancestor.entity.id) {
            continue;
        }
        let next = chain
            .get(idx + 1)
            .map(|n| (n.link.property, reference(&n.entity.id)));
        let embed = policy.embed_for(&ancestor.entity.role, key);
        let node = match embed {
            Embed::Full => match &next {
                Some((property, target)) => ancestor.entity.clone().with(property, target.clone()).node,
                None => ancestor.entity.node.clone(),
            },
            Embed::Stub => stub(&ancestor.entity, next),
        };
        doc.graph.push(GraphEntry {
            role: ancestor.entity.role.clone(),
            embed,
            node,
        });
    }

    for entity in supporting {
        doc.push_supporting(entity, policy);
    }

    tracing::debug!(
        document = %doc.key,
        primary = %doc.primary_type,
        nodes = doc.graph.len(),
        stubs = doc.entries(Embed::Stub).count(),
        "assembled document"
    );
    doc
}

/// Minimal stand-in for an entity defined in full elsewhere.
fn stub(entity: &Entity, link: Option<(&str, Value)>) -> Value {
    let mut node = Node::entity(
        entity.node.get("@type").cloned().unwrap_or(Value::Null),
        entity.id.clone(),
    );
    if let Some(url) = entity.get("url") {
        node.set("url", url.clone());
    }
    if let Some((property, target)) = link {
        node.set(property, target);
    }
    node.into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{organization, web_page, website, Site};
    use crate::fields::{BusinessFields, PageFields};
    use crate::ids::IdentifierRegistry;

    fn outline(key: &str, kind: PageKind, carries: &[SharedEntity]) -> PageOutline {
        PageOutline {
            key: key.to_string(),
            kind,
            carries: carries.iter().copied().collect(),
        }
    }

    #[test]
    fn policy_prefers_dedicated_then_owner_then_first() {
        use SharedEntity::*;
        let pages = vec![
            outline("faq", PageKind::Faq, &[Organization, Website, Person]),
            outline("homepage", PageKind::Home, &[Organization, Website]),
            outline("website", PageKind::Website, &[Organization, Website]),
        ];
        let policy = EmbedPolicy::resolve(&pages, &BTreeMap::new());
        assert_eq!(policy.canonical_page(Website), Some("website"));
        assert_eq!(policy.canonical_page(Organization), Some("homepage"));
        assert_eq!(policy.canonical_page(Person), Some("faq"));
    }

    #[test]
    fn overrides_win_unless_unknown() {
        use SharedEntity::*;
        let pages = vec![
            outline("homepage", PageKind::Home, &[Organization, Website]),
            outline("faq", PageKind::Faq, &[Organization, Website]),
        ];
        let overrides = BTreeMap::from([
            (Organization, "faq".to_string()),
            (Website, "missing".to_string()),
        ]);
        let policy = EmbedPolicy::resolve(&pages, &overrides);
        assert_eq!(policy.canonical_page(Organization), Some("faq"));
        assert_eq!(policy.canonical_page(Website), Some("homepage"));
        assert_eq!(policy.canonical_for("faq"), vec![Organization]);
    }

    #[test]
    fn non_canonical_ancestors_become_stubs() {
        let business = BusinessFields::new("Acme Plumbing", "https://acme.com");
        let site = Site::from_business(&business);
        let ids = IdentifierRegistry::new();
        let page = web_page("ContactPage", &PageFields::default(), "https://acme.com/contact", "Contact", &site, &ids);

        let chain = ChainSpec::for_page(PageKind::Contact);
        let ancestors = bind_chain(&chain, |role| match role {
            Role::WebSite => Some(website(&business, &site, &ids)),
            Role::Organization => Some(organization(&business, "", &site, &ids)),
            _ => None,
        });
        let policy = EmbedPolicy::new()
            .with(SharedEntity::Website, "homepage")
            .with(SharedEntity::Organization, "contact");
        let doc = assemble("contact", page, ancestors, Vec::new(), &policy);

        assert_eq!(doc.primary_type, "ContactPage");
        assert_eq!(doc.graph.len(), 3);
        assert_eq!(doc.graph[0].node["isPartOf"], json!({"@id": "https://acme.com#website"}));
        assert_eq!(
            doc.graph[1].node,
            json!({
                "@id": "https://acme.com#website",
                "@type": "WebSite",
                "url": "https://acme.com",
                "publisher": {"@id": "https://acme.com#organization"}
            })
        );
        assert_eq!(doc.graph[1].embed, Embed::Stub);
        assert_eq!(doc.graph[2].embed, Embed::Full);
        assert_eq!(doc.graph[2].node["name"], json!("Acme Plumbing"));
    }

    #[test]
    fn supporting_entities_are_not_repeated() {
        let business = BusinessFields::new("Acme", "acme.com");
        let site = Site::from_business(&business);
        let ids = IdentifierRegistry::new();
        let org = organization(&business, "", &site, &ids);
        let ws = website(&business, &site, &ids);
        let chain = bind_chain(&ChainSpec::for_page(PageKind::Website), |_| Some(org.clone()));

        let doc = assemble("website", ws, chain, vec![org.clone()], &EmbedPolicy::new());
        assert_eq!(doc.graph.len(), 2);
        assert_eq!(doc.to_json()["@context"], json!("https://schema.org"));
    }

    #[test]
    fn chains_match_page_kinds() {
        let faq: Vec<Role> = ChainSpec::for_page(PageKind::Faq).roles().cloned().collect();
        assert_eq!(faq, vec![Role::WebPage, Role::WebSite, Role::Organization]);
        assert_eq!(
            ChainSpec::for_page(PageKind::Product).links[0],
            ChainLink::new("mainEntityOfPage", Role::WebPage)
        );
        assert!(ChainSpec::for_page(PageKind::Breadcrumb).is_empty());
    }
}
