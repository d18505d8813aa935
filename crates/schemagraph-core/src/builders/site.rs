//! WebSite and WebPage variants.

use super::{Entity, Site};
use crate::fields::{BusinessFields, PageFields};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::Node;
use serde_json::json;

pub fn website(business: &BusinessFields, site: &Site, ids: &IdentifierRegistry) -> Entity {
    let mut node = Node::entity("WebSite", site.id(ids, &Role::WebSite));
    node.set("url", normalize_url(&business.website_url));
    node.set("name", business.name.as_str());
    node.set("description", business.description.as_deref());
    node.set("inLanguage", site.language.as_str());
    node.set("publisher", reference(&site.id(ids, &Role::Organization)));

    if business.enable_search_action {
        node.set(
            "potentialAction",
            json!({
                "@type": "SearchAction",
                "target": {
                    "@type": "EntryPoint",
                    "urlTemplate": format!("{}/?s={{search_term_string}}", site.base_url),
                },
                "query-input": "required name=search_term_string",
            }),
        );
    }

    Entity::new(Role::WebSite, node.into_value())
}

/// A page of the site. `page_type` is `WebPage`, `AboutPage`, `ContactPage`, ...
///
/// The page is identified by its own URL (`<url>#webpage`), so every page of
/// the site gets a distinct identifier.
pub fn web_page(
    page_type: &str,
    page: &PageFields,
    url: &str,
    fallback_name: &str,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let url = normalize_url(url);
    let mut node = Node::entity(page_type, ids.identifier_for(&Role::WebPage, &url));
    node.set("url", url.as_str());
    node.set_first(
        "name",
        [page.title.as_deref().unwrap_or_default(), fallback_name],
    );
    node.set("description", page.description.as_deref());
    node.set("inLanguage", site.language.as_str());
    node.set("relatedLink", page.related_links.clone());
    node.set("significantLink", page.significant_links.clone());
    Entity::new(Role::WebPage, node.into_value())
}
