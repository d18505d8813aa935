//! BreadcrumbList.

use super::{Entity, Site};
use crate::fields::{BreadcrumbFields, BreadcrumbItem};
use crate::ids::{normalize_url, IdentifierRegistry, Role};
use crate::node::Node;
use serde_json::{json, Value};

/// Positions count only named items. With no items, a single "Home" crumb.
pub fn breadcrumb_list(
    fields: &BreadcrumbFields,
    page_url: &str,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let page_url = normalize_url(page_url);
    let home = [BreadcrumbItem {
        name: "Home".to_string(),
        url: site.base_url.clone(),
    }];
    let items: &[BreadcrumbItem] = if fields.items.is_empty() {
        &home
    } else {
        &fields.items
    };

    let elements: Vec<Value> = items
        .iter()
        .filter(|item| !item.name.trim().is_empty())
        .enumerate()
        .map(|(idx, item)| {
            let url = normalize_url(&item.url);
            json!({
                "@type": "ListItem",
                "position": idx + 1,
                "name": item.name,
                "item": if url.is_empty() { site.base_url.clone() } else { url },
            })
        })
        .collect();

    let node = Node::entity(
        "BreadcrumbList",
        ids.identifier_for(&Role::Breadcrumb, &page_url),
    )
    .with("itemListElement", elements);

    Entity::new(Role::Breadcrumb, node.into_value())
}
