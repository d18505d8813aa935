//! Service pages: a single service, or the categories of a services overview.

use super::common::{area_served, offer_catalog};
use super::{Entity, Site};
use crate::fields::{BusinessFields, ServiceFields, ServicesFields};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::{first_non_empty, Node};

pub fn service(
    fields: &ServiceFields,
    url: &str,
    business: &BusinessFields,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let url = normalize_url(url);
    let org_id = site.id(ids, &Role::Organization);
    let area = area_served(&business.area_served, &business.address.country);

    let mut node = Node::entity("Service", ids.identifier_for(&Role::Service, &url));
    node.set("name", fields.name.as_str());
    node.set("description", fields.description.as_deref());
    node.set_first(
        "serviceType",
        [fields.service_type.as_deref().unwrap_or_default(), fields.name.as_str()],
    );
    node.set("url", url.as_str());
    node.set("audience", fields.audience.as_deref());
    node.set("additionalType", fields.additional_type.as_deref());
    node.set("provider", reference(&org_id));
    node.set("brand", reference(&org_id));
    node.set("areaServed", area.clone());
    node.set(
        "hasOfferCatalog",
        offer_catalog(
            &format!("{} Services", fields.name.trim()),
            &fields.sub_services,
            &org_id,
            &area,
        ),
    );

    Entity::new(Role::Service, node.into_value())
}

/// One `Service` per category, identified as `#service-<n>`.
pub fn service_categories(
    fields: &ServicesFields,
    page_url: &str,
    business: &BusinessFields,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Vec<Entity> {
    let org_id = site.id(ids, &Role::Organization);
    let area = area_served(&business.area_served, &business.address.country);
    let page_url = normalize_url(page_url);

    fields
        .categories
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let role = Role::ServiceItem(idx + 1);
            let own_url = normalize_url(&category.url);
            let base = first_non_empty([own_url.as_str(), site.base_url.as_str()]).unwrap_or_default();
            let fallback_name = format!("Service {}", idx + 1);
            let name = first_non_empty([category.name.as_str(), fallback_name.as_str()])
                .unwrap_or_default()
                .to_string();

            let node = Node::entity("Service", ids.identifier_for(&role, base))
                .with("name", name.as_str())
                .with("description", category.description.as_str())
                .with(
                    "serviceType",
                    first_non_empty([category.service_type.as_str(), name.as_str()]).unwrap_or_default(),
                )
                .with(
                    "url",
                    first_non_empty([own_url.as_str(), page_url.as_str()]).unwrap_or_default(),
                )
                .with("provider", reference(&org_id))
                .with("brand", reference(&org_id))
                .with("areaServed", area.clone())
                .with(
                    "hasOfferCatalog",
                    offer_catalog(&name, &category.services, &org_id, &serde_json::Value::Null),
                );
            Entity::new(role, node.into_value())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{ServiceCategory, ServiceSummary};
    use serde_json::json;

    #[test]
    fn sub_services_form_an_offer_catalog() {
        let business = BusinessFields::new("Acme", "acme.com");
        let site = Site::from_business(&business);
        let fields = ServiceFields {
            name: "Drain Cleaning".to_string(),
            sub_services: vec![ServiceSummary {
                name: "Hydro Jetting".to_string(),
                ..ServiceSummary::default()
            }],
            ..ServiceFields::default()
        };
        let svc = service(&fields, "https://acme.com/drains", &business, &site, &IdentifierRegistry::new());
        assert_eq!(svc.id, "https://acme.com/drains#service");
        assert_eq!(svc.node["serviceType"], json!("Drain Cleaning"));
        let item = &svc.node["hasOfferCatalog"]["itemListElement"][0]["itemOffered"];
        assert_eq!(item["name"], json!("Hydro Jetting"));
        assert_eq!(item["provider"], json!({"@id": "https://acme.com#organization"}));
    }

    #[test]
    fn categories_are_numbered() {
        let business = BusinessFields::new("Acme", "acme.com");
        let site = Site::from_business(&business);
        let fields = ServicesFields {
            categories: vec![
                ServiceCategory {
                    name: "Plumbing".to_string(),
                    ..ServiceCategory::default()
                },
                ServiceCategory::default(),
            ],
            ..ServicesFields::default()
        };
        let cats = service_categories(&fields, "https://acme.com/services", &business, &site, &IdentifierRegistry::new());
        assert_eq!(cats[0].id, "https://acme.com#service-1");
        assert_eq!(cats[1].id, "https://acme.com#service-2");
        assert_eq!(cats[1].node["name"], json!("Service 2"));
        assert_eq!(cats[1].node["url"], json!("https://acme.com/services"));
    }
}
