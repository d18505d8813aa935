//! Organization / LocalBusiness.

use super::common::{
    aggregate_rating, area_served, contact_point, geo, image_object, knows_about, offer_catalog,
    opening_hours, postal_address, same_as,
};
use super::person::person_reference;
use super::{Entity, Site};
use crate::fields::{BusinessFields, BusinessKind, LocationFields};
use crate::ids::{normalize_url, IdentifierRegistry, Role};
use crate::node::{first_non_empty, one_or_many, Node};
use serde_json::{json, Value};

/// `@type` for the business: the configured subtype alongside its base type.
pub fn organization_type(business: &BusinessFields) -> Value {
    let base = match business.kind {
        BusinessKind::Local => "LocalBusiness",
        BusinessKind::Organization => "Organization",
    };
    let subtype = business
        .schema_subtype
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    let generic = ["", "Organization", "LocalBusiness", "OnlineBusiness"];
    if generic.contains(&subtype) {
        Value::from(base)
    } else {
        json!([subtype, base])
    }
}

/// The canonical Organization node for the site.
///
/// `person_name` is the run's resolved Person; the founder links to it only
/// when both name the same person.
pub fn organization(
    business: &BusinessFields,
    person_name: &str,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let org_id = site.id(ids, &Role::Organization);
    let mut node = Node::entity(organization_type(business), org_id.clone());

    node.set("name", business.name.as_str());
    node.set("url", normalize_url(&business.website_url));
    node.set("legalName", business.legal_name.as_deref());
    node.set("alternateName", business.alternate_name.as_deref());
    node.set("description", business.description.as_deref());
    node.set(
        "disambiguatingDescription",
        business.disambiguating_description.as_deref(),
    );
    node.set("slogan", business.slogan.as_deref());
    node.set("foundingDate", business.founding_date.as_deref());
    node.set("foundingLocation", business.founding_location.as_deref());
    node.set("email", business.email.as_deref());
    node.set("telephone", business.telephone.as_deref());
    node.set("additionalType", business.additional_types.clone());
    node.set("logo", image_object(business.logo_url.as_deref()));
    node.set("image", image_object(business.image_url.as_deref()));
    node.set("knowsAbout", knows_about(&business.knows_about));
    node.set("sameAs", same_as(&business.same_as));
    node.set(
        "contactPoint",
        contact_point(business.telephone.as_deref(), business.email.as_deref()),
    );
    node.set(
        "founder",
        founder(business.founder_name.as_deref(), person_name, site, ids),
    );
    if let Some(parent) = business.parent_organization.as_deref() {
        node.set("parentOrganization", Node::typed("Organization").with("name", parent));
    }

    let area = area_served(&business.area_served, &business.address.country);
    node.set("areaServed", area.clone());
    node.set(
        "aggregateRating",
        aggregate_rating(business.aggregate_rating.as_ref()),
    );

    let catalog_name = format!("{} Services", business.name.trim());
    node.set(
        "hasOfferCatalog",
        offer_catalog(catalog_name.trim(), &business.services, &org_id, &area),
    );

    let offers: Vec<Value> = business
        .special_offers
        .iter()
        .filter(|o| !o.name.trim().is_empty())
        .map(|o| {
            Node::typed("Offer")
                .with("name", o.name.as_str())
                .with("description", o.description.as_str())
                .into()
        })
        .collect();
    node.set("makesOffer", offers);

    if business.kind == BusinessKind::Local {
        node.set("priceRange", business.price_range.as_deref());
        node.set("paymentAccepted", business.payment_accepted.as_deref());
        node.set("currenciesAccepted", business.currencies_accepted.as_deref());
        node.set("hasMap", business.has_map.as_deref());
        node.set("address", postal_address(&business.address));
        node.set(
            "geo",
            geo(business.latitude.as_deref(), business.longitude.as_deref()),
        );
        node.set(
            "openingHoursSpecification",
            opening_hours(&business.opening_hours),
        );
    }

    let departments: Vec<Value> = business
        .locations
        .iter()
        .enumerate()
        .map(|(idx, loc)| department(loc, idx + 1, business, site, ids))
        .collect();
    node.set("department", one_or_many(departments));

    Entity::new(Role::Organization, node.into_value())
}

/// A founder other than the site's Person stays unlinked so `#person` names one person.
fn founder(founder: Option<&str>, person_name: &str, site: &Site, ids: &IdentifierRegistry) -> Value {
    match founder.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) if name.eq_ignore_ascii_case(person_name.trim()) => {
            person_reference(person_name, site, ids)
        }
        Some(name) => Node::typed("Person").with("name", name).into(),
        None => Value::Null,
    }
}

/// A branch location, identified under the site base as `#location-<n>`.
fn department(
    location: &LocationFields,
    index: usize,
    business: &BusinessFields,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Value {
    let id = site.id(ids, &Role::Location(index));
    let url = normalize_url(&location.url);
    Node::entity("LocalBusiness", id)
        .with(
            "name",
            first_non_empty([location.name.as_str(), business.name.as_str()]).unwrap_or_default(),
        )
        .with(
            "url",
            first_non_empty([url.as_str(), site.base_url.as_str()]).unwrap_or_default(),
        )
        .with("telephone", location.telephone.as_str())
        .with("email", location.email.as_str())
        .with("address", postal_address(&location.address))
        .with(
            "openingHoursSpecification",
            opening_hours(&location.opening_hours),
        )
        .into()
}
