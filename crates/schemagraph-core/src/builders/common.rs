//! Value objects shared by several builders (addresses, hours, topics, ...).

use crate::fields::{
    AreaServedFields, Mention, OpeningHours, PostalAddressFields, RatingFields, ServiceSummary,
    Topic,
};
use crate::ids::reference;
use crate::node::{first_non_empty, Node};
use serde_json::{json, Value};

/// Prefix the enrichment prompt uses for unverified profile URLs.
pub const PLACEHOLDER_PREFIX: &str = "FILL-IN:";

pub fn postal_address(address: &PostalAddressFields) -> Value {
    Node::typed("PostalAddress")
        .with("streetAddress", address.street_address.as_str())
        .with("addressLocality", address.city.as_str())
        .with("addressRegion", address.state.as_str())
        .with("postalCode", address.postal_code.as_str())
        .with("addressCountry", address.country.as_str())
        .into()
}

pub fn geo(latitude: Option<&str>, longitude: Option<&str>) -> Value {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) if !lat.trim().is_empty() && !lng.trim().is_empty() => json!({
            "@type": "GeoCoordinates",
            "latitude": lat,
            "longitude": lng,
        }),
        _ => Value::Null,
    }
}

/// `areaServed`: cities and postal codes when known, otherwise a named
/// area, otherwise the country.
pub fn area_served(area: &AreaServedFields, country: &str) -> Value {
    let cities: Vec<&str> = area
        .cities
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    if cities.is_empty() && area.postal_codes.is_empty() {
        if !area.name.trim().is_empty() {
            return json!({"@type": "AdministrativeArea", "name": area.name});
        }
        if !country.trim().is_empty() {
            return json!({"@type": "Country", "name": country});
        }
        return Value::Null;
    }

    let places: Vec<Value> = cities
        .iter()
        .map(|city| {
            json!({
                "@type": "City",
                "name": city,
                "url": [
                    format!("https://www.google.com/maps/place/{}/", city.replace(' ', "+")),
                    format!("https://en.wikipedia.org/wiki/{}", city.replace(' ', "_")),
                ],
            })
        })
        .collect();

    let mut node = Node::typed("AdministrativeArea");
    node.set("name", area.name.as_str());
    if !area.postal_codes.is_empty() {
        node.set(
            "geo",
            json!({"@type": "GeoShape", "postalCode": area.postal_codes}),
        );
    }
    node.set("containsPlace", places);
    node.into()
}

pub fn opening_hours(hours: &[OpeningHours]) -> Value {
    hours
        .iter()
        .filter(|h| !h.day.trim().is_empty())
        .map(|h| {
            json!({
                "@type": "OpeningHoursSpecification",
                "dayOfWeek": h.day,
                "opens": first_non_empty([h.opens.as_str()]).unwrap_or("09:00"),
                "closes": first_non_empty([h.closes.as_str()]).unwrap_or("17:00"),
            })
        })
        .collect::<Vec<_>>()
        .into()
}

pub fn image_object(url: Option<&str>) -> Value {
    match url {
        Some(u) if !u.trim().is_empty() => json!({
            "@type": "ImageObject",
            "contentUrl": u,
            "url": u,
        }),
        _ => Value::Null,
    }
}

/// Only emitted when there is a phone number or an email.
pub fn contact_point(telephone: Option<&str>, email: Option<&str>) -> Value {
    let mut node = Node::typed("ContactPoint");
    node.set("telephone", telephone);
    node.set("email", email);
    if !node.contains("telephone") && !node.contains("email") {
        return Value::Null;
    }
    node.set("contactType", "Customer Service");
    node.into()
}

/// `knowsAbout` topics as `Thing`s anchored on Wikidata.
pub fn knows_about(topics: &[Topic]) -> Value {
    topics
        .iter()
        .filter(|t| !t.name.trim().is_empty())
        .map(|t| {
            Value::from(
                Node::typed("Thing")
                    .with("name", t.name.as_str())
                    .with("@id", t.wikidata_id.as_str())
                    .with("sameAs", t.wikipedia_url.as_str()),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

pub fn mentions(items: &[Mention]) -> Value {
    items
        .iter()
        .filter(|m| !m.name.trim().is_empty())
        .map(|m| {
            let type_name = first_non_empty([m.type_name.as_str()]).unwrap_or("Thing");
            Value::from(
                Node::typed(type_name)
                    .with("name", m.name.as_str())
                    .with("@id", m.wikidata_id.as_str())
                    .with("sameAs", m.wikipedia_url.as_str()),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

/// Profile URLs minus blanks and unfilled placeholders.
pub fn same_as(urls: &[String]) -> Value {
    urls.iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && !u.starts_with(PLACEHOLDER_PREFIX))
        .map(Value::from)
        .collect::<Vec<_>>()
        .into()
}

/// Requires both a value and a count.
pub fn aggregate_rating(rating: Option<&RatingFields>) -> Value {
    match rating {
        Some(r) if !r.value.trim().is_empty() && !r.count.trim().is_empty() => json!({
            "@type": "AggregateRating",
            "ratingValue": r.value,
            "reviewCount": r.count,
            "bestRating": r.best.as_deref().unwrap_or("5"),
            "worstRating": r.worst.as_deref().unwrap_or("1"),
        }),
        _ => Value::Null,
    }
}

/// A `Service` offered by the organization, used inside offer catalogs.
pub fn offered_service(svc: &ServiceSummary, provider_id: &str, area: &Value) -> Value {
    Node::typed("Service")
        .with("name", svc.name.as_str())
        .with("url", svc.url.as_str())
        .with(
            "serviceType",
            first_non_empty([svc.service_type.as_str(), svc.name.as_str()]).unwrap_or_default(),
        )
        .with("audience", svc.audience.as_str())
        .with("provider", reference(provider_id))
        .with("brand", reference(provider_id))
        .with("areaServed", area.clone())
        .into()
}

/// `OfferCatalog` wrapping each named service in an `Offer`.
pub fn offer_catalog(name: &str, services: &[ServiceSummary], provider_id: &str, area: &Value) -> Value {
    let offers: Vec<Value> = services
        .iter()
        .filter(|s| !s.name.trim().is_empty())
        .map(|s| {
            json!({
                "@type": "Offer",
                "itemOffered": offered_service(s, provider_id, area),
            })
        })
        .collect();
    if offers.is_empty() {
        return Value::Null;
    }
    Node::typed("OfferCatalog")
        .with("name", name)
        .with("itemListElement", offers)
        .into()
}

/// Wrap each anchor text occurrence in a link.
///
/// `href` uses single quotes so the HTML survives being embedded in a JSON
/// string without extra escaping.
pub fn answer_text(text: &str, links: &[crate::fields::AnswerLink]) -> String {
    let mut out = text.to_string();
    for link in links {
        let anchor = link.anchor_text.trim();
        let url = link.url.trim();
        if anchor.is_empty() || url.is_empty() {
            continue;
        }
        out = out.replace(anchor, &format!("<a href='{url}'>{anchor}</a>"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::AnswerLink;

    #[test]
    fn empty_address_is_omitted() {
        assert_eq!(postal_address(&PostalAddressFields::default()), Value::Null);
    }

    #[test]
    fn area_falls_back_to_country() {
        let area = AreaServedFields::default();
        assert_eq!(
            area_served(&area, "US"),
            json!({"@type": "Country", "name": "US"})
        );
        assert_eq!(area_served(&area, ""), Value::Null);
    }

    #[test]
    fn area_with_cities_lists_places() {
        let area = AreaServedFields {
            cities: vec!["San Diego".to_string(), " ".to_string()],
            postal_codes: vec!["92101".to_string()],
            name: String::new(),
        };
        let value = area_served(&area, "US");
        assert_eq!(value["geo"]["postalCode"], json!(["92101"]));
        let places = value["containsPlace"].as_array().unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(
            places[0]["url"][0],
            json!("https://www.google.com/maps/place/San+Diego/")
        );
    }

    #[test]
    fn same_as_drops_placeholders() {
        let urls = vec![
            "https://www.linkedin.com/company/acme".to_string(),
            "FILL-IN:https://www.facebook.com/...".to_string(),
            "".to_string(),
        ];
        assert_eq!(same_as(&urls), json!(["https://www.linkedin.com/company/acme"]));
    }

    #[test]
    fn contact_point_needs_a_channel() {
        assert_eq!(contact_point(None, Some("")), Value::Null);
        assert_eq!(
            contact_point(Some("+1 555 0100"), None),
            json!({"@type": "ContactPoint", "contactType": "Customer Service", "telephone": "+1 555 0100"})
        );
    }

    #[test]
    fn answer_links_use_single_quotes() {
        let links = vec![AnswerLink {
            anchor_text: "drain cleaning".to_string(),
            url: "https://acme.com/drains".to_string(),
        }];
        assert_eq!(
            answer_text("We offer drain cleaning daily.", &links),
            "We offer <a href='https://acme.com/drains'>drain cleaning</a> daily."
        );
    }
}
