//! Product with Merchant Center style offer details.

use super::common::aggregate_rating;
use super::{Entity, Site};
use crate::fields::{ProductFields, ReturnPolicyFields, ReviewFields, ShippingFields};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::{first_non_empty, one_or_many, Node};
use serde_json::{json, Value};

const DEFAULT_CURRENCY: &str = "USD";

pub fn product(fields: &ProductFields, url: &str, site: &Site, ids: &IdentifierRegistry) -> Entity {
    let url = normalize_url(url);
    let org_id = site.id(ids, &Role::Organization);

    let images: Vec<Value> = fields
        .images
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(Value::from)
        .collect();

    let mut node = Node::entity("Product", ids.identifier_for(&Role::Product, &url));
    node.set("name", fields.name.as_str());
    node.set("url", url.as_str());
    node.set("image", one_or_many(images));
    node.set("description", fields.description.as_deref());
    node.set(
        "disambiguatingDescription",
        fields.disambiguating_description.as_deref(),
    );
    node.set("sku", fields.sku.as_deref());
    node.set("mpn", fields.mpn.as_deref());
    node.set("gtin", fields.gtin.as_deref());
    node.set("gtin13", fields.gtin13.as_deref());
    node.set("color", fields.color.as_deref());
    node.set("material", fields.material.as_deref());
    node.set("pattern", fields.pattern.as_deref());
    node.set("category", fields.category.as_deref());
    node.set("slogan", fields.slogan.as_deref());
    node.set("isRelatedTo", fields.is_related_to.clone());
    node.set("brand", reference(&org_id));
    node.set("manufacturer", reference(&org_id));
    node.set("offers", offer(fields, &url, &org_id));
    node.set(
        "aggregateRating",
        aggregate_rating(fields.aggregate_rating.as_ref()),
    );
    node.set(
        "review",
        fields.reviews.iter().filter_map(review).collect::<Vec<_>>(),
    );

    Entity::new(Role::Product, node.into_value())
}

/// Always emitted so a missing price surfaces as `offers.price` rather than
/// as a missing `offers`.
fn offer(fields: &ProductFields, url: &str, seller_id: &str) -> Value {
    let currency = first_non_empty([fields.currency.as_str()]).unwrap_or(DEFAULT_CURRENCY);

    let mut node = Node::typed("Offer");
    node.set("url", url);
    node.set("priceCurrency", currency);
    node.set("price", fields.price.as_str());
    node.set("priceValidUntil", fields.price_valid_until.as_deref());
    node.set("itemCondition", "https://schema.org/NewCondition");
    node.set("availability", fields.availability.iri());
    node.set("seller", reference(seller_id));
    if let Some(shipping) = &fields.shipping {
        node.set("shippingDetails", shipping_details(shipping, currency));
    }
    if let Some(policy) = &fields.return_policy {
        node.set("hasMerchantReturnPolicy", return_policy(policy));
    }
    node.into()
}

fn shipping_details(shipping: &ShippingFields, currency: &str) -> Value {
    json!({
        "@type": "OfferShippingDetails",
        "shippingRate": {
            "@type": "MonetaryAmount",
            "value": first_non_empty([shipping.rate.as_str()]).unwrap_or("0"),
            "currency": currency,
        },
        "shippingDestination": {
            "@type": "DefinedRegion",
            "addressCountry": shipping.country,
        },
        "deliveryTime": {
            "@type": "ShippingDeliveryTime",
            "handlingTime": {
                "@type": "QuantitativeValue",
                "minValue": shipping.handling_days.0,
                "maxValue": shipping.handling_days.1,
                "unitCode": "DAY",
            },
            "transitTime": {
                "@type": "QuantitativeValue",
                "minValue": shipping.transit_days.0,
                "maxValue": shipping.transit_days.1,
                "unitCode": "DAY",
            },
        },
    })
}

fn return_policy(policy: &ReturnPolicyFields) -> Value {
    json!({
        "@type": "MerchantReturnPolicy",
        "applicableCountry": policy.country,
        "returnPolicyCategory": "https://schema.org/MerchantReturnFiniteReturnWindow",
        "merchantReturnDays": policy.days,
        "returnMethod": format!("https://schema.org/{}", policy.method.trim()),
        "returnFees": format!("https://schema.org/{}", policy.fees.trim()),
    })
}

/// Reviews need an author and a body.
fn review(r: &ReviewFields) -> Option<Value> {
    if r.author.trim().is_empty() || r.body.trim().is_empty() {
        return None;
    }
    Node::typed("Review")
        .with("author", json!({"@type": "Person", "name": r.author}))
        .with("datePublished", r.date.as_deref())
        .with("name", r.title.as_deref())
        .with("reviewBody", r.body.as_str())
        .with(
            "reviewRating",
            json!({
                "@type": "Rating",
                "ratingValue": r.rating.as_deref().unwrap_or("5"),
                "bestRating": "5",
                "worstRating": "1",
            }),
        )
        .into_option()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::BusinessFields;

    fn site() -> Site {
        Site::from_business(&BusinessFields::new("Acme", "acme.com"))
    }

    #[test]
    fn offer_defaults_currency_and_availability() {
        let fields = ProductFields {
            name: "Widget".to_string(),
            price: "19.99".to_string(),
            ..ProductFields::default()
        };
        let p = product(&fields, "https://acme.com/widget", &site(), &IdentifierRegistry::new());
        assert_eq!(p.id, "https://acme.com/widget#product");
        assert_eq!(p.node["offers"]["priceCurrency"], json!("USD"));
        assert_eq!(p.node["offers"]["availability"], json!("https://schema.org/InStock"));
        assert_eq!(p.node["offers"]["seller"], json!({"@id": "https://acme.com#organization"}));
    }

    #[test]
    fn single_image_stays_scalar() {
        let fields = ProductFields {
            images: vec!["https://acme.com/w.png".to_string()],
            ..ProductFields::default()
        };
        let p = product(&fields, "acme.com/w", &site(), &IdentifierRegistry::new());
        assert_eq!(p.node["image"], json!("https://acme.com/w.png"));
        assert!(p.node["offers"].get("price").is_none());
    }

    #[test]
    fn anonymous_reviews_are_dropped() {
        let fields = ProductFields {
            reviews: vec![
                ReviewFields {
                    author: "Sam".to_string(),
                    body: "Great".to_string(),
                    ..ReviewFields::default()
                },
                ReviewFields {
                    body: "No author".to_string(),
                    ..ReviewFields::default()
                },
            ],
            ..ProductFields::default()
        };
        let p = product(&fields, "acme.com/w", &site(), &IdentifierRegistry::new());
        assert_eq!(p.node["review"].as_array().unwrap().len(), 1);
        assert_eq!(p.node["review"][0]["reviewRating"]["ratingValue"], json!("5"));
    }
}
