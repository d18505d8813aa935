//! SaaS: WebApplication and the pricing page's AggregateOffer.

use super::{Entity, Site};
use crate::fields::{BusinessFields, PricingTier, SaasFields};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::{first_non_empty, Node};
use serde_json::{json, Value};

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_BILLING_PERIOD: &str = "MON";

/// URL of the application itself; the site root when not given.
pub fn app_url(fields: &SaasFields, site: &Site) -> String {
    let url = normalize_url(&fields.app_url);
    if url.is_empty() {
        site.base_url.clone()
    } else {
        url
    }
}

fn app_name<'a>(fields: &'a SaasFields, business: &'a BusinessFields) -> &'a str {
    first_non_empty([fields.app_name.as_str(), business.name.as_str()]).unwrap_or_default()
}

fn currency(fields: &SaasFields) -> &str {
    first_non_empty([fields.currency.as_deref().unwrap_or_default()]).unwrap_or(DEFAULT_CURRENCY)
}

pub fn web_application(
    fields: &SaasFields,
    business: &BusinessFields,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let url = app_url(fields, site);
    let mut node = Node::entity("WebApplication", ids.identifier_for(&Role::WebApplication, &url));
    node.set("name", app_name(fields, business));
    node.set_first(
        "description",
        [
            fields.app_description.as_deref().unwrap_or_default(),
            business.description.as_deref().unwrap_or_default(),
        ],
    );
    node.set("url", url.as_str());
    node.set("sameAs", fields.marketing_url.as_deref().map(normalize_url));
    node.set_first(
        "browserRequirements",
        [
            fields.browser_requirements.as_deref().unwrap_or_default(),
            "Requires JavaScript. Requires HTML5.",
        ],
    );
    node.set_first(
        "applicationCategory",
        [
            fields.app_category.as_deref().unwrap_or_default(),
            "BusinessApplication",
        ],
    );
    node.set("applicationSuite", fields.app_suite.as_deref());
    node.set_first(
        "operatingSystem",
        [
            fields.operating_system.as_deref().unwrap_or_default(),
            "Web Browser",
        ],
    );
    node.set("permissions", fields.permissions.as_deref());
    node.set("releaseNotes", fields.release_notes_url.as_deref());
    node.set("provider", reference(&site.id(ids, &Role::Organization)));
    node.set("offers", app_offers(fields, &site.base_url));

    Entity::new(Role::WebApplication, node.into_value())
}

/// One tier → `Offer`; several → `AggregateOffer`; none → the flat price.
fn app_offers(fields: &SaasFields, base_url: &str) -> Value {
    let currency = currency(fields);
    match fields.pricing_tiers.as_slice() {
        [] => match fields.price.as_deref() {
            Some(price) if !price.trim().is_empty() => json!({
                "@type": "Offer",
                "price": price,
                "priceCurrency": currency,
            }),
            _ => Value::Null,
        },
        [tier] => Node::typed("Offer")
            .with("name", tier.name.as_str())
            .with("price", tier.price.as_str())
            .with("priceCurrency", currency)
            .with("url", tier_url(tier, base_url))
            .into(),
        tiers => {
            let (low, high) = price_bounds(tiers);
            let offers: Vec<Value> = tiers
                .iter()
                .filter(|t| !t.name.trim().is_empty())
                .map(|t| {
                    Node::typed("Offer")
                        .with("name", t.name.as_str())
                        .with("url", tier_url(t, base_url))
                        .with("price", t.price.as_str())
                        .with("priceCurrency", currency)
                        .with("priceSpecification", unit_price(t, currency))
                        .into()
                })
                .collect();
            Node::typed("AggregateOffer")
                .with("lowPrice", low)
                .with("highPrice", high)
                .with("priceCurrency", currency)
                .with("offerCount", tiers.len())
                .with("offers", offers)
                .into()
        }
    }
}

/// The pricing page's offer summary, identified as `<pricing-url>#aggregateoffer`.
pub fn pricing_offer(
    fields: &SaasFields,
    page_url: &str,
    business: &BusinessFields,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let page_url = normalize_url(page_url);
    let currency = currency(fields);
    let app_id = ids.identifier_for(&Role::WebApplication, &app_url(fields, site));
    let (low, high) = price_bounds(&fields.pricing_tiers);

    let offers: Vec<Value> = fields
        .pricing_tiers
        .iter()
        .filter(|t| !t.name.trim().is_empty() && !t.price.trim().is_empty())
        .map(|t| {
            Node::typed("Offer")
                .with("name", t.name.as_str())
                .with("url", tier_url(t, &page_url))
                .with("description", t.description.as_deref())
                .with("priceSpecification", unit_price(t, currency))
                .into()
        })
        .collect();

    let app = Node::entity("WebApplication", app_id)
        .with("name", app_name(fields, business))
        .with(
            "applicationCategory",
            first_non_empty([fields.app_category.as_deref().unwrap_or_default(), "SaaS"]).unwrap_or_default(),
        )
        .with("provider", reference(&site.id(ids, &Role::Organization)));

    let node = Node::entity(
        "AggregateOffer",
        ids.identifier_for(&Role::AggregateOffer, &page_url),
    )
    .with("url", page_url.as_str())
    .with("lowPrice", low)
    .with("highPrice", high)
    .with("priceCurrency", currency)
    .with("offerCount", fields.pricing_tiers.len())
    .with("offers", offers)
    .with("itemOffered", app);

    Entity::new(Role::AggregateOffer, node.into_value())
}

fn tier_url(tier: &PricingTier, fallback: &str) -> String {
    match tier.url.as_deref().map(normalize_url) {
        Some(url) if !url.is_empty() => url,
        _ => fallback.to_string(),
    }
}

fn unit_price(tier: &PricingTier, currency: &str) -> Value {
    let period = first_non_empty([tier.billing_period.as_deref().unwrap_or_default()])
        .unwrap_or(DEFAULT_BILLING_PERIOD);
    Node::typed("UnitPriceSpecification")
        .with("price", tier.price.as_str())
        .with("priceCurrency", currency)
        .with("name", tier.name.as_str())
        .with(
            "referenceQuantity",
            json!({"@type": "QuantitativeValue", "value": "1", "unitCode": period}),
        )
        .into()
}

/// Cheapest and dearest tier prices as written; unparseable prices are skipped.
fn price_bounds(tiers: &[PricingTier]) -> (Option<String>, Option<String>) {
    let mut priced: Vec<(f64, &str)> = tiers
        .iter()
        .filter_map(|t| {
            let raw = t.price.trim();
            raw.parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .map(|p| (p, raw))
        })
        .collect();
    priced.sort_by(|a, b| a.0.total_cmp(&b.0));
    (
        priced.first().map(|(_, raw)| raw.to_string()),
        priced.last().map(|(_, raw)| raw.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, price: &str) -> PricingTier {
        PricingTier {
            name: name.to_string(),
            price: price.to_string(),
            ..PricingTier::default()
        }
    }

    #[test]
    fn bounds_ignore_unparseable_prices() {
        let tiers = vec![tier("Pro", "49"), tier("Free", "0"), tier("Enterprise", "Contact us")];
        assert_eq!(price_bounds(&tiers), (Some("0".to_string()), Some("49".to_string())));
        assert_eq!(price_bounds(&[]), (None, None));
    }

    #[test]
    fn several_tiers_make_an_aggregate_offer() {
        let business = BusinessFields::new("Acme", "acme.com");
        let site = Site::from_business(&business);
        let fields = SaasFields {
            app_url: "app.acme.com".to_string(),
            pricing_tiers: vec![tier("Starter", "9"), tier("Team", "29.50")],
            ..SaasFields::default()
        };
        let app = web_application(&fields, &business, &site, &IdentifierRegistry::new());
        assert_eq!(app.id, "https://app.acme.com#webapp");
        assert_eq!(app.node["name"], json!("Acme"));
        assert_eq!(app.node["offers"]["@type"], json!("AggregateOffer"));
        assert_eq!(app.node["offers"]["lowPrice"], json!("9"));
        assert_eq!(app.node["offers"]["highPrice"], json!("29.50"));
        assert_eq!(
            app.node["offers"]["offers"][1]["priceSpecification"]["referenceQuantity"]["unitCode"],
            json!("MON")
        );
    }

    #[test]
    fn pricing_offer_names_the_application() {
        let business = BusinessFields::new("Acme", "acme.com");
        let site = Site::from_business(&business);
        let fields = SaasFields {
            app_name: "Acme Cloud".to_string(),
            pricing_tiers: vec![tier("Starter", "9")],
            ..SaasFields::default()
        };
        let offer = pricing_offer(&fields, "https://acme.com/pricing", &business, &site, &IdentifierRegistry::new());
        assert_eq!(offer.id, "https://acme.com/pricing#aggregateoffer");
        assert_eq!(offer.node["itemOffered"]["@id"], json!("https://acme.com#webapp"));
        assert_eq!(offer.node["offerCount"], json!(1));
    }
}
