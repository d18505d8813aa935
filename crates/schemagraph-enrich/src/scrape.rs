//! Pre-fill from the business's current website.
//!
//! One page is fetched and read for what it already publishes: JSON-LD
//! business nodes first, then Open Graph and meta tags, a logo image,
//! `tel:`/`mailto:` links and an embedded Google Maps link. Everything found
//! lands in a [`BusinessFields`] that is merged with
//! [`apply_scraped`](crate::merge::apply_scraped), so the form always wins.

use crate::merge::apply_scraped;
use schemagraph_core::fields::{BusinessFields, OpeningHours, RatingFields};
use schemagraph_core::ids::normalize_url;
use schemagraph_core::GenerationRequest;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 12;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; schemagraph/0.3; +https://schema.org)";

/// Types whose JSON-LD nodes describe the business itself.
const BUSINESS_TYPES: [&str; 10] = [
    "LocalBusiness",
    "Organization",
    "Plumber",
    "HVACBusiness",
    "HomeAndConstructionBusiness",
    "LegalService",
    "MedicalBusiness",
    "Dentist",
    "AutoRepair",
    "GeneralContractor",
];

const WEEK: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("http status {0}")]
    Status(u16),
}

/// Fetch `url` and read the business facts it publishes.
pub async fn scrape_business_page(url: &str, timeout: Duration) -> Result<BusinessFields, ScrapeError> {
    let page_url = Url::parse(&normalize_url(url))?;
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ScrapeError::Network(e.to_string()))?;

    let response = client.get(page_url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Timeout
        } else {
            ScrapeError::Network(e.to_string())
        }
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status(status.as_u16()));
    }
    let html = response
        .text()
        .await
        .map_err(|e| ScrapeError::Network(e.to_string()))?;

    let found = extract_business(&html, &page_url);
    tracing::debug!(url = %page_url, name = %found.name, "scraped business page");
    Ok(found)
}

/// Scrape `url` into the request's empty business fields.
///
/// A failed fetch leaves the request unchanged with a warning.
pub async fn prefill_from_website(mut request: GenerationRequest, url: &str, timeout: Duration) -> GenerationRequest {
    match scrape_business_page(url, timeout).await {
        Ok(found) => apply_scraped(&mut request.business, &found),
        Err(err) => tracing::warn!(error = %err, url, "website scrape failed; request left unchanged"),
    }
    request
}

// ============================================================================
// Extraction
// ============================================================================

/// Read business facts from one HTML page. Relative links resolve against `page_url`.
pub fn extract_business(html: &str, page_url: &Url) -> BusinessFields {
    let doc = Html::parse_document(html);
    let mut found = BusinessFields::default();

    for script in select(&doc, r#"script[type="application/ld+json"]"#) {
        let text: String = script.text().collect();
        let Ok(raw) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        for node in json_ld_nodes(&raw) {
            if is_business(node) {
                merge_schema(&mut found, node);
            }
        }
    }

    let meta = meta_tags(&doc);
    fill_opt(&mut found.image_url, meta_value(&meta, "og:image"));
    fill_opt(&mut found.description, meta_value(&meta, "og:description"));
    fill_opt(&mut found.description, meta_value(&meta, "description"));
    fill(&mut found.name, meta_value(&meta, "og:site_name"));

    if found.logo_url.is_none() {
        found.logo_url = find_logo(&doc, page_url);
    }
    if found.telephone.is_none() {
        found.telephone = link_target(&doc, "tel:").map(|t| t.trim().to_string());
    }
    if found.email.is_none() {
        found.email = link_target(&doc, "mailto:")
            .and_then(|t| t.split('?').next())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }
    if found.has_map.is_none() {
        found.has_map = find_map(&doc);
    }
    found
}

fn select<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => doc.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Top-level nodes of a JSON-LD block: its `@graph`, the array, or the object itself.
fn json_ld_nodes(raw: &Value) -> Vec<&Value> {
    let nodes: Vec<&Value> = match raw {
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![raw],
        },
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    };
    nodes.into_iter().filter(|node| node.is_object()).collect()
}

fn is_business(node: &Value) -> bool {
    let types: Vec<&str> = match &node["@type"] {
        Value::String(t) => vec![t.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    types
        .iter()
        .any(|t| BUSINESS_TYPES.contains(t) || t.contains("LocalBusiness"))
}

/// String or number content as text.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// An image given as a URL, an `ImageObject`, or a list of either.
fn image_url(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(image_url).unwrap_or_default(),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("contentUrl"))
            .map(text)
            .unwrap_or_default(),
        other => text(other),
    }
}

fn fill(slot: &mut String, value: &str) {
    if slot.trim().is_empty() && !value.trim().is_empty() {
        *slot = value.trim().to_string();
    }
}

fn fill_opt(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.trim().is_empty() {
        *slot = Some(value.trim().to_string());
    }
}

fn merge_schema(found: &mut BusinessFields, node: &Value) {
    fill(&mut found.name, &text(&node["name"]));
    fill_opt(&mut found.description, &text(&node["description"]));
    fill_opt(&mut found.telephone, &text(&node["telephone"]));
    fill_opt(&mut found.email, &text(&node["email"]));
    fill_opt(&mut found.price_range, &text(&node["priceRange"]));
    fill_opt(&mut found.has_map, &text(&node["hasMap"]));
    fill_opt(&mut found.logo_url, &image_url(&node["logo"]));
    fill_opt(&mut found.image_url, &image_url(&node["image"]));

    let address = &node["address"];
    fill(&mut found.address.street_address, &text(&address["streetAddress"]));
    fill(&mut found.address.city, &text(&address["addressLocality"]));
    fill(&mut found.address.state, &text(&address["addressRegion"]));
    fill(&mut found.address.postal_code, &text(&address["postalCode"]));
    fill(&mut found.address.country, &text(&address["addressCountry"]));

    if found.opening_hours.is_empty() {
        found.opening_hours = opening_hours(&node["openingHoursSpecification"]);
    }

    fill_opt(&mut found.latitude, &text(&node["geo"]["latitude"]));
    fill_opt(&mut found.longitude, &text(&node["geo"]["longitude"]));

    let rating = &node["aggregateRating"];
    let (value, count) = (text(&rating["ratingValue"]), text(&rating["reviewCount"]));
    if found.aggregate_rating.is_none() && !value.is_empty() && !count.is_empty() {
        found.aggregate_rating = Some(RatingFields {
            value,
            count,
            ..RatingFields::default()
        });
    }

    if found.same_as.is_empty() {
        found.same_as = match &node["sameAs"] {
            Value::Array(items) => items.iter().map(text).filter(|u| !u.is_empty()).collect(),
            other => Some(text(other)).filter(|u| !u.is_empty()).into_iter().collect(),
        };
    }
}

/// `openingHoursSpecification` entries, one per named day.
fn opening_hours(spec: &Value) -> Vec<OpeningHours> {
    let entries: Vec<&Value> = match spec {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![spec],
        _ => Vec::new(),
    };

    let mut hours = Vec::new();
    for entry in entries {
        let (opens, closes) = (text(&entry["opens"]), text(&entry["closes"]));
        if opens.is_empty() || closes.is_empty() {
            continue;
        }
        let days: Vec<String> = match &entry["dayOfWeek"] {
            Value::Array(items) => items.iter().map(text).collect(),
            other => vec![text(other)],
        };
        for day in days {
            let day = day
                .trim_start_matches("https://schema.org/")
                .trim_start_matches("http://schema.org/");
            if WEEK.contains(&day) {
                hours.push(OpeningHours {
                    day: day.to_string(),
                    opens: opens.clone(),
                    closes: closes.clone(),
                });
            }
        }
    }
    hours
}

/// `<meta property=…>` and `<meta name=…>` contents by key.
fn meta_tags(doc: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for meta in select(doc, "meta[content]") {
        let element = meta.value();
        let Some(key) = element.attr("property").or_else(|| element.attr("name")) else {
            continue;
        };
        let content = element.attr("content").unwrap_or_default();
        tags.entry(key.trim().to_ascii_lowercase())
            .or_insert_with(|| content.trim().to_string());
    }
    tags
}

fn meta_value<'a>(meta: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    meta.get(key).map(String::as_str).unwrap_or_default()
}

/// The first `<img>` that looks like a logo, else the first image in a header or nav.
fn find_logo(doc: &Html, page_url: &Url) -> Option<String> {
    let mentions_logo = |value: Option<&str>| value.is_some_and(|v| v.to_ascii_lowercase().contains("logo"));
    let images = select(doc, "img[src]");

    let logo = ["class", "id", "alt"].into_iter().find_map(|attr| {
        images
            .iter()
            .find(|img| mentions_logo(img.value().attr(attr)))
    });
    let img = match logo {
        Some(img) => *img,
        None => *select(doc, "header img[src], nav img[src]").first()?,
    };

    let src = img.value().attr("src")?.trim();
    page_url.join(src).ok().map(|url| url.to_string())
}

/// Target of the first `<a href="scheme…">`, scheme matched case-insensitively.
fn link_target<'a>(doc: &'a Html, scheme: &str) -> Option<&'a str> {
    select(doc, "a[href]").into_iter().find_map(|a| {
        let href = a.value().attr("href")?.trim();
        let head = href.get(..scheme.len())?;
        head.eq_ignore_ascii_case(scheme).then(|| &href[scheme.len()..])
    })
}

fn find_map(doc: &Html) -> Option<String> {
    let is_map = |url: &str| url.to_ascii_lowercase().contains("google.com/maps");
    let link = select(doc, "a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .find(|href| is_map(*href));
    let frame = || {
        select(doc, "iframe[src]")
            .into_iter()
            .filter_map(|f| f.value().attr("src"))
            .find(|src| is_map(*src))
    };
    link.or_else(frame).map(|url| url.trim().to_string())
}
