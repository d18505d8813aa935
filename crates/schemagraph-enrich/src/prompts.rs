//! Prompt templates for the three enrichment calls.
//!
//! Each template asks for bare JSON in a fixed shape; the shapes mirror the
//! structs in [`crate::suggestions`].

use crate::llm::CompletionRequest;

// ============================================================================
// Sampling settings
// ============================================================================

const SUGGESTION_TEMPERATURE: f32 = 0.2;
const SUGGESTION_MAX_TOKENS: u32 = 2000;

const FACT_SHEET_TEMPERATURE: f32 = 0.1;
const FACT_SHEET_MAX_TOKENS: u32 = 3000;

const TOPIC_TEMPERATURE: f32 = 0.1;
const TOPIC_MAX_TOKENS: u32 = 1000;

// ============================================================================
// Business suggestions
// ============================================================================

const SUGGESTION_TEMPLATE: &str = r#"You help build schema.org structured data for business websites.
Suggest enrichment values for the business below.

Business name: {business_name}
Website: {website_url}
Business type: {business_type}

Answer with JSON only, no prose and no markdown, shaped exactly like this:
{
  "schema_subtype": "most specific schema.org type, e.g. Plumber, Dentist, LegalService; Organization for software or retail",
  "wikidata_business_id": "Wikidata URL for the business category, or an empty string",
  "wikipedia_business_url": "Wikipedia URL for the business category, or an empty string",
  "description": "two or three factual sentences in the third person",
  "disambiguating_description": "three to five sentences that set this business apart from similar ones",
  "knows_about": [
    {"name": "topic", "wikidata_id": "https://www.wikidata.org/wiki/Q...", "wikipedia_url": "https://en.wikipedia.org/wiki/..."}
  ],
  "additional_types": ["Wikipedia or Wikidata URL describing the category"],
  "slogan": "short factual tagline",
  "suggested_same_as": ["profile URL"],
  "area_served_suggestion": "city, region or country served",
  "price_range": "$, $$, $$$ or $$$$"
}

List five to eight knows_about topics central to the business, each with real Wikidata and Wikipedia URLs.
List two to four additional_types.
suggested_same_as entries are patterns for the user to complete; prefix each with "FILL-IN:".
"#;

/// Suggestion request for a business. `business_type` is free text such as
/// "local business" or "SaaS".
pub fn suggestion_request(business_name: &str, website_url: &str, business_type: &str) -> CompletionRequest {
    let prompt = SUGGESTION_TEMPLATE
        .replace("{business_name}", business_name)
        .replace("{website_url}", website_url)
        .replace("{business_type}", business_type);
    CompletionRequest::user(prompt)
        .with_temperature(SUGGESTION_TEMPERATURE)
        .with_max_tokens(SUGGESTION_MAX_TOKENS)
}

// ============================================================================
// Fact sheet extraction
// ============================================================================

const FACT_SHEET_TEMPLATE: &str = r#"Extract structured business data from the fact sheet below.
A fact sheet is a document of verified facts about one business.

Fact sheet:
---
{fact_sheet}
---

Answer with JSON only, no prose and no markdown. Leave out any field the document does not state.
{
  "business_name": "",
  "legal_name": "",
  "founder_name": "",
  "job_title": "the founder's job title",
  "telephone": "",
  "email": "",
  "website_url": "",
  "description": "two or three sentences based on the facts",
  "disambiguating_description": "",
  "slogan": "",
  "street_address": "",
  "city": "",
  "state": "",
  "postal_code": "",
  "country": "",
  "founding_date": "",
  "founding_location": "",
  "price_range": "$, $$, $$$ or $$$$",
  "has_map": "map URL",
  "aggregate_rating_value": "e.g. 4.8",
  "aggregate_rating_count": "number of reviews",
  "payment_accepted": "",
  "cities": ["city served"],
  "area_served_name": "",
  "opening_hours": [{"day": "Monday", "opens": "09:00", "closes": "17:00"}],
  "services": [{"name": "", "url": "", "service_type": "", "audience": ""}],
  "has_24_7": false,
  "credentials_notes": "licences, certifications, insurance"
}

Only extract what the document states explicitly. If it says the business is open 24/7, set has_24_7 to true.
"#;

pub fn fact_sheet_request(fact_sheet: &str) -> CompletionRequest {
    CompletionRequest::user(FACT_SHEET_TEMPLATE.replace("{fact_sheet}", fact_sheet))
        .with_temperature(FACT_SHEET_TEMPERATURE)
        .with_max_tokens(FACT_SHEET_MAX_TOKENS)
}

// ============================================================================
// Topic links
// ============================================================================

const TOPIC_TEMPLATE: &str = r#"Find the Wikidata entity and Wikipedia article for each topic.

Topics: {topics}
Context: {business_name} ({business_type})

Answer with a JSON array only, no prose and no markdown:
[
  {"name": "topic exactly as given", "wikidata_id": "https://www.wikidata.org/wiki/Q...", "wikipedia_url": "https://en.wikipedia.org/wiki/..."}
]

Skip any topic whose Wikidata entity you are not sure of.
"#;

pub fn topic_request(topics: &[String], business_name: &str, business_type: &str) -> CompletionRequest {
    let prompt = TOPIC_TEMPLATE
        .replace("{topics}", &topics.join(", "))
        .replace("{business_name}", business_name)
        .replace("{business_type}", business_type);
    CompletionRequest::user(prompt)
        .with_temperature(TOPIC_TEMPERATURE)
        .with_max_tokens(TOPIC_MAX_TOKENS)
}
