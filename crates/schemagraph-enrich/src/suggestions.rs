//! Typed model output and the lenient parsing that gets it there.
//!
//! Models are told to answer with bare JSON but often wrap it in a markdown
//! fence, send `null` for unknown values or quote numbers inconsistently.
//! Everything here tolerates that; anything worse is a parse error.

use crate::llm::EnrichError;
use schemagraph_core::fields::{OpeningHours, ServiceSummary, Topic};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Remove a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return "",
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output into `T` after stripping code fences.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, EnrichError> {
    Ok(serde_json::from_str(strip_code_fences(raw))?)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `"4.8"`, `4.8`, `120` or `null`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

// ============================================================================
// Business suggestions
// ============================================================================

/// Suggested defaults for a business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestions {
    #[serde(deserialize_with = "null_as_default")]
    pub schema_subtype: String,
    #[serde(deserialize_with = "null_as_default")]
    pub wikidata_business_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub wikipedia_business_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disambiguating_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub knows_about: Vec<Topic>,
    #[serde(deserialize_with = "null_as_default")]
    pub additional_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub slogan: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suggested_same_as: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub area_served_suggestion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_range: String,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// Fact sheet
// ============================================================================

/// Facts extracted from a free-text fact sheet. Absent facts stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactSheet {
    #[serde(deserialize_with = "null_as_default")]
    pub business_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub founder_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub telephone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disambiguating_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slogan: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "string_or_number")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "string_or_number")]
    pub founding_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub founding_location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_range: String,
    #[serde(deserialize_with = "null_as_default")]
    pub has_map: String,
    #[serde(deserialize_with = "string_or_number")]
    pub aggregate_rating_value: String,
    #[serde(deserialize_with = "string_or_number")]
    pub aggregate_rating_count: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_accepted: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub area_served_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opening_hours: Vec<OpeningHours>,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<ServiceSummary>,
    pub has_24_7: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub credentials_notes: String,
}

impl FactSheet {
    /// Number of facts the sheet actually supplied.
    pub fn filled_fields(&self) -> usize {
        let scalars = [
            &self.business_name,
            &self.legal_name,
            &self.founder_name,
            &self.job_title,
            &self.telephone,
            &self.email,
            &self.website_url,
            &self.description,
            &self.disambiguating_description,
            &self.slogan,
            &self.street_address,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
            &self.founding_date,
            &self.founding_location,
            &self.price_range,
            &self.has_map,
            &self.aggregate_rating_value,
            &self.aggregate_rating_count,
            &self.payment_accepted,
            &self.area_served_name,
            &self.credentials_notes,
        ];
        scalars.iter().filter(|s| !s.trim().is_empty()).count()
            + [self.cities.is_empty(), self.opening_hours.is_empty(), self.services.is_empty()]
                .iter()
                .filter(|empty| !**empty)
                .count()
            + usize::from(self.has_24_7 == Some(true))
    }
}
