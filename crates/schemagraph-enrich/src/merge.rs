//! Merging model output into a request.
//!
//! Only empty values are filled. A value the user supplied, placeholder or
//! not, is never replaced.

use crate::suggestions::{FactSheet, Suggestions};
use schemagraph_core::fields::{BusinessFields, OpeningHours, PersonFields, RatingFields, ServiceSummary, Topic};
use schemagraph_core::GenerationRequest;

const WEEK: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn fill(slot: &mut String, value: &str) {
    if is_blank(slot) && !is_blank(value) {
        *slot = value.trim().to_string();
    }
}

fn fill_opt(slot: &mut Option<String>, value: &str) {
    if slot.as_deref().map_or(true, is_blank) && !is_blank(value) {
        *slot = Some(value.trim().to_string());
    }
}

fn fill_list<T: Clone>(slot: &mut Vec<T>, values: &[T]) {
    if slot.is_empty() {
        *slot = values.to_vec();
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Suggestions
// ============================================================================

/// Use suggestions as defaults for the business.
pub fn apply_suggestions(business: &mut BusinessFields, suggestions: &Suggestions) {
    fill_opt(&mut business.schema_subtype, &suggestions.schema_subtype);
    fill_opt(&mut business.description, &suggestions.description);
    fill_opt(&mut business.disambiguating_description, &suggestions.disambiguating_description);
    fill_opt(&mut business.slogan, &suggestions.slogan);
    fill_opt(&mut business.price_range, &suggestions.price_range);
    fill(&mut business.area_served.name, &suggestions.area_served_suggestion);

    let topics: Vec<Topic> = suggestions
        .knows_about
        .iter()
        .filter(|t| !is_blank(&t.name))
        .cloned()
        .collect();
    fill_list(&mut business.knows_about, &topics);

    let mut additional_types = non_blank(&suggestions.additional_types);
    for category in [&suggestions.wikipedia_business_url, &suggestions.wikidata_business_id] {
        let category = category.trim();
        if !category.is_empty() && !additional_types.iter().any(|t| t == category) {
            additional_types.push(category.to_string());
        }
    }
    fill_list(&mut business.additional_types, &additional_types);

    // Placeholders are kept; the builders drop them on output.
    fill_list(&mut business.same_as, &non_blank(&suggestions.suggested_same_as));
}

/// Attach Wikidata/Wikipedia links to topics that lack them, and add
/// suggested topics the business doesn't list yet.
pub fn apply_topics(business: &mut BusinessFields, topics: &[Topic]) {
    for suggested in topics.iter().filter(|t| !is_blank(&t.name)) {
        let existing = business
            .knows_about
            .iter_mut()
            .find(|t| t.name.trim().eq_ignore_ascii_case(suggested.name.trim()));
        match existing {
            Some(topic) => {
                fill(&mut topic.wikidata_id, &suggested.wikidata_id);
                fill(&mut topic.wikipedia_url, &suggested.wikipedia_url);
            }
            None => business.knows_about.push(suggested.clone()),
        }
    }
}

// ============================================================================
// Fact sheet
// ============================================================================

/// Pre-fill a request from an extracted fact sheet.
pub fn apply_fact_sheet(request: &mut GenerationRequest, sheet: &FactSheet) {
    let business = &mut request.business;

    fill(&mut business.name, &sheet.business_name);
    fill(&mut business.website_url, &sheet.website_url);
    fill_opt(&mut business.legal_name, &sheet.legal_name);
    fill_opt(&mut business.founder_name, &sheet.founder_name);
    fill_opt(&mut business.telephone, &sheet.telephone);
    fill_opt(&mut business.email, &sheet.email);
    fill_opt(&mut business.description, &sheet.description);
    fill_opt(&mut business.disambiguating_description, &sheet.disambiguating_description);
    fill_opt(&mut business.slogan, &sheet.slogan);
    fill_opt(&mut business.founding_date, &sheet.founding_date);
    fill_opt(&mut business.founding_location, &sheet.founding_location);
    fill_opt(&mut business.price_range, &sheet.price_range);
    fill_opt(&mut business.has_map, &sheet.has_map);
    fill_opt(&mut business.payment_accepted, &sheet.payment_accepted);

    fill(&mut business.address.street_address, &sheet.street_address);
    fill(&mut business.address.city, &sheet.city);
    fill(&mut business.address.state, &sheet.state);
    fill(&mut business.address.postal_code, &sheet.postal_code);
    fill(&mut business.address.country, &sheet.country);

    fill_list(&mut business.area_served.cities, &non_blank(&sheet.cities));
    fill(&mut business.area_served.name, &sheet.area_served_name);

    fill_list(&mut business.opening_hours, &fact_sheet_hours(sheet));
    fill_list(&mut business.services, &fact_sheet_services(sheet));

    if business.aggregate_rating.is_none()
        && !is_blank(&sheet.aggregate_rating_value)
        && !is_blank(&sheet.aggregate_rating_count)
    {
        business.aggregate_rating = Some(RatingFields {
            value: sheet.aggregate_rating_value.trim().to_string(),
            count: sheet.aggregate_rating_count.trim().to_string(),
            ..RatingFields::default()
        });
    }

    apply_person_facts(request, sheet);
}

/// A 24/7 business is open every day, all day; otherwise take the listed days.
fn fact_sheet_hours(sheet: &FactSheet) -> Vec<OpeningHours> {
    if sheet.has_24_7 == Some(true) {
        return WEEK
            .iter()
            .map(|day| OpeningHours {
                day: day.to_string(),
                opens: "00:00".to_string(),
                closes: "23:59".to_string(),
            })
            .collect();
    }
    sheet
        .opening_hours
        .iter()
        .filter(|h| !is_blank(&h.day))
        .cloned()
        .collect()
}

fn fact_sheet_services(sheet: &FactSheet) -> Vec<ServiceSummary> {
    sheet
        .services
        .iter()
        .filter(|s| !is_blank(&s.name))
        .map(|s| {
            let mut service = s.clone();
            fill(&mut service.service_type, &s.name);
            service
        })
        .collect()
}

/// Founder facts go to the person; a person is created only when the sheet
/// names one and says something about them.
fn apply_person_facts(request: &mut GenerationRequest, sheet: &FactSheet) {
    let has_person_facts = !is_blank(&sheet.job_title) || !is_blank(&sheet.credentials_notes);
    if request.person.is_none() {
        if is_blank(&sheet.founder_name) || !has_person_facts {
            return;
        }
        request.person = Some(PersonFields::default());
    }

    let founder = request.business.founder_name.clone().unwrap_or_default();
    if let Some(person) = request.person.as_mut() {
        fill(&mut person.name, &founder);
        fill_opt(&mut person.job_title, &sheet.job_title);
        if person.credentials.is_empty() && !is_blank(&sheet.credentials_notes) {
            person.credentials = vec![sheet.credentials_notes.trim().to_string()];
        }
    }
}

// ============================================================================
// Website scrape
// ============================================================================

/// Pre-fill the business from what its current website already publishes.
pub fn apply_scraped(business: &mut BusinessFields, found: &BusinessFields) {
    fill(&mut business.name, &found.name);
    let scraped_text = [
        (&mut business.description, &found.description),
        (&mut business.telephone, &found.telephone),
        (&mut business.email, &found.email),
        (&mut business.price_range, &found.price_range),
        (&mut business.has_map, &found.has_map),
        (&mut business.logo_url, &found.logo_url),
        (&mut business.image_url, &found.image_url),
        (&mut business.latitude, &found.latitude),
        (&mut business.longitude, &found.longitude),
    ];
    for (slot, value) in scraped_text {
        fill_opt(slot, value.as_deref().unwrap_or_default());
    }

    fill(&mut business.address.street_address, &found.address.street_address);
    fill(&mut business.address.city, &found.address.city);
    fill(&mut business.address.state, &found.address.state);
    fill(&mut business.address.postal_code, &found.address.postal_code);
    fill(&mut business.address.country, &found.address.country);

    fill_list(&mut business.opening_hours, &found.opening_hours);
    fill_list(&mut business.same_as, &non_blank(&found.same_as));
    if business.aggregate_rating.is_none() {
        business.aggregate_rating = found.aggregate_rating.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, wikidata: &str) -> Topic {
        Topic {
            name: name.to_string(),
            wikidata_id: wikidata.to_string(),
            wikipedia_url: String::new(),
        }
    }

    #[test]
    fn suggestions_fill_only_empty_values() {
        let mut business = BusinessFields::new("Acme", "https://acme.com");
        business.description = Some("Our own words.".to_string());
        business.slogan = Some("   ".to_string());

        let suggestions = Suggestions {
            schema_subtype: "Plumber".to_string(),
            description: "Model words.".to_string(),
            slogan: "Pipes fixed.".to_string(),
            wikidata_business_id: "https://www.wikidata.org/wiki/Q252924".to_string(),
            additional_types: vec!["https://en.wikipedia.org/wiki/Plumbing".to_string(), String::new()],
            area_served_suggestion: "Austin, TX".to_string(),
            ..Suggestions::default()
        };
        apply_suggestions(&mut business, &suggestions);

        assert_eq!(business.description.as_deref(), Some("Our own words."));
        assert_eq!(business.slogan.as_deref(), Some("Pipes fixed."));
        assert_eq!(business.schema_subtype.as_deref(), Some("Plumber"));
        assert_eq!(business.area_served.name, "Austin, TX");
        assert_eq!(
            business.additional_types,
            vec!["https://en.wikipedia.org/wiki/Plumbing", "https://www.wikidata.org/wiki/Q252924"]
        );
    }

    #[test]
    fn user_lists_are_kept_whole() {
        let mut business = BusinessFields::new("Acme", "https://acme.com");
        business.same_as = vec!["https://facebook.com/acme".to_string()];
        let suggestions = Suggestions {
            suggested_same_as: vec!["FILL-IN: https://linkedin.com/company/...".to_string()],
            ..Suggestions::default()
        };
        apply_suggestions(&mut business, &suggestions);
        assert_eq!(business.same_as, vec!["https://facebook.com/acme"]);
    }

    #[test]
    fn topic_links_complete_existing_topics() {
        let mut business = BusinessFields::new("Acme", "https://acme.com");
        business.knows_about = vec![topic("Plumbing", ""), topic("Drainage", "https://www.wikidata.org/wiki/Q1")];
        apply_topics(
            &mut business,
            &[
                topic("plumbing", "https://www.wikidata.org/wiki/Q252924"),
                topic("Drainage", "https://www.wikidata.org/wiki/Q2"),
                topic("Water heating", "https://www.wikidata.org/wiki/Q3"),
            ],
        );
        assert_eq!(business.knows_about[0].wikidata_id, "https://www.wikidata.org/wiki/Q252924");
        assert_eq!(business.knows_about[1].wikidata_id, "https://www.wikidata.org/wiki/Q1");
        assert_eq!(business.knows_about[2].name, "Water heating");
    }

    #[test]
    fn round_the_clock_sheet_opens_every_day() {
        let mut request = GenerationRequest::new(BusinessFields::default());
        let sheet = FactSheet {
            has_24_7: Some(true),
            opening_hours: vec![OpeningHours {
                day: "Monday".to_string(),
                opens: "09:00".to_string(),
                closes: "17:00".to_string(),
            }],
            ..FactSheet::default()
        };
        apply_fact_sheet(&mut request, &sheet);
        let hours = &request.business.opening_hours;
        assert_eq!(hours.len(), 7);
        assert!(hours.iter().all(|h| h.opens == "00:00" && h.closes == "23:59"));
    }

    #[test]
    fn fact_sheet_fills_business_and_person() {
        let mut request = GenerationRequest::new(BusinessFields::new("Acme Plumbing", ""));
        let sheet = FactSheet {
            business_name: "ACME PLUMBING LLC".to_string(),
            website_url: "https://acme.com".to_string(),
            founder_name: "Jane Doe".to_string(),
            job_title: "Master Plumber".to_string(),
            city: "Austin".to_string(),
            aggregate_rating_value: "4.8".to_string(),
            aggregate_rating_count: "120".to_string(),
            services: vec![ServiceSummary {
                name: "Drain Cleaning".to_string(),
                ..ServiceSummary::default()
            }],
            ..FactSheet::default()
        };
        apply_fact_sheet(&mut request, &sheet);

        assert_eq!(request.business.name, "Acme Plumbing");
        assert_eq!(request.business.website_url, "https://acme.com");
        assert_eq!(request.business.address.city, "Austin");
        assert_eq!(request.business.services[0].service_type, "Drain Cleaning");
        assert_eq!(request.business.aggregate_rating.as_ref().map(|r| r.value.as_str()), Some("4.8"));

        let person = request.person.as_ref().unwrap();
        assert_eq!(person.name, "Jane Doe");
        assert_eq!(person.job_title.as_deref(), Some("Master Plumber"));
    }

    #[test]
    fn founder_alone_does_not_create_a_person() {
        let mut request = GenerationRequest::new(BusinessFields::new("Acme", "https://acme.com"));
        let sheet = FactSheet {
            founder_name: "Jane Doe".to_string(),
            ..FactSheet::default()
        };
        apply_fact_sheet(&mut request, &sheet);
        assert_eq!(request.business.founder_name.as_deref(), Some("Jane Doe"));
        assert!(request.person.is_none());
    }

    #[test]
    fn scraped_values_never_replace_the_form() {
        let mut business = BusinessFields::new("Acme Plumbing", "https://acme.com");
        business.telephone = Some("+1-512-555-0100".to_string());

        let mut found = BusinessFields::new("ACME Plumbing & Drains", "");
        found.telephone = Some("(512) 555-9999".to_string());
        found.email = Some("hello@acme.com".to_string());
        found.address.city = "Austin".to_string();
        found.same_as = vec!["https://facebook.com/acme".to_string(), " ".to_string()];
        apply_scraped(&mut business, &found);

        assert_eq!(business.name, "Acme Plumbing");
        assert_eq!(business.telephone.as_deref(), Some("+1-512-555-0100"));
        assert_eq!(business.email.as_deref(), Some("hello@acme.com"));
        assert_eq!(business.address.city, "Austin");
        assert_eq!(business.same_as, vec!["https://facebook.com/acme"]);
    }
}
