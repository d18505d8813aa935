//! Typed field sets, one per entity role.
//!
//! Every field defaults to empty and empty means "not supplied". Plain
//! `String` fields are the ones the validator treats as required for the
//! matching document type; `Option`s and lists are optional. Whether a
//! required field was actually filled in is business policy and is checked
//! on the assembled document, not here.

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

/// Local businesses get address/hours/area properties; other organizations don't.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessKind {
    Local,
    #[default]
    Organization,
}

/// A topic the business or person is knowledgeable about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    pub name: String,
    pub wikidata_id: String,
    pub wikipedia_url: String,
}

/// An entity mentioned by an article or answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mention {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    pub wikidata_id: String,
    pub wikipedia_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddressFields {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaServedFields {
    pub cities: Vec<String>,
    pub postal_codes: Vec<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHours {
    pub day: String,
    pub opens: String,
    pub closes: String,
}

/// A service listed under a business or a service category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSummary {
    pub name: String,
    pub url: String,
    pub service_type: String,
    pub audience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialOffer {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingFields {
    pub value: String,
    pub count: String,
    pub best: Option<String>,
    pub worst: Option<String>,
}

/// One branch of a multi-location organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFields {
    pub name: String,
    pub url: String,
    pub telephone: String,
    pub email: String,
    pub address: PostalAddressFields,
    pub opening_hours: Vec<OpeningHours>,
}

/// The business behind the site. Drives Organization, WebSite and most defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessFields {
    pub kind: BusinessKind,
    /// Most specific schema.org type, e.g. `Plumber` or `HVACBusiness`.
    pub schema_subtype: Option<String>,
    pub name: String,
    pub website_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub legal_name: Option<String>,
    pub alternate_name: Option<String>,
    pub description: Option<String>,
    pub disambiguating_description: Option<String>,
    pub slogan: Option<String>,
    pub founding_date: Option<String>,
    pub founding_location: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub price_range: Option<String>,
    pub payment_accepted: Option<String>,
    pub currencies_accepted: Option<String>,
    pub logo_url: Option<String>,
    pub image_url: Option<String>,
    pub has_map: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub founder_name: Option<String>,
    pub parent_organization: Option<String>,
    pub enable_search_action: bool,
    pub additional_types: Vec<String>,
    pub same_as: Vec<String>,
    pub knows_about: Vec<Topic>,
    pub address: PostalAddressFields,
    pub area_served: AreaServedFields,
    pub opening_hours: Vec<OpeningHours>,
    pub services: Vec<ServiceSummary>,
    pub special_offers: Vec<SpecialOffer>,
    pub locations: Vec<LocationFields>,
    pub aggregate_rating: Option<RatingFields>,
}

impl Default for BusinessFields {
    fn default() -> Self {
        Self {
            kind: BusinessKind::default(),
            schema_subtype: None,
            name: String::new(),
            website_url: String::new(),
            language: default_language(),
            legal_name: None,
            alternate_name: None,
            description: None,
            disambiguating_description: None,
            slogan: None,
            founding_date: None,
            founding_location: None,
            email: None,
            telephone: None,
            price_range: None,
            payment_accepted: None,
            currencies_accepted: None,
            logo_url: None,
            image_url: None,
            has_map: None,
            latitude: None,
            longitude: None,
            founder_name: None,
            parent_organization: None,
            enable_search_action: false,
            additional_types: Vec::new(),
            same_as: Vec::new(),
            knows_about: Vec::new(),
            address: PostalAddressFields::default(),
            area_served: AreaServedFields::default(),
            opening_hours: Vec::new(),
            services: Vec::new(),
            special_offers: Vec::new(),
            locations: Vec::new(),
            aggregate_rating: None,
        }
    }
}

impl BusinessFields {
    /// `Organization{name, url}` with everything else unset.
    pub fn new(name: impl Into<String>, website_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website_url: website_url.into(),
            ..Self::default()
        }
    }
}

/// The founder, author or other person behind the business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonFields {
    pub name: String,
    pub alternate_name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub job_title: Option<String>,
    pub job_title_same_as: Option<String>,
    pub image: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
    pub birth_place: Option<String>,
    pub member_of: Option<String>,
    pub alumni_of: Option<String>,
    pub alumni_of_url: Option<String>,
    pub knows_about: Vec<Topic>,
    pub knows_language: Vec<String>,
    pub credentials: Vec<String>,
    pub awards: Vec<String>,
    pub same_as: Vec<String>,
    pub address: PostalAddressFields,
}

impl PersonFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fields common to every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFields {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub related_links: Vec<String>,
    pub significant_links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerLink {
    pub anchor_text: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub question: String,
    pub answer: String,
    pub answer_links: Vec<AnswerLink>,
    pub mentions: Vec<Mention>,
}

impl Question {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub name: String,
    pub description: Option<String>,
    pub service_type: Option<String>,
    pub audience: Option<String>,
    pub additional_type: Option<String>,
    pub sub_services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCategory {
    pub name: String,
    pub url: String,
    pub description: String,
    pub service_type: String,
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub categories: Vec<ServiceCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub headline: String,
    pub date_published: String,
    pub image: String,
    pub date_modified: Option<String>,
    pub article_body: Option<String>,
    pub keywords: Option<String>,
    pub article_section: Option<String>,
    pub word_count: Option<u32>,
    pub reviewed_by_name: Option<String>,
    pub reviewed_by_title: Option<String>,
    pub mentions: Vec<Mention>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
    PreOrder,
    Discontinued,
}

impl Availability {
    pub fn iri(self) -> &'static str {
        match self {
            Availability::InStock => "https://schema.org/InStock",
            Availability::OutOfStock => "https://schema.org/OutOfStock",
            Availability::PreOrder => "https://schema.org/PreOrder",
            Availability::Discontinued => "https://schema.org/Discontinued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingFields {
    pub rate: String,
    pub country: String,
    pub handling_days: (u32, u32),
    pub transit_days: (u32, u32),
}

impl Default for ShippingFields {
    fn default() -> Self {
        Self {
            rate: "0".to_string(),
            country: String::new(),
            handling_days: (1, 3),
            transit_days: (3, 7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnPolicyFields {
    pub days: u32,
    pub country: String,
    /// schema.org `ReturnMethodEnumeration` member, e.g. `ReturnByMail`.
    pub method: String,
    /// schema.org `ReturnFeesEnumeration` member, e.g. `FreeReturn`.
    pub fees: String,
}

impl Default for ReturnPolicyFields {
    fn default() -> Self {
        Self {
            days: 30,
            country: String::new(),
            method: "ReturnByMail".to_string(),
            fees: "FreeReturn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewFields {
    pub author: String,
    pub body: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub name: String,
    pub price: String,
    /// Defaults to `USD` when left empty.
    pub currency: String,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub disambiguating_description: Option<String>,
    pub sku: Option<String>,
    pub mpn: Option<String>,
    pub gtin: Option<String>,
    pub gtin13: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub pattern: Option<String>,
    pub category: Option<String>,
    pub slogan: Option<String>,
    pub availability: Availability,
    pub price_valid_until: Option<String>,
    pub is_related_to: Vec<String>,
    pub shipping: Option<ShippingFields>,
    pub return_policy: Option<ReturnPolicyFields>,
    pub aggregate_rating: Option<RatingFields>,
    pub reviews: Vec<ReviewFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    pub url: Option<String>,
    pub description: Option<String>,
    /// UN/CEFACT unit code for the billing period; `MON` when empty.
    pub billing_period: Option<String>,
}

/// A SaaS product; used by both the web-app and the pricing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaasFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub app_name: String,
    pub app_url: String,
    pub app_description: Option<String>,
    pub app_category: Option<String>,
    pub app_suite: Option<String>,
    pub operating_system: Option<String>,
    pub browser_requirements: Option<String>,
    pub permissions: Option<String>,
    pub release_notes_url: Option<String>,
    pub marketing_url: Option<String>,
    pub currency: Option<String>,
    pub price: Option<String>,
    pub pricing_tiers: Vec<PricingTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbItem {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbFields {
    #[serde(flatten)]
    pub page: PageFields,
    pub items: Vec<BreadcrumbItem>,
}
