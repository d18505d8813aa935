//! The immutable input of one generation run.

use crate::fields::{
    BlogFields, BreadcrumbFields, BusinessFields, FaqFields, PageFields, PersonFields,
    ProductFields, SaasFields, ServiceFields, ServicesFields,
};
use crate::ids::SharedEntity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which kind of page a document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Website,
    Organization,
    Person,
    About,
    Contact,
    Faq,
    Service,
    Services,
    Blog,
    Product,
    WebApp,
    Pricing,
    Breadcrumb,
}

impl PageKind {
    /// Key used in file names when the request does not name the page.
    pub fn default_key(self) -> &'static str {
        match self {
            PageKind::Home => "homepage",
            PageKind::Website => "website",
            PageKind::Organization => "organization",
            PageKind::Person => "person",
            PageKind::About => "about",
            PageKind::Contact => "contact",
            PageKind::Faq => "faq",
            PageKind::Service => "service",
            PageKind::Services => "services-multi",
            PageKind::Blog => "blog",
            PageKind::Product => "product",
            PageKind::WebApp => "webapp",
            PageKind::Pricing => "pricing",
            PageKind::Breadcrumb => "breadcrumb",
        }
    }

    /// The page that naturally carries the full form of a shared entity.
    ///
    /// Dedicated pages come first, then the page that describes the entity
    /// as its main subject.
    pub fn owner_preference(entity: SharedEntity) -> &'static [PageKind] {
        match entity {
            SharedEntity::Organization => &[PageKind::Organization, PageKind::Home],
            SharedEntity::Website => &[PageKind::Website, PageKind::Home],
            SharedEntity::Person => &[PageKind::Person, PageKind::About],
        }
    }
}

/// One requested page and its page-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageRequest {
    Home(PageFields),
    Website,
    Organization,
    Person,
    About(PageFields),
    Contact(PageFields),
    Faq(FaqFields),
    Service(ServiceFields),
    Services(ServicesFields),
    Blog(BlogFields),
    Product(ProductFields),
    WebApp(SaasFields),
    Pricing(SaasFields),
    Breadcrumb(BreadcrumbFields),
}

impl PageRequest {
    pub fn kind(&self) -> PageKind {
        match self {
            PageRequest::Home(_) => PageKind::Home,
            PageRequest::Website => PageKind::Website,
            PageRequest::Organization => PageKind::Organization,
            PageRequest::Person => PageKind::Person,
            PageRequest::About(_) => PageKind::About,
            PageRequest::Contact(_) => PageKind::Contact,
            PageRequest::Faq(_) => PageKind::Faq,
            PageRequest::Service(_) => PageKind::Service,
            PageRequest::Services(_) => PageKind::Services,
            PageRequest::Blog(_) => PageKind::Blog,
            PageRequest::Product(_) => PageKind::Product,
            PageRequest::WebApp(_) => PageKind::WebApp,
            PageRequest::Pricing(_) => PageKind::Pricing,
            PageRequest::Breadcrumb(_) => PageKind::Breadcrumb,
        }
    }

    /// The page URL the request names, if any.
    pub fn explicit_url(&self) -> Option<&str> {
        let page = match self {
            PageRequest::Home(page) | PageRequest::About(page) | PageRequest::Contact(page) => page,
            PageRequest::Faq(fields) => &fields.page,
            PageRequest::Service(fields) => &fields.page,
            PageRequest::Services(fields) => &fields.page,
            PageRequest::Blog(fields) => &fields.page,
            PageRequest::Product(fields) => &fields.page,
            PageRequest::WebApp(fields) | PageRequest::Pricing(fields) => &fields.page,
            PageRequest::Breadcrumb(fields) => &fields.page,
            PageRequest::Website | PageRequest::Organization | PageRequest::Person => return None,
        };
        page.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// A page request with an optional explicit key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub page: PageRequest,
}

impl PageSpec {
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl From<PageRequest> for PageSpec {
    fn from(page: PageRequest) -> Self {
        Self { key: None, page }
    }
}

/// Everything one run needs. Built once, never mutated by generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub business: BusinessFields,
    pub person: Option<PersonFields>,
    pub pages: Vec<PageSpec>,
    /// Explicit choice of which page key carries each shared entity in full.
    pub canonical: BTreeMap<SharedEntity, String>,
    /// Prefix for exported file names; derived from the business name when empty.
    pub client_slug: Option<String>,
}

impl GenerationRequest {
    pub fn new(business: BusinessFields) -> Self {
        Self {
            business,
            ..Self::default()
        }
    }

    pub fn with_person(mut self, person: PersonFields) -> Self {
        self.person = Some(person);
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.pages.push(page.into());
        self
    }

    pub fn with_keyed_page(mut self, key: impl Into<String>, page: PageRequest) -> Self {
        self.pages.push(PageSpec {
            key: Some(key.into()),
            page,
        });
        self
    }

    pub fn with_canonical(mut self, entity: SharedEntity, page_key: impl Into<String>) -> Self {
        self.canonical.insert(entity, page_key.into());
        self
    }

    /// Name of the person behind the site: the person record, else the founder.
    pub fn person_name(&self) -> &str {
        self.person
            .as_ref()
            .map(|p| p.name.trim())
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.business
                    .founder_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_default()
    }

    /// Page keys in request order, unique across the run.
    ///
    /// Explicit keys are reserved first; repeats get `-2`, `-3`, ... until
    /// the candidate is unused.
    pub fn page_keys(&self) -> Vec<String> {
        let reserved: BTreeSet<&str> = self.pages.iter().filter_map(PageSpec::explicit_key).collect();
        let mut used: BTreeSet<String> = BTreeSet::new();
        self.pages
            .iter()
            .map(|spec| {
                let (base, avoid_reserved) = match spec.explicit_key() {
                    Some(key) => (key, false),
                    None => (spec.page.kind().default_key(), true),
                };
                let mut key = base.to_string();
                let mut n = 1;
                while used.contains(&key) || (avoid_reserved && reserved.contains(key.as_str())) {
                    n += 1;
                    key = format!("{base}-{n}");
                }
                used.insert(key.clone());
                key
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pages_deserialize_from_tagged_json() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "business": {"name": "Acme", "website_url": "acme.com"},
            "pages": [
                {"page": "home"},
                {"page": "faq", "url": "https://acme.com/help", "questions": [{"question": "Q?", "answer": "A."}]},
                {"page": "organization", "key": "org"}
            ],
            "canonical": {"organization": "org"}
        }))
        .unwrap();

        assert_eq!(request.business.language, "en");
        assert_eq!(request.pages.len(), 3);
        match &request.pages[1].page {
            PageRequest::Faq(faq) => {
                assert_eq!(faq.page.url.as_deref(), Some("https://acme.com/help"));
                assert_eq!(faq.questions.len(), 1);
            }
            other => panic!("unexpected page {other:?}"),
        }
        assert_eq!(request.pages[2].key.as_deref(), Some("org"));
        assert_eq!(request.canonical.get(&SharedEntity::Organization).map(String::as_str), Some("org"));
    }

    #[test]
    fn repeated_kinds_get_numbered_keys() {
        let request = GenerationRequest::new(BusinessFields::new("Acme", "acme.com"))
            .with_page(PageRequest::Service(ServiceFields::default()))
            .with_page(PageRequest::Service(ServiceFields::default()))
            .with_keyed_page("drains", PageRequest::Service(ServiceFields::default()));
        assert_eq!(request.page_keys(), vec!["service", "service-2", "drains"]);
    }

    #[test]
    fn generated_keys_skip_explicit_ones() {
        let faq = || PageRequest::Faq(FaqFields::default());
        let request = GenerationRequest::new(BusinessFields::new("Acme", "acme.com"))
            .with_keyed_page("faq-2", faq())
            .with_page(faq())
            .with_page(faq());
        assert_eq!(request.page_keys(), vec!["faq-2", "faq", "faq-3"]);

        let request = GenerationRequest::new(BusinessFields::new("Acme", "acme.com"))
            .with_page(faq())
            .with_keyed_page("faq", faq())
            .with_keyed_page("faq", faq());
        assert_eq!(request.page_keys(), vec!["faq-2", "faq", "faq-3"]);
    }

    #[test]
    fn person_name_falls_back_to_founder() {
        let mut business = BusinessFields::new("Acme", "acme.com");
        business.founder_name = Some("Jane Doe".to_string());
        let request = GenerationRequest::new(business);
        assert_eq!(request.person_name(), "Jane Doe");

        let request = request.with_person(PersonFields::named("John Roe"));
        assert_eq!(request.person_name(), "John Roe");
    }
}
