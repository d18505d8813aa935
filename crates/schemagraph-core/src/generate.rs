//! One generation run: every requested page, assembled under one policy.
//!
//! Planning happens first so the [`EmbedPolicy`] can see which pages carry
//! which shared entities. Each plan is then assembled independently; the
//! order in which documents are assembled does not affect their contents.

use crate::assemble::{assemble, bind_chain, ChainSpec, Document, EmbedPolicy, PageOutline};
use crate::builders::{self, Entity, Site};
use crate::fields::{PageFields, PersonFields};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role, SharedEntity};
use crate::links::{self, LinkReport};
use crate::output::{self, slugify};
use crate::request::{GenerationRequest, PageKind, PageRequest};
use crate::validate::{self, ValidationReport};
use serde_json::Value;
use std::collections::BTreeSet;

/// The documents of one run and how they were linked.
#[derive(Debug, Clone)]
pub struct Generation {
    pub client: String,
    pub documents: Vec<Document>,
    pub policy: EmbedPolicy,
    /// Every identifier handed out during the run, in registry order.
    pub identifiers: Vec<String>,
}

impl Generation {
    pub fn document(&self, key: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.key == key)
    }

    pub fn validate(&self) -> Vec<(String, ValidationReport)> {
        self.documents
            .iter()
            .map(|d| (d.key.clone(), validate::validate(d)))
            .collect()
    }

    pub fn audit(&self) -> LinkReport {
        links::audit(&self.documents)
    }

    /// `(file name, pretty JSON)` per document.
    pub fn files(&self) -> output::Result<Vec<(String, String)>> {
        output::render_files(&self.client, &self.documents)
    }
}

/// The three entities every page may point at.
struct SharedEntities {
    organization: Entity,
    website: Entity,
    person: Option<Entity>,
}

impl SharedEntities {
    fn get(&self, entity: SharedEntity) -> Option<&Entity> {
        match entity {
            SharedEntity::Organization => Some(&self.organization),
            SharedEntity::Website => Some(&self.website),
            SharedEntity::Person => self.person.as_ref(),
        }
    }
}

struct PagePlan {
    key: String,
    kind: PageKind,
    primary: Entity,
    /// The page node a primary entity sits on, for chains that pass through one.
    web_page: Option<Entity>,
    supporting: Vec<Entity>,
}

impl PagePlan {
    fn new(key: String, kind: PageKind, primary: Entity) -> Self {
        Self {
            key,
            kind,
            primary,
            web_page: None,
            supporting: Vec::new(),
        }
    }

    fn on_page(mut self, page: Entity) -> Self {
        self.web_page = Some(page);
        self
    }

    fn supported_by(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.supporting.extend(entities);
        self
    }

    fn ancestor(&self, role: &Role, shared: &SharedEntities) -> Option<Entity> {
        match role {
            Role::WebPage => self.web_page.clone(),
            other => other.shared().and_then(|e| shared.get(e)).cloned(),
        }
    }

    /// Shared entities this page holds or points at, in any form.
    fn outline(&self, shared: &SharedEntities) -> PageOutline {
        let chain = ChainSpec::for_page(self.kind);
        let mut nodes: Vec<&Value> = vec![&self.primary.node];
        let mut roles: Vec<Role> = vec![self.primary.role.clone()];
        roles.extend(chain.roles().cloned());
        roles.extend(self.supporting.iter().map(|e| e.role.clone()));
        nodes.extend(self.web_page.iter().map(|e| &e.node));
        nodes.extend(self.supporting.iter().map(|e| &e.node));
        for role in chain.roles() {
            if let Some(entity) = role.shared().and_then(|e| shared.get(e)) {
                nodes.push(&entity.node);
            }
        }

        let mut referenced = BTreeSet::new();
        for node in nodes {
            collect_ids(node, &mut referenced);
        }

        let carries = SharedEntity::ALL
            .into_iter()
            .filter(|entity| {
                roles.contains(&entity.role())
                    || shared
                        .get(*entity)
                        .is_some_and(|e| referenced.contains(&e.id))
            })
            .filter(|entity| shared.get(*entity).is_some())
            .collect();

        PageOutline {
            key: self.key.clone(),
            kind: self.kind,
            carries,
        }
    }
}

/// Every `@id` string anywhere in `value`.
fn collect_ids(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(id) = map.get("@id").and_then(Value::as_str) {
                out.insert(id.to_string());
            }
            map.values().for_each(|v| collect_ids(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_ids(v, out)),
        _ => {}
    }
}

/// Build, link and order every document the request asks for.
pub fn generate(request: &GenerationRequest) -> Generation {
    let ids = IdentifierRegistry::new();
    let business = &request.business;
    let site = Site::from_business(business);
    let keys = request.page_keys();

    let about_url = request.pages.iter().find_map(|spec| match &spec.page {
        PageRequest::About(page) => Some(site.url_or(page.url.as_deref(), "about")),
        _ => None,
    });
    let person_name = request.person_name();
    let wants_person_page = request.pages.iter().any(|s| s.page.kind() == PageKind::Person);
    let person = if person_name.is_empty() && !wants_person_page {
        None
    } else {
        let mut fields = request
            .person
            .clone()
            .unwrap_or_else(|| PersonFields::named(person_name));
        if fields.name.trim().is_empty() {
            fields.name = person_name.to_string();
        }
        Some(builders::person(&fields, about_url.as_deref(), &site, &ids))
    };

    let shared = SharedEntities {
        organization: builders::organization(business, person_name, &site, &ids),
        website: builders::website(business, &site, &ids),
        person,
    };

    let mut paths = PagePaths::claim_explicit(request);
    let plans: Vec<PagePlan> = request
        .pages
        .iter()
        .zip(keys)
        .map(|(spec, key)| plan_page(key, &spec.page, request, &shared, &site, &ids, &mut paths))
        .collect();

    let outlines: Vec<PageOutline> = plans.iter().map(|p| p.outline(&shared)).collect();
    let policy = EmbedPolicy::resolve(&outlines, &request.canonical);

    let documents: Vec<Document> = plans
        .into_iter()
        .map(|plan| assemble_plan(plan, &shared, &policy))
        .collect();

    let client = request
        .client_slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(business.name.as_str());

    tracing::debug!(
        documents = documents.len(),
        identifiers = ids.len(),
        "generation finished"
    );

    Generation {
        client: slugify(client),
        documents,
        policy,
        identifiers: ids.assigned(),
    }
}

/// Page URLs handed out so far, per page kind.
///
/// Two pages of one kind at one URL would share every identifier, so default
/// paths step to `-2`, `-3`, ... past anything already claimed.
struct PagePaths(BTreeSet<(PageKind, String)>);

impl PagePaths {
    fn claim_explicit(request: &GenerationRequest) -> Self {
        let claimed = request
            .pages
            .iter()
            .filter_map(|spec| {
                let url = spec.page.explicit_url()?;
                Some((spec.page.kind(), normalize_url(url)))
            })
            .collect();
        Self(claimed)
    }

    fn url_or(&mut self, site: &Site, kind: PageKind, explicit: Option<&str>, fallback: &str) -> String {
        let url = site.url_or(explicit, fallback);
        if explicit.is_some_and(|u| !u.trim().is_empty()) {
            return url;
        }
        let mut candidate = url;
        let mut n = 1;
        while !self.0.insert((kind, candidate.trim_end_matches('/').to_string())) {
            n += 1;
            let path = if fallback.is_empty() {
                format!("page-{n}")
            } else {
                format!("{fallback}-{n}")
            };
            candidate = site.page_url(&path);
        }
        candidate
    }
}

fn assemble_plan(plan: PagePlan, shared: &SharedEntities, policy: &EmbedPolicy) -> Document {
    let chain = bind_chain(&ChainSpec::for_page(plan.kind), |role| plan.ancestor(role, shared));

    let mut supporting = plan.supporting;
    supporting.extend(
        policy
            .canonical_for(&plan.key)
            .into_iter()
            .filter_map(|e| shared.get(e).cloned()),
    );
    let mut doc = assemble(&plan.key, plan.primary, chain, supporting, policy);

    let mut referenced = BTreeSet::new();
    for entry in &doc.graph {
        collect_ids(&entry.node, &mut referenced);
    }
    for entity in SharedEntity::ALL {
        if let Some(e) = shared.get(entity) {
            if referenced.contains(&e.id) && !doc.contains(&e.id) {
                doc.push_supporting(e.clone(), policy);
            }
        }
    }
    doc
}

fn plan_page(
    key: String,
    page: &PageRequest,
    request: &GenerationRequest,
    shared: &SharedEntities,
    site: &Site,
    ids: &IdentifierRegistry,
    paths: &mut PagePaths,
) -> PagePlan {
    let business = &request.business;
    let org_ref = reference(&shared.organization.id);
    let kind = page.kind();
    let page_entity = |page_type: &str, fields: &PageFields, url: &str, fallback_name: &str| {
        builders::web_page(page_type, fields, url, fallback_name, site, ids)
    };

    match page {
        PageRequest::Home(fields) => {
            let url = paths.url_or(site, kind, fields.url.as_deref(), "");
            let home = page_entity("WebPage", fields, home_url(&url, site), &site.name).with("about", org_ref);
            PagePlan::new(key, kind, home)
        }
        PageRequest::Website => PagePlan::new(key, kind, shared.website.clone()),
        PageRequest::Organization => PagePlan::new(key, kind, shared.organization.clone()),
        PageRequest::Person => {
            let person = shared.person.clone().unwrap_or_else(|| {
                builders::person(&PersonFields::default(), None, site, ids)
            });
            PagePlan::new(key, kind, person)
        }
        PageRequest::About(fields) => {
            let url = paths.url_or(site, kind, fields.url.as_deref(), "about");
            let about = page_entity("AboutPage", fields, &url, &format!("About {}", site.name))
                .with("about", org_ref)
                .with(
                    "mainEntity",
                    shared.person.as_ref().map(|p| reference(&p.id)).unwrap_or(Value::Null),
                );
            PagePlan::new(key, kind, about).supported_by(shared.person.clone())
        }
        PageRequest::Contact(fields) => {
            let url = paths.url_or(site, kind, fields.url.as_deref(), "contact");
            let contact = page_entity("ContactPage", fields, &url, &format!("Contact {}", site.name))
                .with("about", org_ref);
            PagePlan::new(key, kind, contact)
        }
        PageRequest::Faq(fields) => {
            let url = paths.url_or(site, kind, fields.page.url.as_deref(), "faq");
            let faq = builders::faq_page(fields, &url, request.person_name(), site, ids);
            let host = page_entity("WebPage", &fields.page, &url, &format!("FAQ — {}", site.name));
            PagePlan::new(key, kind, faq).on_page(host)
        }
        PageRequest::Service(fields) => {
            let url = paths.url_or(
                site,
                kind,
                fields.page.url.as_deref(),
                &format!("services/{}", slug_or(&fields.name, "service")),
            );
            let svc = builders::service(fields, &url, business, site, ids);
            let host = page_entity("WebPage", &fields.page, &url, &fields.name);
            PagePlan::new(key, kind, svc).on_page(host)
        }
        PageRequest::Services(fields) => {
            let url = paths.url_or(site, kind, fields.page.url.as_deref(), "services");
            let categories = builders::service_categories(fields, &url, business, site, ids);
            let parts: Vec<Value> = categories.iter().map(|c| reference(&c.id)).collect();
            let overview = page_entity("WebPage", &fields.page, &url, &format!("{} Services", site.name))
                .with("hasPart", parts);
            PagePlan::new(key, kind, overview).supported_by(categories)
        }
        PageRequest::Blog(fields) => {
            let url = paths.url_or(
                site,
                kind,
                fields.page.url.as_deref(),
                &format!("blog/{}", slug_or(&fields.headline, "post")),
            );
            let post = builders::blog_posting(fields, &url, request.person_name(), site, ids);
            let host = page_entity("WebPage", &fields.page, &url, &fields.headline);
            PagePlan::new(key, kind, post).on_page(host)
        }
        PageRequest::Product(fields) => {
            let url = paths.url_or(
                site,
                kind,
                fields.page.url.as_deref(),
                &format!("products/{}", slug_or(&fields.name, "product")),
            );
            let item = builders::product(fields, &url, site, ids);
            let host = page_entity("WebPage", &fields.page, &url, &fields.name);
            PagePlan::new(key, kind, item).on_page(host)
        }
        PageRequest::WebApp(fields) => {
            PagePlan::new(key, kind, builders::web_application(fields, business, site, ids))
        }
        PageRequest::Pricing(fields) => {
            let url = paths.url_or(site, kind, fields.page.url.as_deref(), "pricing");
            let offer = builders::pricing_offer(fields, &url, business, site, ids);
            let label = if fields.app_name.trim().is_empty() {
                site.name.as_str()
            } else {
                fields.app_name.trim()
            };
            let pricing = page_entity("WebPage", &fields.page, &url, &format!("{label} Pricing"))
                .with("mainEntity", reference(&offer.id));
            PagePlan::new(key, kind, pricing).supported_by([offer])
        }
        PageRequest::Breadcrumb(fields) => {
            let url = paths.url_or(site, kind, fields.page.url.as_deref(), "");
            PagePlan::new(
                key,
                kind,
                builders::breadcrumb_list(fields, home_url(&url, site), site, ids),
            )
        }
    }
}

/// Pages that default to the site root.
fn home_url<'a>(url: &'a str, site: &'a Site) -> &'a str {
    if url.trim_end_matches('/') == site.base_url {
        &site.base_url
    } else {
        url
    }
}

fn slug_or(text: &str, fallback: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}
