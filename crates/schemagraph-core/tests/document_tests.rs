use schemagraph_core::builders::{organization, Site};
use schemagraph_core::fields::{
    BlogFields, BreadcrumbFields, BusinessFields, BusinessKind, FaqFields, PageFields,
    PersonFields, PricingTier, ProductFields, Question, SaasFields, ServiceCategory,
    ServiceFields, ServicesFields, Topic,
};
use schemagraph_core::{
    generate, Embed, GenerationRequest, IdentifierRegistry, PageRequest, SharedEntity,
};
use serde_json::{json, Value};

fn acme() -> BusinessFields {
    BusinessFields::new("Acme Plumbing", "https://acme.com")
}

fn faq_fields() -> FaqFields {
    FaqFields {
        page: PageFields {
            url: Some("https://acme.com/faq".to_string()),
            ..PageFields::default()
        },
        questions: vec![Question::new("Do you fix leaks?", "Yes, same day.")],
    }
}

fn node_by_id<'a>(graph: &'a [Value], id: &str) -> &'a Value {
    graph
        .iter()
        .find(|n| n["@id"] == json!(id))
        .unwrap_or_else(|| panic!("no node {id}"))
}

/// A request touching every page kind.
fn full_site() -> GenerationRequest {
    let mut business = acme();
    business.kind = BusinessKind::Local;
    business.schema_subtype = Some("Plumber".to_string());
    business.founder_name = Some("Jane Doe".to_string());
    business.knows_about = vec![Topic {
        name: "Plumbing".to_string(),
        wikidata_id: "https://www.wikidata.org/wiki/Q252924".to_string(),
        wikipedia_url: "https://en.wikipedia.org/wiki/Plumbing".to_string(),
    }];

    let saas = SaasFields {
        app_name: "Acme Scheduler".to_string(),
        app_url: "https://app.acme.com".to_string(),
        pricing_tiers: vec![
            PricingTier {
                name: "Basic".to_string(),
                price: "0".to_string(),
                ..PricingTier::default()
            },
            PricingTier {
                name: "Pro".to_string(),
                price: "19".to_string(),
                ..PricingTier::default()
            },
        ],
        ..SaasFields::default()
    };

    GenerationRequest::new(business)
        .with_person(PersonFields::named("Jane Doe"))
        .with_page(PageRequest::Home(PageFields::default()))
        .with_page(PageRequest::Website)
        .with_page(PageRequest::Organization)
        .with_page(PageRequest::Person)
        .with_page(PageRequest::About(PageFields::default()))
        .with_page(PageRequest::Contact(PageFields::default()))
        .with_page(PageRequest::Faq(faq_fields()))
        .with_page(PageRequest::Service(ServiceFields {
            name: "Drain Cleaning".to_string(),
            ..ServiceFields::default()
        }))
        .with_page(PageRequest::Services(ServicesFields {
            categories: vec![ServiceCategory {
                name: "Repairs".to_string(),
                url: "https://acme.com/repairs".to_string(),
                ..ServiceCategory::default()
            }],
            ..ServicesFields::default()
        }))
        .with_page(PageRequest::Blog(BlogFields {
            headline: "Winter pipe care".to_string(),
            date_published: "2024-11-02".to_string(),
            ..BlogFields::default()
        }))
        .with_page(PageRequest::Product(ProductFields {
            name: "Leak Kit".to_string(),
            price: "24.99".to_string(),
            ..ProductFields::default()
        }))
        .with_page(PageRequest::WebApp(saas.clone()))
        .with_page(PageRequest::Pricing(saas))
        .with_page(PageRequest::Breadcrumb(BreadcrumbFields::default()))
}

// ============================================================================
// Worked examples
// ============================================================================

#[test]
fn organization_with_name_and_url_only() {
    let business = acme();
    let org = organization(&business, "", &Site::from_business(&business), &IdentifierRegistry::new());
    assert_eq!(
        serde_json::to_string(&org.node).unwrap(),
        r#"{"@id":"https://acme.com#organization","@type":"Organization","name":"Acme Plumbing","url":"https://acme.com"}"#
    );
}

#[test]
fn faq_document_links_page_site_and_publisher() {
    let request = GenerationRequest::new(acme())
        .with_page(PageRequest::Home(PageFields::default()))
        .with_page(PageRequest::Faq(faq_fields()));
    let run = generate(&request);

    let faq = run.document("faq").unwrap();
    assert_eq!(faq.primary_type, "FAQPage");
    let json = faq.to_json();
    let graph = json["@graph"].as_array().unwrap();

    assert_eq!(graph[0]["@id"], json!("https://acme.com/faq#faqpage"));
    assert_eq!(graph[0]["isPartOf"], json!({"@id": "https://acme.com/faq#webpage"}));

    let page = node_by_id(graph, "https://acme.com/faq#webpage");
    assert_eq!(page["@type"], json!("WebPage"));
    assert_eq!(page["isPartOf"], json!({"@id": "https://acme.com#website"}));

    let website = node_by_id(graph, "https://acme.com#website");
    assert_eq!(
        website,
        &json!({
            "@id": "https://acme.com#website",
            "@type": "WebSite",
            "url": "https://acme.com",
            "publisher": {"@id": "https://acme.com#organization"}
        })
    );
    let org = node_by_id(graph, "https://acme.com#organization");
    assert!(org.get("name").is_none(), "organization is only stubbed on the FAQ page");
}

// ============================================================================
// Embed policy
// ============================================================================

#[test]
fn shared_entities_are_embedded_in_full_exactly_once() {
    let run = generate(&full_site());
    assert_eq!(run.policy.canonical_page(SharedEntity::Organization), Some("organization"));
    assert_eq!(run.policy.canonical_page(SharedEntity::Website), Some("website"));
    assert_eq!(run.policy.canonical_page(SharedEntity::Person), Some("person"));

    for id in ["https://acme.com#organization", "https://acme.com#website", "https://acme.com#person"] {
        let full: Vec<&str> = run
            .documents
            .iter()
            .filter(|d| d.entries(Embed::Full).any(|e| e.id() == id))
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(full.len(), 1, "{id} embedded in full by {full:?}");
    }
}

#[test]
fn every_reference_resolves_within_the_run() {
    let run = generate(&full_site());
    assert_eq!(run.documents.len(), 14);
    let report = run.audit();
    assert!(report.is_clean(), "{report:?}");
}

#[test]
fn default_owner_pages_win_without_dedicated_pages() {
    let request = GenerationRequest::new(acme())
        .with_person(PersonFields::named("Jane Doe"))
        .with_page(PageRequest::Faq(faq_fields()))
        .with_page(PageRequest::About(PageFields::default()))
        .with_page(PageRequest::Home(PageFields::default()));
    let run = generate(&request);

    assert_eq!(run.policy.canonical_page(SharedEntity::Organization), Some("homepage"));
    assert_eq!(run.policy.canonical_page(SharedEntity::Person), Some("about"));

    let about = run.document("about").unwrap();
    let person = about.node("https://acme.com#person").unwrap();
    assert_eq!(person["worksFor"], json!({"@id": "https://acme.com#organization"}));
    assert_eq!(person["url"], json!("https://acme.com/about"));
    assert!(run.audit().is_clean());
}

#[test]
fn explicit_canonical_override_moves_the_full_embed() {
    let request = GenerationRequest::new(acme())
        .with_page(PageRequest::Home(PageFields::default()))
        .with_page(PageRequest::Contact(PageFields::default()))
        .with_canonical(SharedEntity::Organization, "contact");
    let run = generate(&request);

    let contact = run.document("contact").unwrap();
    let home = run.document("homepage").unwrap();
    assert!(contact.entries(Embed::Full).any(|e| e.id() == "https://acme.com#organization"));
    assert!(home.entries(Embed::Stub).any(|e| e.id() == "https://acme.com#organization"));
    assert!(run.audit().is_clean());
}

// ============================================================================
// Page defaults
// ============================================================================

#[test]
fn pages_without_urls_get_distinct_defaults() {
    let run = generate(&full_site());
    let primary_id = |key: &str| {
        run.document(key)
            .and_then(|d| d.primary())
            .and_then(|p| p["@id"].as_str())
            .map(str::to_string)
            .unwrap()
    };
    assert_eq!(primary_id("homepage"), "https://acme.com#webpage");
    assert_eq!(primary_id("about"), "https://acme.com/about#webpage");
    assert_eq!(primary_id("contact"), "https://acme.com/contact#webpage");
    assert_eq!(primary_id("service"), "https://acme.com/services/drain-cleaning#service");
    assert_eq!(primary_id("services-multi"), "https://acme.com/services#webpage");
    assert_eq!(primary_id("blog"), "https://acme.com/blog/winter-pipe-care#blogposting");
    assert_eq!(primary_id("product"), "https://acme.com/products/leak-kit#product");
    assert_eq!(primary_id("webapp"), "https://app.acme.com#webapp");
    assert_eq!(primary_id("pricing"), "https://acme.com/pricing#webpage");
    assert_eq!(primary_id("breadcrumb"), "https://acme.com#breadcrumb");
}

#[test]
fn graph_order_is_primary_chain_then_supporting() {
    let run = generate(&full_site());
    let pricing = run.document("pricing").unwrap();
    let ids: Vec<&str> = pricing.graph.iter().map(|e| e.id()).collect();
    assert_eq!(
        ids,
        vec![
            "https://acme.com/pricing#webpage",
            "https://acme.com#website",
            "https://acme.com#organization",
            "https://acme.com/pricing#aggregateoffer",
        ]
    );
}

#[test]
fn blog_author_is_pulled_in_as_a_stub() {
    let run = generate(&full_site());
    let blog = run.document("blog").unwrap();
    let person = blog
        .graph
        .iter()
        .find(|e| e.id() == "https://acme.com#person")
        .unwrap();
    assert_eq!(person.embed, Embed::Stub);
    assert_eq!(blog.graph[0].node["mainEntityOfPage"], json!({"@id": "https://acme.com/blog/winter-pipe-care#webpage"}));
}

#[test]
fn files_are_named_after_the_client() {
    let run = generate(&full_site());
    let names: Vec<String> = run.files().unwrap().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names[0], "acme-plumbing-homepage.json");
    assert!(names.contains(&"acme-plumbing-services-multi.json".to_string()));
}

/// Every `name` published under `id`, across all documents of a run.
fn names_under(run: &schemagraph_core::Generation, id: &str) -> Vec<String> {
    fn walk(value: &Value, id: &str, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if map.get("@id") == Some(&json!(id)) {
                    if let Some(name) = map.get("name").and_then(Value::as_str) {
                        if !out.iter().any(|n| n == name) {
                            out.push(name.to_string());
                        }
                    }
                }
                map.values().for_each(|v| walk(v, id, out));
            }
            Value::Array(items) => items.iter().for_each(|v| walk(v, id, out)),
            _ => {}
        }
    }
    let mut names = Vec::new();
    for doc in &run.documents {
        walk(&doc.to_json(), id, &mut names);
    }
    names
}

#[test]
fn a_founder_other_than_the_person_does_not_share_its_id() {
    let mut business = acme();
    business.founder_name = Some("Jane Doe".to_string());
    let request = GenerationRequest::new(business)
        .with_person(PersonFields::named("John Roe"))
        .with_page(PageRequest::Home(PageFields::default()))
        .with_page(PageRequest::About(PageFields::default()))
        .with_page(PageRequest::Faq(faq_fields()));
    let run = generate(&request);

    assert_eq!(names_under(&run, "https://acme.com#person"), vec!["John Roe"]);
    let org = run
        .document("homepage")
        .and_then(|d| d.node("https://acme.com#organization"))
        .unwrap();
    assert_eq!(org["founder"], json!({"@type": "Person", "name": "Jane Doe"}));
    assert!(run.audit().is_clean());
}

#[test]
fn a_matching_founder_links_to_the_person() {
    let mut business = acme();
    business.founder_name = Some("Jane Doe".to_string());
    let request = GenerationRequest::new(business)
        .with_person(PersonFields::named("Jane Doe"))
        .with_page(PageRequest::Home(PageFields::default()))
        .with_page(PageRequest::About(PageFields::default()));
    let run = generate(&request);

    assert_eq!(names_under(&run, "https://acme.com#person"), vec!["Jane Doe"]);
    let org = run
        .document("homepage")
        .and_then(|d| d.node("https://acme.com#organization"))
        .unwrap();
    assert_eq!(org["founder"]["@id"], json!("https://acme.com#person"));
}

#[test]
fn repeated_pages_get_distinct_files_and_identifiers() {
    let unnamed_faq = || {
        PageRequest::Faq(FaqFields {
            questions: vec![Question::new("Do you fix leaks?", "Yes, same day.")],
            ..FaqFields::default()
        })
    };
    let request = GenerationRequest::new(BusinessFields::new("Acme", "https://acme.com"))
        .with_keyed_page("faq-2", unnamed_faq())
        .with_page(unnamed_faq())
        .with_page(unnamed_faq());
    let run = generate(&request);

    let names: Vec<String> = run.files().unwrap().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["acme-faq-2.json", "acme-faq.json", "acme-faq-3.json"]);

    let primaries: Vec<&str> = run
        .documents
        .iter()
        .filter_map(|d| d.primary().and_then(|p| p["@id"].as_str()))
        .collect();
    assert_eq!(
        primaries,
        vec![
            "https://acme.com/faq#faqpage",
            "https://acme.com/faq-2#faqpage",
            "https://acme.com/faq-3#faqpage",
        ]
    );
    assert!(run.audit().is_clean(), "{:?}", run.audit());
}

#[test]
fn default_paths_step_past_explicit_urls() {
    let explicit = FaqFields {
        page: PageFields {
            url: Some("https://acme.com/faq/".to_string()),
            ..PageFields::default()
        },
        ..FaqFields::default()
    };
    let request = GenerationRequest::new(BusinessFields::new("Acme", "https://acme.com"))
        .with_page(PageRequest::Faq(FaqFields::default()))
        .with_page(PageRequest::Faq(explicit));
    let run = generate(&request);

    assert_eq!(
        run.document("faq").and_then(|d| d.primary()).unwrap()["@id"],
        json!("https://acme.com/faq-2#faqpage")
    );
    assert_eq!(
        run.document("faq-2").and_then(|d| d.primary()).unwrap()["@id"],
        json!("https://acme.com/faq#faqpage")
    );
}
