//! Property-based tests for identifiers and generated documents.
//!
//! 1. Identifiers are a deterministic, injective function of (role, base)
//! 2. No generated property is ever empty
//! 3. Identical requests produce byte-identical files

use proptest::prelude::*;
use schemagraph_core::fields::{
    BlogFields, BusinessFields, BusinessKind, FaqFields, PageFields, ProductFields, Question,
    SaasFields, ServiceFields,
};
use schemagraph_core::ids::build_id;
use schemagraph_core::{generate, GenerationRequest, IdentifierRegistry, PageRequest, Role};
use serde_json::Value;

// ============================================================================
// Strategies
// ============================================================================

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Organization),
        Just(Role::WebSite),
        Just(Role::Person),
        Just(Role::WebPage),
        Just(Role::FaqPage),
        Just(Role::Service),
        Just(Role::Product),
        Just(Role::BlogPosting),
        Just(Role::WebApplication),
        Just(Role::AggregateOffer),
        Just(Role::Breadcrumb),
        (1usize..20).prop_map(Role::ServiceItem),
        (1usize..20).prop_map(Role::Location),
    ]
}

fn host_strategy() -> impl Strategy<Value = String> {
    "site-[a-z]{3,8}\\.com"
}

/// Text that is sometimes blank or whitespace.
fn maybe_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("   ".to_string()), "[A-Za-z][A-Za-z ]{0,15}"]
}

fn request_strategy() -> impl Strategy<Value = GenerationRequest> {
    (
        maybe_text(),
        prop_oneof![Just(String::new()), host_strategy()],
        maybe_text(),
        maybe_text(),
        any::<bool>(),
    )
        .prop_map(|(name, url, description, extra, local)| {
            let mut business = BusinessFields::new(name, url);
            business.description = Some(description);
            business.telephone = Some(extra.clone());
            business.founder_name = Some(extra.clone());
            business.same_as = vec![extra.clone(), "FILL-IN: twitter".to_string()];
            business.kind = if local { BusinessKind::Local } else { BusinessKind::Organization };

            GenerationRequest::new(business)
                .with_page(PageRequest::Home(PageFields::default()))
                .with_page(PageRequest::Faq(FaqFields {
                    questions: vec![Question::new(extra.clone(), extra.clone())],
                    ..FaqFields::default()
                }))
                .with_page(PageRequest::Service(ServiceFields {
                    name: extra.clone(),
                    ..ServiceFields::default()
                }))
                .with_page(PageRequest::Blog(BlogFields {
                    headline: extra.clone(),
                    ..BlogFields::default()
                }))
                .with_page(PageRequest::Product(ProductFields {
                    name: extra.clone(),
                    ..ProductFields::default()
                }))
                .with_page(PageRequest::WebApp(SaasFields::default()))
        })
}

fn assert_no_empty_values(value: &Value, path: &str) -> Result<(), TestCaseError> {
    match value {
        Value::Null => prop_assert!(false, "null at {}", path),
        Value::String(s) => prop_assert!(!s.trim().is_empty(), "empty string at {}", path),
        Value::Array(items) => {
            prop_assert!(!items.is_empty(), "empty list at {}", path);
            for (i, item) in items.iter().enumerate() {
                assert_no_empty_values(item, &format!("{path}[{i}]"))?;
            }
        }
        Value::Object(map) => {
            prop_assert!(map.keys().any(|k| k != "@type"), "empty object at {}", path);
            for (k, v) in map {
                assert_no_empty_values(v, &format!("{path}.{k}"))?;
            }
        }
        _ => {}
    }
    Ok(())
}

// ============================================================================
// Identifiers
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn identifiers_are_deterministic(role in role_strategy(), host in host_strategy()) {
        let a = IdentifierRegistry::new().identifier_for(&role, &host);
        let b = IdentifierRegistry::new().identifier_for(&role, &format!("https://{host}/"));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn identifiers_are_injective(
        r1 in role_strategy(),
        h1 in host_strategy(),
        r2 in role_strategy(),
        h2 in host_strategy(),
    ) {
        prop_assume!(r1 != r2 || h1 != h2);
        prop_assert_ne!(build_id(&h1, &r1), build_id(&h2, &r2));
    }
}

// ============================================================================
// Generated documents
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_documents_never_carry_empty_values(request in request_strategy()) {
        let run = generate(&request);
        for doc in &run.documents {
            assert_no_empty_values(&doc.to_json(), &doc.key)?;
        }
    }

    #[test]
    fn generation_is_idempotent(request in request_strategy()) {
        let first = generate(&request).files().unwrap();
        let second = generate(&request).files().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn placeholder_profiles_never_leak(request in request_strategy()) {
        for (_, contents) in generate(&request).files().unwrap() {
            prop_assert!(!contents.contains("FILL-IN:"));
        }
    }
}
