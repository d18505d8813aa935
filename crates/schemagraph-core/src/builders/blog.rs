//! BlogPosting.

use super::common::mentions;
use super::person::person_reference;
use super::{Entity, Site};
use crate::fields::BlogFields;
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::{first_non_empty, Node};
use serde_json::Value;

pub fn blog_posting(
    fields: &BlogFields,
    url: &str,
    author: &str,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let url = normalize_url(url);
    let org_id = site.id(ids, &Role::Organization);
    let author_ref = person_reference(author, site, ids);

    let mut node = Node::entity("BlogPosting", ids.identifier_for(&Role::BlogPosting, &url));
    node.set("url", url.as_str());
    node.set("headline", fields.headline.as_str());
    node.set("name", fields.headline.as_str());
    node.set("description", fields.page.description.as_deref());
    node.set("articleBody", fields.article_body.as_deref());
    node.set("keywords", fields.keywords.as_deref());
    node.set("datePublished", fields.date_published.as_str());
    node.set_first(
        "dateModified",
        [
            fields.date_modified.as_deref().unwrap_or_default(),
            fields.date_published.as_str(),
        ],
    );
    node.set("inLanguage", site.language.as_str());
    node.set("articleSection", fields.article_section.as_deref());
    node.set("wordCount", fields.word_count);
    node.set("mentions", mentions(&fields.mentions));
    node.set("author", author_ref.clone());
    node.set("publisher", reference(&org_id));

    match fields.reviewed_by_name.as_deref() {
        Some(reviewer) if !reviewer.trim().is_empty() => {
            node.set(
                "reviewedBy",
                Node::typed("Person")
                    .with("name", reviewer)
                    .with("jobTitle", fields.reviewed_by_title.as_deref()),
            );
        }
        _ => {
            node.set("reviewedBy", author_ref.clone());
        }
    }

    if let Some(image) = first_non_empty([fields.image.as_str()]) {
        let creator = match author_ref.get("@id").and_then(Value::as_str) {
            Some(person_id) => reference(person_id),
            None => reference(&org_id),
        };
        node.set(
            "image",
            Node::typed("ImageObject")
                .with("representativeOfPage", true)
                .with("contentUrl", image)
                .with("url", image)
                .with("copyrightHolder", reference(&org_id))
                .with("creator", creator),
        );
    }

    Entity::new(Role::BlogPosting, node.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::BusinessFields;
    use serde_json::json;

    #[test]
    fn image_credits_the_author() {
        let site = Site::from_business(&BusinessFields::new("Acme", "acme.com"));
        let fields = BlogFields {
            headline: "Winterize your pipes".to_string(),
            date_published: "2024-11-02".to_string(),
            image: "https://acme.com/pipes.jpg".to_string(),
            ..BlogFields::default()
        };
        let post = blog_posting(&fields, "https://acme.com/blog/pipes", "Jane Doe", &site, &IdentifierRegistry::new());
        assert_eq!(post.id, "https://acme.com/blog/pipes#blogposting");
        assert_eq!(post.node["dateModified"], json!("2024-11-02"));
        assert_eq!(post.node["image"]["creator"], json!({"@id": "https://acme.com#person"}));
        assert_eq!(post.node["reviewedBy"]["name"], json!("Jane Doe"));
    }

    #[test]
    fn no_author_means_organization_credit() {
        let site = Site::from_business(&BusinessFields::new("Acme", "acme.com"));
        let fields = BlogFields {
            image: "https://acme.com/pipes.jpg".to_string(),
            ..BlogFields::default()
        };
        let post = blog_posting(&fields, "acme.com/blog/x", "", &site, &IdentifierRegistry::new());
        assert!(post.get("author").is_none());
        assert_eq!(post.node["image"]["creator"], json!({"@id": "https://acme.com#organization"}));
    }
}
