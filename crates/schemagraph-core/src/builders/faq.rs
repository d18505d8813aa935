//! FAQPage.

use super::common::{answer_text, mentions};
use super::person::person_reference;
use super::{Entity, Site};
use crate::fields::{FaqFields, Question};
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::Node;
use serde_json::Value;

/// FAQ content node. `reviewer` is the person vouching for the answers;
/// when blank the organization is named instead.
pub fn faq_page(
    fields: &FaqFields,
    url: &str,
    reviewer: &str,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let url = normalize_url(url);
    let org = reference(&site.id(ids, &Role::Organization));
    let default_name = format!("FAQ — {}", site.name);

    let mut node = Node::entity("FAQPage", ids.identifier_for(&Role::FaqPage, &url));
    node.set("url", url.as_str());
    node.set_first(
        "name",
        [fields.page.title.as_deref().unwrap_or_default(), default_name.as_str()],
    );
    node.set("description", fields.page.description.as_deref());
    node.set("inLanguage", site.language.as_str());
    node.set("author", org.clone());

    let reviewed_by = person_reference(reviewer, site, ids);
    node.set(
        "reviewedBy",
        if reviewed_by.is_null() { org } else { reviewed_by },
    );

    let questions: Vec<Value> = fields.questions.iter().filter_map(question).collect();
    node.set("mainEntity", questions);

    Entity::new(Role::FaqPage, node.into_value())
}

/// Questions without both a question and an answer are dropped.
fn question(q: &Question) -> Option<Value> {
    if q.question.trim().is_empty() || q.answer.trim().is_empty() {
        return None;
    }
    let answer = Node::typed("Answer")
        .with("text", answer_text(&q.answer, &q.answer_links))
        .with("mentions", mentions(&q.mentions));
    Node::typed("Question")
        .with("name", q.question.as_str())
        .with("acceptedAnswer", answer)
        .into_option()
}
