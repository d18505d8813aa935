//! Person (founder / author).

use super::common::{knows_about, postal_address, same_as};
use super::{Entity, Site};
use crate::fields::PersonFields;
use crate::ids::{normalize_url, reference, IdentifierRegistry, Role};
use crate::node::{first_non_empty, Node};
use serde_json::Value;

/// Full Person node. `page_url` is where the person is described (usually
/// the about page) and is used when the person has no URL of their own.
pub fn person(
    fields: &PersonFields,
    page_url: Option<&str>,
    site: &Site,
    ids: &IdentifierRegistry,
) -> Entity {
    let id = site.id(ids, &Role::Person);
    let own_url = fields.url.as_deref().map(normalize_url).unwrap_or_default();
    let page_url = page_url.map(normalize_url).unwrap_or_default();

    let mut node = Node::entity("Person", id);
    node.set("name", fields.name.as_str());
    node.set("alternateName", fields.alternate_name.as_deref());
    node.set("description", fields.description.as_deref());
    node.set_first("url", [own_url.as_str(), page_url.as_str()]);
    node.set("email", fields.email.as_deref());
    node.set("telephone", fields.telephone.as_deref());
    node.set("image", fields.image.as_deref());
    node.set("gender", fields.gender.as_deref());
    node.set("nationality", fields.nationality.as_deref());
    node.set("birthDate", fields.birth_date.as_deref());
    node.set("birthPlace", fields.birth_place.as_deref());
    node.set("memberOf", fields.member_of.as_deref());
    node.set("jobTitle", job_title(fields));
    node.set("worksFor", reference(&site.id(ids, &Role::Organization)));
    node.set("knowsAbout", knows_about(&fields.knows_about));
    node.set("knowsLanguage", fields.knows_language.clone());
    node.set("hasCredential", fields.credentials.clone());
    node.set("award", fields.awards.clone());
    node.set("sameAs", same_as(&fields.same_as));
    node.set("address", postal_address(&fields.address));

    if let Some(school) = fields.alumni_of.as_deref() {
        let alumni = Node::typed("EducationalOrganization")
            .with("name", school)
            .with("sameAs", fields.alumni_of_url.as_deref());
        node.set("alumniOf", alumni);
    }

    Entity::new(Role::Person, node.into_value())
}

/// A plain title, or a `DefinedTerm` when the title is anchored somewhere.
fn job_title(fields: &PersonFields) -> Value {
    let Some(title) = fields.job_title.as_deref() else {
        return Value::Null;
    };
    match fields.job_title_same_as.as_deref() {
        Some(anchor) if !anchor.trim().is_empty() => Node::typed("DefinedTerm")
            .with("name", title)
            .with("sameAs", anchor)
            .into(),
        _ => Value::from(title),
    }
}

/// Compact `{@type, @id, name}` form used for founder/author/reviewer.
pub fn person_reference(name: &str, site: &Site, ids: &IdentifierRegistry) -> Value {
    match first_non_empty([name]) {
        Some(name) => Node::entity("Person", site.id(ids, &Role::Person))
            .with("name", name)
            .into(),
        None => Value::Null,
    }
}
