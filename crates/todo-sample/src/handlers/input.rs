//! Tool inputs and their validation.
//!
//! Every handler input is checked here before the store is touched; the
//! resource model itself does not re-validate anything.

use std::collections::BTreeMap;

use resource_store::{Link, Resource};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Methods a link may name.
pub const LINK_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Reasons an input is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
    #[error("Type must not contain ':': {0}")]
    InvalidType(String),
    #[error("Link '{rel}' has an invalid href: {href}")]
    InvalidHref { rel: String, href: String },
    #[error("Link '{rel}' has an unsupported method: {method}")]
    InvalidMethod { rel: String, method: String },
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

// The store key is `type:id`, so a `:` in the type would alias another
// type's keys. Ids may contain `:`.
fn require_kind(kind: &str) -> Result<(), ValidationError> {
    require(kind, "type")?;
    if kind.contains(':') {
        return Err(ValidationError::InvalidType(kind.to_string()));
    }
    Ok(())
}

/// An href must be an absolute URL or an absolute path.
pub fn validate_link(rel: &str, link: &Link) -> Result<(), ValidationError> {
    let href_ok = link.href.starts_with('/') || Url::parse(&link.href).is_ok();
    if !href_ok {
        return Err(ValidationError::InvalidHref {
            rel: rel.to_string(),
            href: link.href.clone(),
        });
    }
    if let Some(method) = &link.method {
        if !LINK_METHODS.contains(&method.as_str()) {
            return Err(ValidationError::InvalidMethod {
                rel: rel.to_string(),
                method: method.clone(),
            });
        }
    }
    Ok(())
}

fn validate_links(links: &BTreeMap<String, Link>) -> Result<(), ValidationError> {
    links.iter().try_for_each(|(rel, link)| validate_link(rel, link))
}

/// Identifies one resource: `{ "type": .., "id": .. }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceRef {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_kind(&self.kind)?;
        require(&self.id, "id")
    }

    pub fn key(&self) -> String {
        resource_store::resource_key(&self.kind, &self.id)
    }
}

/// Input of `create_resource`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub links: BTreeMap<String, Link>,
    #[serde(default)]
    pub state: Option<String>,
}

impl CreateInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_kind(&self.kind)?;
        require(&self.id, "id")?;
        validate_links(&self.links)
    }

    pub fn into_resource(self) -> Resource {
        let resource = Resource::new(self.kind, self.id)
            .with_properties(self.properties)
            .with_links(self.links);
        match self.state {
            Some(state) => resource.with_state(state),
            None => resource,
        }
    }
}

/// Input of `update_resource`. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    /// Merged into the existing properties.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Replaces every existing link.
    #[serde(default)]
    pub links: Option<BTreeMap<String, Link>>,
    #[serde(default)]
    pub state: Option<String>,
}

impl UpdateInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_kind(&self.kind)?;
        require(&self.id, "id")?;
        match &self.links {
            Some(links) => validate_links(links),
            None => Ok(()),
        }
    }

    /// Applies the update through the resource's public mutators.
    pub fn apply_to(self, resource: &mut Resource) {
        if let Some(properties) = self.properties {
            for (key, value) in properties {
                resource.set_property(key, value);
            }
        }
        if let Some(links) = self.links {
            resource.clear_links();
            for (rel, link) in links {
                resource.add_link(rel, link);
            }
        }
        if let Some(state) = self.state {
            resource.set_state(state);
        }
    }
}

/// Input of `list_resources`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListInput {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ListInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_kind(&self.kind)
    }
}
