//! # Hypermedia Resources
//!
//! A [`Resource`] is one typed, identified unit of data together with the
//! hypermedia controls ([`Link`]s) a client may follow from it, any child
//! resources embedded under a relation name, and an optional lifecycle
//! `state` label.
//!
//! ## Wire Format
//!
//! ```text
//! {
//!   "type": "task",
//!   "id": "42",
//!   "properties": { "title": "Write docs" },
//!   "_links": { "self": { "href": "/tasks/42" } },
//!   "_embedded": { "subtasks": [ { ...same format... } ] },   // only if non-empty
//!   "state": "pending"                                        // only if set
//! }
//! ```
//!
//! [`Resource::to_record`] produces this shape and [`Resource::from_record`]
//! reads it back, recursing into `_embedded`. The serde impls on `Resource`
//! use the same format.
//!
//! ## Ownership
//!
//! Collection accessors (`properties()`, `links()`, `embedded()`) hand out
//! owned copies. The only way to change a resource is through its mutators.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// Method assumed when a [`Link`] does not name one.
pub const DEFAULT_LINK_METHOD: &str = "GET";

/// A named, directed hypermedia control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn templated(mut self, templated: bool) -> Self {
        self.templated = Some(templated);
        self
    }

    /// The link's method, or [`DEFAULT_LINK_METHOD`] when none is set.
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_LINK_METHOD)
    }

    fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("href".into(), Value::String(self.href.clone()));
        if let Some(method) = &self.method {
            record.insert("method".into(), Value::String(method.clone()));
        }
        if let Some(title) = &self.title {
            record.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(templated) = self.templated {
            record.insert("templated".into(), Value::Bool(templated));
        }
        Value::Object(record)
    }
}

/// A typed, identified hypermedia entity.
///
/// `(kind, id)` is the identity of a resource inside a store. Both are
/// expected to be non-empty; [`Resource::new`] does not check this; callers
/// validate their input first. [`Resource::from_record`] does reject empty
/// identity fields, since stored data is not trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: String,
    id: String,
    properties: Map<String, Value>,
    links: BTreeMap<String, Link>,
    embedded: BTreeMap<String, Vec<Resource>>,
    state: Option<String>,
}

impl Resource {
    /// Creates a resource with no properties, links, embedded children or state.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            properties: Map::new(),
            links: BTreeMap::new(),
            embedded: BTreeMap::new(),
            state: None,
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_links(mut self, links: BTreeMap<String, Link>) -> Self {
        self.links = links;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The storage key of this resource: `kind:id`.
    pub fn key(&self) -> String {
        resource_key(&self.kind, &self.id)
    }

    // --- Properties ---

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    pub fn properties(&self) -> Map<String, Value> {
        self.properties.clone()
    }

    // --- Links ---

    /// Adds a link, replacing any existing link under `rel`.
    pub fn add_link(&mut self, rel: impl Into<String>, link: Link) {
        self.links.insert(rel.into(), link);
    }

    pub fn link(&self, rel: &str) -> Option<Link> {
        self.links.get(rel).cloned()
    }

    pub fn links(&self) -> BTreeMap<String, Link> {
        self.links.clone()
    }

    pub fn clear_links(&mut self) {
        self.links.clear();
    }

    // --- Embedded ---

    /// Appends `resource` to the sequence embedded under `rel`.
    pub fn add_embedded(&mut self, rel: impl Into<String>, resource: Resource) {
        self.embedded.entry(rel.into()).or_default().push(resource);
    }

    pub fn embedded(&self, rel: &str) -> Option<Vec<Resource>> {
        self.embedded.get(rel).cloned()
    }

    pub fn embedded_all(&self) -> BTreeMap<String, Vec<Resource>> {
        self.embedded.clone()
    }

    // --- State ---

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = Some(state.into());
    }

    pub fn clear_state(&mut self) {
        self.state = None;
    }

    // --- Wire format ---

    /// Serializes into the wire record.
    ///
    /// `type`, `id`, `properties` and `_links` are always present. `state` is
    /// written only when set and `_embedded` only when at least one child exists.
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".into(), Value::String(self.kind.clone()));
        record.insert("id".into(), Value::String(self.id.clone()));
        record.insert("properties".into(), Value::Object(self.properties.clone()));

        let links = self
            .links
            .iter()
            .map(|(rel, link)| (rel.clone(), link.to_record()))
            .collect();
        record.insert("_links".into(), Value::Object(links));

        if !self.embedded.is_empty() {
            let embedded = self
                .embedded
                .iter()
                .map(|(rel, items)| {
                    let items = items.iter().map(Resource::to_record).collect();
                    (rel.clone(), Value::Array(items))
                })
                .collect();
            record.insert("_embedded".into(), Value::Object(embedded));
        }

        if let Some(state) = &self.state {
            record.insert("state".into(), Value::String(state.clone()));
        }

        Value::Object(record)
    }

    /// Reconstructs a resource from its wire record, embedded children included.
    pub fn from_record(record: Value) -> Result<Self, RecordError> {
        if !record.is_object() {
            return Err(RecordError::NotAnObject);
        }
        let record: ResourceRecord =
            serde_json::from_value(record).map_err(RecordError::Malformed)?;
        Resource::try_from(record)
    }
}

/// Builds the storage key for `(kind, id)`.
pub fn resource_key(kind: &str, id: &str) -> String {
    format!("{kind}:{id}")
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = ResourceRecord::deserialize(deserializer)?;
        Resource::try_from(record).map_err(D::Error::custom)
    }
}

/// Decoding side of the wire format.
#[derive(Deserialize)]
struct ResourceRecord {
    #[serde(rename = "type")]
    kind: String,
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(rename = "_links", default)]
    links: BTreeMap<String, Link>,
    #[serde(rename = "_embedded", default)]
    embedded: BTreeMap<String, Vec<ResourceRecord>>,
    #[serde(default)]
    state: Option<String>,
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = RecordError;

    fn try_from(record: ResourceRecord) -> Result<Self, Self::Error> {
        if record.kind.is_empty() {
            return Err(RecordError::EmptyField("type"));
        }
        if record.id.is_empty() {
            return Err(RecordError::EmptyField("id"));
        }

        let mut embedded = BTreeMap::new();
        for (rel, children) in record.embedded {
            let children = children
                .into_iter()
                .map(Resource::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            embedded.insert(rel, children);
        }

        Ok(Self {
            kind: record.kind,
            id: record.id,
            properties: record.properties,
            links: record.links,
            embedded,
            state: record.state,
        })
    }
}
