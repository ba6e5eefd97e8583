use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub const PERSON_ENTITY: &str = "Person";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Integer,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::String => write!(f, "string"),
            AttributeKind::Integer => write!(f, "integer"),
        }
    }
}

/// Stored untagged so a row serializes as `{"name": "Robin", "age": 30}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    String(String),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::String(_) => AttributeKind::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Integer(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::String(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescription {
    pub name: String,
    pub kind: AttributeKind,
    pub optional: bool,
}

impl AttributeDescription {
    pub fn required(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            optional: false,
        }
    }

    pub fn optional(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            optional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescription {
    pub name: String,
    pub attributes: Vec<AttributeDescription>,
}

impl EntityDescription {
    pub fn new(name: &str, attributes: Vec<AttributeDescription>) -> Self {
        Self {
            name: name.to_string(),
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &AttributeDescription> {
        self.attributes.iter().filter(|a| !a.optional)
    }
}

/// The set of entities a persistence context knows how to create.
#[derive(Debug, Clone, Default)]
pub struct ManagedObjectModel {
    entities: BTreeMap<String, EntityDescription>,
}

impl ManagedObjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: EntityDescription) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Model holding the `Person` entity: `name` (string) and `age` (integer), both required.
    pub fn person() -> Self {
        Self::new().with_entity(EntityDescription::new(
            PERSON_ENTITY,
            vec![
                AttributeDescription::required("name", AttributeKind::String),
                AttributeDescription::required("age", AttributeKind::Integer),
            ],
        ))
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDescription> {
        self.entities.get(name)
    }
}

/// A row as backing storage holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: ObjectId,
    pub entity: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub saved_at: DateTime<Utc>,
}
