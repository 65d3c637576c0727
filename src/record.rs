//! Marker records as delivered by the marker registry.
//!
//! Only `id` and `tags` are interpreted; every other field is kept verbatim
//! in [`MarkerRecord::extra`]. Feeds arrive either as a JSON array of
//! records or as an object keyed by marker id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::migrate_marker_id;

/// Field names accepted for the marker id, in order of preference.
const ID_FIELDS: &[&str] = &["id", "marker_id", "_id"];

/// A marker definition reduced to what the absence engine needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub id: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Fields opaque to this crate
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl MarkerRecord {
    pub fn new<I, T>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: Some(id.into()),
            tags: Some(tags.into_iter().map(Into::into).collect()),
            extra: BTreeMap::new(),
        }
    }

    /// Build a record from a loosely shaped JSON object.
    ///
    /// Non-string ids are ignored, non-string tag entries are skipped. Legacy
    /// id prefixes are migrated (see [`migrate_marker_id`]).
    pub fn from_json_object(mut object: Map<String, Value>) -> Self {
        let mut id = None;
        for field in ID_FIELDS {
            if let Some(Value::String(value)) = object.remove(*field) {
                if id.is_none() && !value.is_empty() {
                    id = Some(migrate_marker_id(&value));
                }
            }
        }

        let tags = match object.remove("tags") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(tag) => Some(tag),
                        _ => None,
                    })
                    .collect(),
            ),
            Some(Value::String(tag)) => Some(vec![tag]),
            _ => None,
        };

        Self {
            id,
            tags,
            extra: object.into_iter().collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Error)]
pub enum RegistryFeedError {
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("registry feed must be an array or an object, found {0}")]
    Shape(&'static str),
}

/// A collection of marker records from the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerRegistryFeed {
    pub records: Vec<MarkerRecord>,
}

impl MarkerRegistryFeed {
    pub fn new(records: Vec<MarkerRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON feed.
    ///
    /// An object feed is keyed by marker id; a record inside it without its
    /// own id takes the key. Entries that are not objects are skipped.
    pub fn from_json_str(input: &str) -> Result<Self, RegistryFeedError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, RegistryFeedError> {
        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(object) => Some(MarkerRecord::from_json_object(object)),
                    _ => None,
                })
                .collect(),
            Value::Object(entries) => entries
                .into_iter()
                .filter_map(|(key, item)| match item {
                    Value::Object(object) => {
                        let mut record = MarkerRecord::from_json_object(object);
                        if record.id.is_none() {
                            record.id = Some(migrate_marker_id(&key));
                        }
                        Some(record)
                    }
                    _ => None,
                })
                .collect(),
            Value::Null => return Err(RegistryFeedError::Shape("null")),
            Value::Bool(_) => return Err(RegistryFeedError::Shape("boolean")),
            Value::Number(_) => return Err(RegistryFeedError::Shape("number")),
            Value::String(_) => return Err(RegistryFeedError::Shape("string")),
        };
        Ok(Self { records })
    }

    pub fn records(&self) -> &[MarkerRecord] {
        &self.records
    }
}

impl From<Vec<MarkerRecord>> for MarkerRegistryFeed {
    fn from(records: Vec<MarkerRecord>) -> Self {
        Self::new(records)
    }
}
