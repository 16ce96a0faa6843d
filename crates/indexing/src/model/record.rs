//! The parsed record.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::choice::ChoiceValue;
use super::datatypes::Meta;
use crate::error::ParseError;
use crate::types::RecordIdentity;

/// A parsed record with typed access to its elements.
///
/// The body is kept as a JSON object; elements are read by path and
/// deserialized into the typed datatypes on demand. Arrays along a path are
/// flattened, so `name.given` yields every given name of every name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: String,
    id: Option<String>,
    meta: Meta,
    body: Map<String, Value>,
}

impl Record {
    /// Builds a record from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let Value::Object(body) = value else {
            return Err(ParseError::NotAnObject);
        };

        let kind = body
            .get("resourceType")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .ok_or(ParseError::MissingResourceType)?
            .to_string();

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let meta = match body.get("meta") {
            Some(meta) => serde_json::from_value(meta.clone()).unwrap_or_else(|e| {
                tracing::debug!(kind = %kind, error = %e, "Malformed meta element, ignoring");
                Meta::default()
            }),
            None => Meta::default(),
        };

        Ok(Self {
            kind,
            id,
            meta,
            body,
        })
    }

    /// The record's kind (`resourceType`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The record's logical id, if present.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The record's metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The raw JSON body.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// The record's own identity, when it carries an id.
    pub fn identity(&self) -> Option<RecordIdentity> {
        self.id().map(|id| RecordIdentity::new(&self.kind, id))
    }

    /// Returns every JSON node reached by `path`, flattening arrays.
    pub fn nodes(&self, path: &[&str]) -> Vec<&Value> {
        select_in(&self.body, path)
    }

    /// Returns every element at `path` deserialized as `T`.
    ///
    /// Elements that do not deserialize are skipped.
    pub fn values<T: DeserializeOwned>(&self, path: &[&str]) -> Vec<T> {
        typed_values(self.nodes(path), path)
    }

    /// Returns every string at `path`.
    pub fn strings(&self, path: &[&str]) -> Vec<&str> {
        self.nodes(path).into_iter().filter_map(Value::as_str).collect()
    }

    /// Reads the choice element `name` from every object at `parent`.
    ///
    /// An empty `parent` reads from the record itself.
    pub fn choices(&self, parent: &[&str], name: &str) -> Vec<ChoiceValue> {
        if parent.is_empty() {
            return ChoiceValue::read(&self.body, name).into_iter().collect();
        }
        self.nodes(parent)
            .into_iter()
            .filter_map(Value::as_object)
            .filter_map(|object| ChoiceValue::read(object, name))
            .collect()
    }
}

/// Selects every node reached by `path` from `node`, flattening arrays.
pub fn select<'a>(node: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut out = Vec::new();
    collect(node, path, &mut out);
    out
}

fn select_in<'a>(object: &'a Map<String, Value>, path: &[&str]) -> Vec<&'a Value> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if let Some(child) = object.get(*first) {
        collect(child, rest, &mut out);
    }
    out
}

fn collect<'a>(node: &'a Value, path: &[&str], out: &mut Vec<&'a Value>) {
    match node {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                collect(item, path, out);
            }
        }
        _ => match path.split_first() {
            None => out.push(node),
            Some((first, rest)) => {
                if let Some(child) = node.get(*first) {
                    collect(child, rest, out);
                }
            }
        },
    }
}

/// Deserializes each node as `T`, skipping malformed ones.
pub fn typed_values<T: DeserializeOwned>(nodes: Vec<&Value>, path: &[&str]) -> Vec<T> {
    nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value(node.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(
                    path = %path.join("."),
                    error = %e,
                    "Malformed element, skipping"
                );
                None
            }
        })
        .collect()
}
