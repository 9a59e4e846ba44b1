//! Field schemas and combined-schema assembly

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::options::ValidationOptions;

/// Validation rule for a single field.
///
/// The `rule` value is opaque to this crate: it is handed verbatim to the
/// validation engine as the field's JSON Schema. Required-ness lives here
/// rather than inside the rule because JSON Schema declares it at the
/// object level, not on the property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub rule: Value,
    #[serde(default)]
    pub required: bool,
}

impl FieldRule {
    /// An optional field with the given rule.
    pub fn new(rule: Value) -> Self {
        Self {
            rule,
            required: false,
        }
    }

    /// A required field with the given rule.
    pub fn required(rule: Value) -> Self {
        Self {
            rule,
            required: true,
        }
    }
}

/// Insertion-ordered mapping from field name to its validation rule.
///
/// Immutable once a model schema is defined from it; extension composes a
/// new `Fields` via [`Fields::merged_with`] without touching the base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldRule)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional field.
    pub fn field(mut self, name: impl Into<String>, rule: Value) -> Self {
        self.insert(name.into(), FieldRule::new(rule));
        self
    }

    /// Add a required field.
    pub fn required(mut self, name: impl Into<String>, rule: Value) -> Self {
        self.insert(name.into(), FieldRule::required(rule));
        self
    }

    /// Insert a rule, replacing any existing rule for the same name in
    /// place (the name keeps its original position).
    pub fn insert(&mut self, name: String, rule: FieldRule) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.entries.push((name, rule)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.entries.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Merge for extension: `other` wins on name collision, colliding names
    /// keep the base's position, new names append in their own order.
    pub fn merged_with(&self, other: &Fields) -> Fields {
        let mut merged = self.clone();
        for (name, rule) in other.iter() {
            merged.insert(name.to_owned(), rule.clone());
        }
        merged
    }
}

impl FromIterator<(String, FieldRule)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldRule)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, rule) in iter {
            fields.insert(name, rule);
        }
        fields
    }
}

/// Assemble the full object schema handed to the engine.
pub(crate) fn combined_schema(fields: &Fields, options: &ValidationOptions) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, field) in fields.iter() {
        properties.insert(name.to_owned(), field.rule.clone());
        if field.required {
            required.push(Value::String(name.to_owned()));
        }
    }

    let mut schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": properties,
        "additionalProperties": options.allow_unknown,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}
