//! Model schemas and validated instances

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ErrorIterator, JSONSchema};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{ModelError, Result, ValidationFailure, Violation};
use crate::options::ValidationOptions;
use crate::schema::{combined_schema, Fields};

/// Define a model schema from a field mapping and validation options.
///
/// Free-function form of [`ModelSchema::define`].
pub fn define(fields: Fields, options: ValidationOptions) -> Result<ModelSchema> {
    ModelSchema::define(fields, options)
}

struct SchemaInner {
    fields: Fields,
    options: ValidationOptions,
    combined: Value,
    object_validator: JSONSchema,
    field_validators: HashMap<String, JSONSchema>,
}

/// A reified model type: a field schema plus validation configuration,
/// compiled against the engine once at definition time.
///
/// Cloning is cheap; clones share the compiled validators. The schema is
/// immutable after definition — [`ModelSchema::extend`] composes a new,
/// independent schema rather than mutating this one.
#[derive(Clone)]
pub struct ModelSchema {
    inner: Arc<SchemaInner>,
}

impl ModelSchema {
    /// Define a model schema.
    ///
    /// The field mapping must be non-empty. Every field rule and the
    /// combined object schema are compiled up front, so a rule the engine
    /// rejects fails here rather than at first validation.
    pub fn define(fields: Fields, options: ValidationOptions) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptySchema);
        }

        let mut field_validators = HashMap::with_capacity(fields.len());
        for (name, field) in fields.iter() {
            let validator = compile(&field.rule).map_err(|message| ModelError::InvalidRule {
                field: name.to_owned(),
                message,
            })?;
            field_validators.insert(name.to_owned(), validator);
        }

        let combined = combined_schema(&fields, &options);
        let object_validator = compile(&combined).map_err(ModelError::InvalidSchema)?;

        debug!(field_count = fields.len(), "defined model schema");
        Ok(Self {
            inner: Arc::new(SchemaInner {
                fields,
                options,
                combined,
                object_validator,
                field_validators,
            }),
        })
    }

    /// Validate `input` against the full combined schema without building
    /// an instance. Returns the validated field mapping.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>> {
        self.check(&self.inner.object_validator, input, None)?;
        match input {
            Value::Object(map) => Ok(map.clone()),
            // the combined schema requires an object
            _ => Err(ValidationFailure::single(None, "input must be an object").into()),
        }
    }

    /// Validate `input` and build a model instance from it.
    pub fn instantiate(&self, input: Value) -> Result<Model> {
        let values = self.validate(&input)?;
        trace!(field_count = values.len(), "instantiated model");
        Ok(Model {
            schema: self.clone(),
            values,
        })
    }

    /// Build an instance from no input at all. Fails when any field is
    /// required.
    pub fn instantiate_empty(&self) -> Result<Model> {
        self.instantiate(Value::Object(Map::new()))
    }

    /// Compose a new schema: this schema's fields with `additional` merged
    /// in (additional wins on name collision) under `options`. The base
    /// schema is untouched.
    ///
    /// The new schema's options are exactly `options`; they do not merge
    /// with the base's.
    pub fn extend(&self, additional: Fields, options: ValidationOptions) -> Result<ModelSchema> {
        let merged = self.inner.fields.merged_with(&additional);
        debug!(
            base_fields = self.inner.fields.len(),
            merged_fields = merged.len(),
            "extending model schema"
        );
        ModelSchema::define(merged, options)
    }

    /// The full combined schema as the engine sees it.
    pub fn as_value(&self) -> &Value {
        &self.inner.combined
    }

    pub fn fields(&self) -> &Fields {
        &self.inner.fields
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.inner.options
    }

    fn check(&self, validator: &JSONSchema, value: &Value, field: Option<&str>) -> Result<()> {
        let mut violations = match validator.validate(value) {
            Ok(()) => return Ok(()),
            Err(errors) => collect_violations(errors, field),
        };
        if self.inner.options.abort_early {
            violations.truncate(1);
        }
        trace!(violation_count = violations.len(), "validation failed");
        Err(ValidationFailure::new(violations).into())
    }
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("fields", &self.inner.fields)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// A validated model instance.
///
/// Holds a private mapping of field values; every stored value satisfied
/// its rule at the moment it was last set. Instances serialize as their
/// plain field mapping.
#[derive(Debug, Clone)]
pub struct Model {
    schema: ModelSchema,
    values: Map<String, Value>,
}

impl Model {
    /// Validate `input` against `schema` and build an instance.
    pub fn new(schema: &ModelSchema, input: Value) -> Result<Self> {
        schema.instantiate(input)
    }

    /// Current value of `field`, or `None` when unset.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Validate `value` against `field`'s own rule and store it.
    ///
    /// On failure the previously stored value is left unchanged. Setting a
    /// field the schema does not declare is itself a validation failure.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        let Some(validator) = self.schema.inner.field_validators.get(field) else {
            return Err(ValidationFailure::single(
                Some(field.to_owned()),
                format!("\"{field}\" is not allowed"),
            )
            .into());
        };
        self.schema.check(validator, &value, Some(field))?;
        self.values.insert(field.to_owned(), value);
        Ok(())
    }

    /// Detached snapshot of the current field values.
    ///
    /// Mutating the returned value never affects the instance.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// The schema this instance was built from.
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// Iterate the currently stored field values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

fn compile(schema: &Value) -> std::result::Result<JSONSchema, String> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|err| err.to_string())
}

fn collect_violations(errors: ErrorIterator<'_>, field_context: Option<&str>) -> Vec<Violation> {
    let mut violations = Vec::new();
    for error in errors {
        match &error.kind {
            ValidationErrorKind::Required { property } => {
                violations.push(Violation {
                    field: property.as_str().map(str::to_owned),
                    message: format!("{property} is required"),
                });
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                for name in unexpected {
                    violations.push(Violation {
                        field: Some(name.clone()),
                        message: format!("\"{name}\" is not allowed"),
                    });
                }
            }
            _ => {
                let field = field_context
                    .map(str::to_owned)
                    .or_else(|| leading_segment(&error.instance_path.to_string()));
                let message = match &field {
                    Some(name) => format!("\"{name}\": {error}"),
                    None => error.to_string(),
                };
                violations.push(Violation { field, message });
            }
        }
    }
    violations
}

/// First segment of a JSON pointer, e.g. `/name/0` -> `name`.
fn leading_segment(pointer: &str) -> Option<String> {
    let rest = pointer.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    (!segment.is_empty()).then(|| segment.to_owned())
}
