//! Validated model types driven by declarative field schemas.
//!
//! A model schema maps field names to validation rules (JSON Schema
//! values, interpreted by the `jsonschema` engine) plus a set of
//! validation options. From it, instances are constructed by validating a
//! full input object; thereafter every per-field write re-validates the
//! new value against that field's own rule, so an instance never holds a
//! value that did not satisfy its schema when it was stored.
//!
//! Schemas compose by extension: [`ModelSchema::extend`] merges additional
//! fields into the base's (the extension wins on name collision) and
//! produces a new, independent schema — the base is never mutated.
//!
//! ```
//! use schema_model::{define, Fields, ValidationOptions};
//! use serde_json::json;
//!
//! let person = define(
//!     Fields::new()
//!         .required("name", json!({"type": "string"}))
//!         .field("age", json!({"type": "number"})),
//!     ValidationOptions::default(),
//! )?;
//!
//! let mut model = person.instantiate(json!({"name": "some-name", "age": 12345}))?;
//! assert_eq!(model.get("name"), Some(&json!("some-name")));
//!
//! model.set("age", json!(54321))?;
//! assert_eq!(model.to_json(), json!({"name": "some-name", "age": 54321}));
//!
//! assert!(model.set("age", json!("not a number")).is_err());
//! # Ok::<(), schema_model::ModelError>(())
//! ```

pub mod error;
pub mod model;
pub mod options;
pub mod schema;

pub use error::{ModelError, Result, ValidationFailure, Violation};
pub use model::{define, Model, ModelSchema};
pub use options::ValidationOptions;
pub use schema::{FieldRule, Fields};
