//! Validation configuration

use serde::{Deserialize, Serialize};

/// Options controlling how a model schema validates input.
///
/// The defaults are strict: unknown fields are rejected and every
/// violation is collected into the error. Options are passed through to
/// the engine as-is; they never alter the field rules themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Accept fields the schema does not declare.
    pub allow_unknown: bool,
    /// Report only the first violation instead of all of them.
    pub abort_early: bool,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept fields the schema does not declare.
    pub fn with_allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Stop at the first violation instead of collecting all of them.
    pub fn with_abort_early(mut self, abort: bool) -> Self {
        self.abort_early = abort;
        self
    }
}
