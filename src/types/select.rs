//! Selectable references to external entities (jobsites, cost codes, equipment, trucks)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A generic selectable reference to an external entity.
///
/// Once selected, an option is never edited in place; reselecting replaces
/// the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    /// Identifier in the backing system
    pub id: String,
    /// Human-readable name shown in dropdowns
    pub label: String,
    /// Short code (QR payload, cost code number, equipment tag)
    pub code: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            code: code.into(),
        }
    }

    /// Display form used in logs and CLI output, e.g. "J-104 (North Yard)"
    pub fn display(&self) -> String {
        if self.label.is_empty() {
            self.code.clone()
        } else {
            format!("{} ({})", self.code, self.label)
        }
    }
}
