// API payload types
// Person and the structured error envelope

use serde::{Deserialize, Serialize};

/// A registered individual
///
/// Missing fields decode to their zero values so that validation, not
/// decoding, decides whether a payload is acceptable. Capitalized and
/// upper-case keys are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(alias = "Name", alias = "NAME")]
    pub name: String,
    #[serde(alias = "Age", alias = "AGE")]
    pub age: i64,
    #[serde(alias = "City", alias = "CITY", skip_serializing_if = "is_blank")]
    pub city: Option<String>,
    #[serde(alias = "Is_student", alias = "Is_Student", alias = "IS_STUDENT")]
    pub is_student: bool,
}

impl Person {
    /// The fixed record returned by `GET /api/person`
    pub fn example() -> Self {
        Self {
            name: "Alice".to_string(),
            age: 24,
            city: None,
            is_student: true,
        }
    }

    /// A person is acceptable when it has a name and a positive age
    pub fn has_required_fields(&self) -> bool {
        !self.name.is_empty() && self.age > 0
    }
}

#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Structured error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: u16, details: Option<&str>) -> Self {
        Self {
            message: message.into(),
            code,
            details: details.filter(|d| !d.is_empty()).map(ToString::to_string),
        }
    }
}
