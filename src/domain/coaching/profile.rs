//! User profile supplied alongside each coaching request.
//!
//! The profile is trusted as sent by the caller. Fields are neither required
//! nor type-checked: a missing field renders as an empty value in the prompt,
//! and a field of an unexpected JSON type renders as that JSON value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Any JSON value a caller may put in a profile field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Number(f64),
    Flag(bool),
    Text(String),
    List(Vec<ProfileValue>),
    Other(serde_json::Value),
}

impl ProfileValue {
    /// True for values that render as nothing: null, `""` and `[]`.
    pub fn is_blank(&self) -> bool {
        match self {
            ProfileValue::Text(s) => s.is_empty(),
            ProfileValue::List(items) => items.is_empty(),
            ProfileValue::Other(value) => value.is_null(),
            ProfileValue::Number(_) | ProfileValue::Flag(_) => false,
        }
    }
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Number(n) => write!(f, "{}", n),
            ProfileValue::Flag(b) => write!(f, "{}", b),
            ProfileValue::Text(s) => f.write_str(s),
            ProfileValue::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(", "))
            }
            ProfileValue::Other(serde_json::Value::Null) => Ok(()),
            ProfileValue::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for ProfileValue {
    fn from(n: f64) -> Self {
        ProfileValue::Number(n)
    }
}

impl From<bool> for ProfileValue {
    fn from(b: bool) -> Self {
        ProfileValue::Flag(b)
    }
}

impl From<&str> for ProfileValue {
    fn from(s: &str) -> Self {
        ProfileValue::Text(s.to_string())
    }
}

impl<T: Into<ProfileValue>> From<Vec<T>> for ProfileValue {
    fn from(items: Vec<T>) -> Self {
        ProfileValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Read-only profile attached to one coaching request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub age: Option<ProfileValue>,
    #[serde(default)]
    pub gender: Option<ProfileValue>,
    #[serde(default)]
    pub height_cm: Option<ProfileValue>,
    #[serde(default)]
    pub weight_kg: Option<ProfileValue>,
    #[serde(default)]
    pub goal: Option<ProfileValue>,
    #[serde(default)]
    pub activity_level: Option<ProfileValue>,
    #[serde(default)]
    pub diet_type: Option<ProfileValue>,
    /// Usually a list of strings; any other value renders as itself.
    #[serde(default)]
    pub medical_conditions: Option<ProfileValue>,
}

/// Sentinel rendered when no medical conditions are listed.
pub const NO_MEDICAL_CONDITIONS: &str = "None";

impl UserProfile {
    /// Medical conditions as a comma list, or `"None"` when there are none.
    pub fn medical_conditions_text(&self) -> String {
        match &self.medical_conditions {
            Some(conditions) if !conditions.is_blank() => conditions.to_string(),
            _ => NO_MEDICAL_CONDITIONS.to_string(),
        }
    }
}

/// Renders an optional field, empty when absent.
pub(crate) fn render<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
