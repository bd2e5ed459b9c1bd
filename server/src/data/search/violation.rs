//! Validation report
//!
//! Flattens `validator::ValidationErrors` into an ordered list of
//! violations, each naming the offending path, message and value.

use std::borrow::Cow;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// A single rejected input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dotted path to the rejected input (e.g. `pagination.sort.direction`)
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>, value: &str) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            value: Some(serde_json::Value::String(value.to_string())),
        }
    }

    fn from_error(path: String, error: &ValidationError) -> Self {
        Self {
            path,
            message: error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
            value: error.params.get("value").cloned(),
        }
    }
}

/// All violations found while validating one request, sorted by path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Violations at exactly this path
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.path == path)
    }

    /// Human readable summary (`path: message; ...`)
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<&ValidationErrors> for Violations {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Vec::new();
        collect("", errors, &mut out);
        out.sort_by(|a, b| a.path.cmp(&b.path));
        Self(out)
    }
}

impl From<ValidationErrors> for Violations {
    fn from(errors: ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| Violation::from_error(path.clone(), e)));
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Build a `ValidationError` carrying the rejected value
pub(crate) fn rejected(code: &'static str, message: String, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code).with_message(Cow::Owned(message));
    error.add_param(Cow::Borrowed("value"), &value);
    error
}

/// `"must be one of [a, b, c]"`
pub(crate) fn one_of_message<T: AsRef<str>>(allowed: impl IntoIterator<Item = T>) -> String {
    let joined = allowed
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("must be one of [{}]", joined)
}
