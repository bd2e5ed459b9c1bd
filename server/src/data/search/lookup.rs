//! Column lookup: a `(field, operator, value)` triple scoped to one resource

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::operator::Operator;
use super::resources::{ColumnKind, Resource};
use super::violation::{one_of_message, rejected};

/// Filter on a single whitelisted column of resource `R`.
///
/// Deserialized as-is from the request; nothing is checked until
/// [`Validate::validate`] runs.
#[derive(Deserialize)]
#[serde(bound = "")]
pub struct ColumnLookup<R> {
    field: String,
    operator: Operator,
    value: String,
    #[serde(skip)]
    resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ColumnLookup<R> {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            resource: PhantomData,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The value exactly as the caller sent it
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value to bind, after the operator's transform
    pub fn lookup_value(&self) -> String {
        self.operator.lookup_value(&self.value)
    }
}

impl<R> Clone for ColumnLookup<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            operator: self.operator,
            value: self.value.clone(),
            resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for ColumnLookup<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnLookup")
            .field("field", &self.field)
            .field("operator", &self.operator)
            .field("value", &self.value)
            .finish()
    }
}

impl<R: Resource> Validate for ColumnLookup<R> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let spec = &R::SPEC;
        let mut errors = ValidationErrors::new();

        let column = spec.field(&self.field);
        if column.is_none() {
            errors.add(
                "field",
                rejected(
                    "field_not_allowed",
                    one_of_message(spec.field_names()),
                    &self.field,
                ),
            );
        }

        let operator_allowed = spec.allows(self.operator);
        if !operator_allowed {
            errors.add(
                "operator",
                rejected(
                    "operator_not_allowed",
                    one_of_message(spec.operators.iter().map(|op| op.as_str())),
                    self.operator.as_str(),
                ),
            );
        }

        if let Some(column) = column
            && operator_allowed
            && column.kind == ColumnKind::Integer
            && !self.operator.is_pattern()
            && self.value.parse::<i64>().is_err()
        {
            errors.add(
                "value",
                rejected(
                    "value_not_integer",
                    "must be an integer".to_string(),
                    &self.value,
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
