//! Schema validation for payloads extracted from model output

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::{FieldKind, FieldSchema, ParsedPayload};

/// Reason a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorReason {
    Missing,
    NotInEnum,
    OutOfRange,
    NotNumeric,
    UnexpectedField,
    /// Value has the wrong JSON type; carries the expected type
    WrongType(&'static str),
    /// String field that must not be blank
    Empty,
}

impl fmt::Display for FieldErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorReason::Missing => write!(f, "missing"),
            FieldErrorReason::NotInEnum => write!(f, "not in enum"),
            FieldErrorReason::OutOfRange => write!(f, "out of range"),
            FieldErrorReason::NotNumeric => write!(f, "not numeric"),
            FieldErrorReason::UnexpectedField => write!(f, "unexpected field"),
            FieldErrorReason::WrongType(expected) => write!(f, "expected {}", expected),
            FieldErrorReason::Empty => write!(f, "empty"),
        }
    }
}

/// Validation error for one field. Nested fields use a dotted path such as `sources.0.url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: FieldErrorReason,
}

impl FieldError {
    pub fn new<S: Into<String>>(field: S, reason: FieldErrorReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    /// Whether the error comes from inside a nested object or list
    pub fn is_nested(&self) -> bool {
        self.field.contains('.')
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field error found in one validation pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", format_errors(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationFailure {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str, reason: &FieldErrorReason) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && &e.reason == reason)
    }
}

/// A payload that satisfied its schema, with defaults filled in.
///
/// Only [`SchemaValidator::validate`] can build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRecord {
    fields: Map<String, Value>,
}

impl ValidatedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Convert the record into a typed struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// Validates extracted payloads against a [`FieldSchema`].
///
/// All errors are collected in one pass so a caller can build a single
/// corrective prompt.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    /// Treat the top-level schema as strict even when it is not declared so
    force_strict: bool,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.force_strict = strict;
        self
    }

    pub fn validate(
        &self,
        payload: &ParsedPayload,
        schema: &FieldSchema,
    ) -> Result<ValidatedRecord, ValidationFailure> {
        let mut errors = Vec::new();
        let fields = validate_object(payload, schema, self.force_strict, "", &mut errors);

        if errors.is_empty() {
            log::debug!("Payload satisfied schema with {} fields", fields.len());
            Ok(ValidatedRecord { fields })
        } else {
            log::debug!("Payload failed validation with {} errors", errors.len());
            Err(ValidationFailure { errors })
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_object(
    payload: &Map<String, Value>,
    schema: &FieldSchema,
    force_strict: bool,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Map<String, Value> {
    let mut record = Map::new();

    for spec in schema.fields() {
        let path = join_path(prefix, &spec.name);
        match payload.get(&spec.name) {
            None if spec.required => errors.push(FieldError::new(path, FieldErrorReason::Missing)),
            None => {
                record.insert(spec.name.clone(), spec.default_value());
            }
            Some(Value::Null) if spec.nullable => {
                record.insert(spec.name.clone(), Value::Null);
            }
            Some(value) => {
                let checked = validate_value(value, &spec.kind, &path, errors);
                record.insert(spec.name.clone(), checked);
            }
        }
    }

    if force_strict || schema.is_strict() {
        for key in payload.keys().filter(|key| !schema.is_declared(key)) {
            errors.push(FieldError::new(
                join_path(prefix, key),
                FieldErrorReason::UnexpectedField,
            ));
        }
    }

    record
}

/// Check one value, returning it normalized. Errors are pushed, never returned.
fn validate_value(value: &Value, kind: &FieldKind, path: &str, errors: &mut Vec<FieldError>) -> Value {
    match kind {
        FieldKind::Any => value.clone(),
        FieldKind::String { allow_empty } => match value {
            Value::String(s) if !allow_empty && s.trim().is_empty() => {
                errors.push(FieldError::new(path, FieldErrorReason::Empty));
                value.clone()
            }
            Value::String(_) => value.clone(),
            _ => {
                errors.push(FieldError::new(path, FieldErrorReason::WrongType("string")));
                value.clone()
            }
        },
        FieldKind::Enum(allowed) => {
            let matches = value
                .as_str()
                .map(|s| allowed.iter().any(|literal| literal == s))
                .unwrap_or(false);
            if !matches {
                errors.push(FieldError::new(path, FieldErrorReason::NotInEnum));
            }
            value.clone()
        }
        FieldKind::Float(range) => match as_float(value) {
            None => {
                errors.push(FieldError::new(path, FieldErrorReason::NotNumeric));
                value.clone()
            }
            Some(number) => {
                if let Some(range) = range {
                    if !range.contains(&number) {
                        errors.push(FieldError::new(path, FieldErrorReason::OutOfRange));
                    }
                }
                normalize_number(value, number)
            }
        },
        FieldKind::Bool => {
            if !value.is_boolean() {
                errors.push(FieldError::new(path, FieldErrorReason::WrongType("boolean")));
            }
            value.clone()
        }
        FieldKind::List(element) => match value {
            Value::Array(items) => match element {
                Some(element) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            validate_value(item, element, &join_path(path, &i.to_string()), errors)
                        })
                        .collect(),
                ),
                None => value.clone(),
            },
            _ => {
                errors.push(FieldError::new(path, FieldErrorReason::WrongType("list")));
                value.clone()
            }
        },
        FieldKind::Map(value_kind) => match value {
            Value::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, entry)| {
                        let checked = validate_value(entry, value_kind, &join_path(path, key), errors);
                        (key.clone(), checked)
                    })
                    .collect(),
            ),
            _ => {
                errors.push(FieldError::new(path, FieldErrorReason::WrongType("object")));
                value.clone()
            }
        },
        FieldKind::Object(nested) => match value {
            Value::Object(entries) => Value::Object(validate_object(entries, nested, false, path, errors)),
            _ => {
                errors.push(FieldError::new(path, FieldErrorReason::WrongType("object")));
                value.clone()
            }
        },
    }
}

/// Numbers, or strings holding a finite number
fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Numeric strings become JSON numbers; numbers are kept as given
fn normalize_number(value: &Value, number: f64) -> Value {
    match value {
        Value::String(_) => Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}
