//! Declarative description of the fields expected in a structured reply

use std::ops::RangeInclusive;

use serde_json::Value;

/// Constraint on the value of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A JSON string, optionally required to be non-blank
    String { allow_empty: bool },
    /// One of the listed string literals, compared case-sensitively
    Enum(Vec<String>),
    /// A number, or a string convertible to one, within the inclusive range if given
    Float(Option<RangeInclusive<f64>>),
    Bool,
    /// A JSON array whose elements satisfy the element kind if given
    List(Option<Box<FieldKind>>),
    /// A JSON object with arbitrary keys whose values all satisfy the kind
    Map(Box<FieldKind>),
    /// A JSON object validated against a nested schema
    Object(FieldSchema),
    Any,
}

impl FieldKind {
    pub fn string() -> Self {
        FieldKind::String { allow_empty: true }
    }

    pub fn non_empty_string() -> Self {
        FieldKind::String { allow_empty: false }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn float() -> Self {
        FieldKind::Float(None)
    }

    pub fn float_in(lo: f64, hi: f64) -> Self {
        FieldKind::Float(Some(lo..=hi))
    }

    pub fn list() -> Self {
        FieldKind::List(None)
    }

    pub fn list_of(element: FieldKind) -> Self {
        FieldKind::List(Some(Box::new(element)))
    }

    pub fn map_of(value: FieldKind) -> Self {
        FieldKind::Map(Box::new(value))
    }

    pub fn object(schema: FieldSchema) -> Self {
        FieldKind::Object(schema)
    }
}

/// Declaration of one expected field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub kind: FieldKind,
    /// Value used when an optional field is absent; `null` when not set
    pub default: Option<Value>,
    /// Accept an explicit `null` regardless of kind
    pub nullable: bool,
}

impl FieldSpec {
    pub fn required<S: Into<String>>(name: S, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind,
            default: None,
            nullable: false,
        }
    }

    pub fn optional<S: Into<String>>(name: S, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value filled in when the field is absent from the payload
    pub fn default_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

/// Ordered set of field declarations for one structured reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
    strict: bool,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field declaration. A later declaration with the same name replaces the earlier one.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    pub fn required<S: Into<String>>(self, name: S, kind: FieldKind) -> Self {
        self.field(FieldSpec::required(name, kind))
    }

    pub fn optional<S: Into<String>>(self, name: S, kind: FieldKind) -> Self {
        self.field(FieldSpec::optional(name, kind))
    }

    pub fn optional_with_default<S: Into<String>>(self, name: S, kind: FieldKind, default: Value) -> Self {
        self.field(FieldSpec::optional(name, kind).with_default(default))
    }

    /// Reject keys that are not declared
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}
