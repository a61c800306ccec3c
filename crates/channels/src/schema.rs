//! Declarative config schemas for notification types.
//!
//! A schema is a static table of [`FieldSpec`]s. Validation walks the table
//! against an untrusted JSON object and collects every violation; defaults
//! and trimming are applied by the accessors on [`FieldSpec`].

use {
    serde::Serialize,
    serde_json::{Map, Value},
};

/// Semantic type of a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Boolean,
    /// A string that is either empty or an absolute http(s) URL.
    Url,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Url => "url",
        }
    }
}

/// Default value of a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Str(&'static str),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.to_string()),
            Self::Bool(b) => Value::Bool(b),
        }
    }
}

/// One recognized config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Label shown next to the field in forms.
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
}

/// A single config violation, always tied to a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    MissingRequiredField { field: &'static str },
    #[error("{field} has the wrong type, expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{field} is not a valid HTTP or HTTPS URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { field }
            | Self::InvalidType { field, .. }
            | Self::InvalidUrl { field, .. } => field,
        }
    }
}

/// Name of the immutable type tag carried in serialized configs.
pub const TYPE_FIELD: &str = "type";

/// `null` counts as absent: forms send it for cleared inputs.
fn present<'a>(candidate: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    candidate.get(name).filter(|v| !v.is_null())
}

impl FieldSpec {
    /// Check this field against the candidate, pushing any violation.
    fn check(&self, candidate: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
        let Some(value) = present(candidate, self.name) else {
            if self.required {
                errors.push(ValidationError::MissingRequiredField { field: self.name });
            }
            return;
        };

        match self.kind {
            FieldKind::Boolean => {
                if !value.is_boolean() {
                    errors.push(ValidationError::InvalidType {
                        field: self.name,
                        expected: self.kind.as_str(),
                    });
                }
            },
            FieldKind::String | FieldKind::Url => {
                let Some(raw) = value.as_str() else {
                    errors.push(ValidationError::InvalidType {
                        field: self.name,
                        expected: FieldKind::String.as_str(),
                    });
                    return;
                };
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    if self.required {
                        errors.push(ValidationError::MissingRequiredField { field: self.name });
                    }
                    return;
                }
                if self.kind == FieldKind::Url
                    && let Err(reason) = check_url(trimmed)
                {
                    errors.push(ValidationError::InvalidUrl {
                        field: self.name,
                        reason,
                    });
                }
            },
        }
    }

    /// Trimmed string value, or the default when absent or mistyped.
    pub fn string_or_default(&self, candidate: &Map<String, Value>) -> String {
        match (present(candidate, self.name).and_then(Value::as_str), self.default) {
            (Some(s), _) => s.trim().to_string(),
            (None, FieldDefault::Str(d)) => d.to_string(),
            (None, FieldDefault::Bool(_)) => String::new(),
        }
    }

    /// Boolean value, or the default when absent or mistyped.
    pub fn bool_or_default(&self, candidate: &Map<String, Value>) -> bool {
        match (present(candidate, self.name).and_then(Value::as_bool), self.default) {
            (Some(b), _) => b,
            (None, FieldDefault::Bool(d)) => d,
            (None, FieldDefault::Str(_)) => false,
        }
    }
}

/// Parse an absolute URL and require an http(s) scheme.
pub fn check_url(raw: &str) -> Result<url::Url, String> {
    let parsed = url::Url::parse(raw).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(format!("unsupported scheme \"{other}\"")),
    }
}

/// Validate `candidate` against `schema`, collecting every violation.
///
/// When `type_id` is given, a `type` key with any other value is rejected.
pub fn validate(
    schema: &[FieldSpec],
    type_id: Option<&'static str>,
    candidate: &Map<String, Value>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(type_id) = type_id
        && let Some(tag) = present(candidate, TYPE_FIELD)
        && tag.as_str() != Some(type_id)
    {
        errors.push(ValidationError::InvalidType {
            field: TYPE_FIELD,
            expected: type_id,
        });
    }
    for spec in schema {
        spec.check(candidate, &mut errors);
    }
    errors
}

/// Object holding every field's default value.
pub fn defaults(schema: &[FieldSpec]) -> Map<String, Value> {
    schema
        .iter()
        .map(|spec| (spec.name.to_string(), spec.default.to_value()))
        .collect()
}

/// Defaults filled and strings trimmed; unknown keys dropped.
pub fn normalize(schema: &[FieldSpec], candidate: &Map<String, Value>) -> Map<String, Value> {
    schema
        .iter()
        .map(|spec| {
            let value = match spec.kind {
                FieldKind::Boolean => Value::Bool(spec.bool_or_default(candidate)),
                FieldKind::String | FieldKind::Url => {
                    Value::String(spec.string_or_default(candidate))
                },
            };
            (spec.name.to_string(), value)
        })
        .collect()
}
