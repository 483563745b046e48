//! Structural rules for course documents.
//!
//! A document shape is declared as a tree of [`Shape`] values and checked
//! by a single recursive walk over a parsed `serde_yaml::Value`. Every
//! violation is collected; the walk never stops at the first one.

use crate::paths;
use chrono::NaiveDate;
use serde_yaml::Value;

// ---------------------------------------------------------------------------
// Shape / Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Str,
    /// A string or a number (identifiers are often written unquoted).
    Scalar,
    /// `YYYY-MM-DD`
    Date,
    AppName,
    Seq(&'static Shape),
    Map(&'static [Field]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub shape: Shape,
}

impl Field {
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            required: true,
            shape,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            required: false,
            shape,
        }
    }
}

/// A single structural violation at `field` (dotted path, empty for the
/// document root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Document shapes
// ---------------------------------------------------------------------------

pub const OPENSHIFT: Shape = Shape::Map(&[
    Field::required("app_name", Shape::AppName),
    Field::optional("domain", Shape::Str),
    Field::optional("cartridge", Shape::Str),
]);

pub const COURSE_CONFIG: Shape = Shape::Map(&[Field::required(
    "course",
    Shape::Map(&[
        Field::required("name", Shape::Str),
        Field::optional("openshift", OPENSHIFT),
    ]),
)]);

pub const ASSIGNMENT: Shape = Shape::Map(&[
    Field::required("id", Shape::Scalar),
    Field::optional("title", Shape::Str),
    Field::optional("due", Shape::Date),
]);

pub const ASSIGNMENT_CATALOG: Shape = Shape::Seq(&ASSIGNMENT);

pub const SUBMISSION: Shape = Shape::Map(&[
    Field::required("assignment", Shape::Scalar),
    Field::required("status", Shape::Str),
    Field::optional("url", Shape::Str),
]);

pub const PARTICIPANT: Shape = Shape::Map(&[
    Field::required("name", Shape::Str),
    Field::required("id", Shape::Scalar),
    Field::optional("irc", Shape::Str),
    Field::optional("github", Shape::Str),
    Field::optional("blog", Shape::Str),
    Field::optional("feed", Shape::Str),
    Field::optional("bio", Shape::Str),
    Field::optional("forges", Shape::Seq(&Shape::Str)),
    Field::required("submissions", Shape::Seq(&SUBMISSION)),
]);

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Check `value` against `shape`, returning every violation in document order.
pub fn check(value: &Value, shape: &Shape) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_at(value, shape, "", &mut issues);
    issues
}

fn check_at(value: &Value, shape: &Shape, path: &str, issues: &mut Vec<Issue>) {
    let push = |issues: &mut Vec<Issue>, message: String| {
        issues.push(Issue {
            field: path.to_string(),
            message,
        })
    };

    match shape {
        Shape::Str => {
            if !value.is_string() {
                push(issues, format!("expected a string, found {}", kind(value)));
            }
        }
        Shape::Scalar => {
            if !(value.is_string() || value.is_number()) {
                push(issues, format!("expected a string or number, found {}", kind(value)));
            }
        }
        Shape::Date => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {}
            Some(s) => push(issues, format!("'{s}' is not a date (expected YYYY-MM-DD)")),
            None => push(issues, format!("expected a date, found {}", kind(value))),
        },
        Shape::AppName => match value.as_str() {
            Some(s) if paths::is_valid_app_name(s) => {}
            Some(s) => push(issues, format!(
                "'{s}' is not a valid app name (1-32 lowercase letters or digits)"
            )),
            None => push(issues, format!("expected an app name, found {}", kind(value))),
        },
        Shape::Seq(item) => match value.as_sequence() {
            Some(items) => {
                for (i, v) in items.iter().enumerate() {
                    check_at(v, item, &format!("{path}[{i}]"), issues);
                }
            }
            None => push(issues, format!("expected a sequence, found {}", kind(value))),
        },
        Shape::Map(fields) => {
            let Some(map) = value.as_mapping() else {
                push(issues, format!("expected a mapping, found {}", kind(value)));
                return;
            };
            for field in fields.iter() {
                let child = join(path, field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) if field.required => issues.push(Issue {
                        field: child,
                        message: "missing required field".to_string(),
                    }),
                    None | Some(Value::Null) => {}
                    Some(v) => check_at(v, &field.shape, &child, issues),
                }
            }
        }
    }
}

/// Append a key to a dotted field path.
pub fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Render a scalar as a plain string (used for identifiers).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
