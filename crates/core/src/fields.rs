//! Field catalog lookups and value coercion.
//!
//! The tracker exposes a flat catalog of fields (system and custom), each
//! with an identifier, a display name, and for custom fields a declared
//! schema type. Users refer to fields by display name; submissions need the
//! identifier and a value of the right JSON shape. The functions here do
//! that mapping: name resolution, schema-driven coercion of directive
//! values, and the reverse direction of rendering a raw field value for
//! display.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// One entry from the tracker's field catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub schema: Option<FieldSchema>,
}

/// Declared schema for a field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Error type for field coercion.
#[derive(Debug)]
pub enum FieldError {
    UnknownSchemaType(String),
    BadNumber(String),
    BadDate(String),
    BadLiteral(String),
    UnsupportedShape(String),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::UnknownSchemaType(kind) => write!(f, "Unknown schema type: {}", kind),
            FieldError::BadNumber(value) => write!(f, "Not a number: {}", value),
            FieldError::BadDate(value) => {
                write!(f, "Not a YYYY-MM-DD date: {}", value)
            }
            FieldError::BadLiteral(value) => write!(f, "Unparseable literal: {}", value),
            FieldError::UnsupportedShape(value) => {
                write!(f, "Unable to coerce against current value: {}", value)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// A coerced field value ready for submission, or a deferred user lookup
/// the caller must resolve against the directory before submitting.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(Value),
    UserLookup(String),
}

/// Resolves a display name to a field identifier.
///
/// A leading `^` escapes resolution and passes the rest through untouched.
/// Otherwise the custom-field catalog is searched for a matching display
/// name, and a name with no catalog entry is assumed to already be an
/// identifier.
pub fn resolve_field_id(fields: &[FieldInfo], name: &str) -> String {
    if let Some(stripped) = name.strip_prefix('^') {
        return stripped.to_string();
    }
    for field in fields.iter().filter(|field| field.custom) {
        if field.name == name {
            return field.id.clone();
        }
    }
    name.to_string()
}

/// Schema type for a field identifier. Custom fields carry their declared
/// type; `assignee` and `priority` have fixed mappings.
pub fn schema_type_for(fields: &[FieldInfo], field_id: &str) -> Option<String> {
    if field_id == "assignee" {
        return Some("user".to_string());
    }
    if field_id == "priority" {
        return Some("dict".to_string());
    }
    fields
        .iter()
        .filter(|field| field.custom)
        .find(|field| field.id == field_id)
        .and_then(|field| field.schema.as_ref().map(|schema| schema.kind.clone()))
}

/// Heuristic conversion for values with no usable schema type: a value that
/// reads as a `{"value"...}`, `{"name"...}`, or `{"id"...}` object literal
/// is parsed as one, with square brackets lifting the result into a list.
pub fn object_convert(raw: &str) -> Value {
    let mut text = raw;
    let listed = text.starts_with('[') && text.ends_with(']');
    if listed {
        text = &text[1..text.len() - 1];
    }

    let lowered = text.to_lowercase();
    let mut value = Value::String(text.to_string());
    for key in ["value", "name", "id"] {
        if lowered.starts_with(&format!("{{\"{}", key)) || lowered.starts_with(&format!("{{'{}", key))
        {
            if let Ok(parsed) = serde_json::from_str(&text.replace('\'', "\"")) {
                value = parsed;
                break;
            }
        }
    }

    if listed {
        Value::Array(vec![value])
    } else {
        value
    }
}

/// Coerces a raw directive value against a declared schema type.
pub fn coerce_field_value(schema_type: &str, raw: &str) -> Result<Coerced, FieldError> {
    match schema_type {
        "string" => Ok(Coerced::Value(Value::String(raw.to_string()))),
        "dict" => {
            if !raw.contains(':') {
                Ok(Coerced::Value(json!({ "name": raw })))
            } else {
                serde_json::from_str(&raw.replace('\'', "\""))
                    .map(Coerced::Value)
                    .map_err(|_| FieldError::BadLiteral(raw.to_string()))
            }
        }
        "user" => Ok(Coerced::UserLookup(raw.to_string())),
        "number" => raw
            .parse::<f64>()
            .map(|number| Coerced::Value(json!(number)))
            .map_err(|_| FieldError::BadNumber(raw.to_string())),
        "date" => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| Coerced::Value(Value::String(date.format("%Y-%m-%d").to_string())))
            .map_err(|_| FieldError::BadDate(raw.to_string())),
        "array" => {
            let cleaned: String = raw
                .chars()
                .filter(|c| !matches!(c, ' ' | '\t' | '\r'))
                .collect();
            Ok(Coerced::Value(Value::Array(vec![object_convert(&cleaned)])))
        }
        other => Err(FieldError::UnknownSchemaType(other.to_string())),
    }
}

/// Coerces `raw` for a field, falling back to the object heuristic when the
/// schema type is unknown or the typed parse fails.
pub fn convert_field_value(schema_type: Option<&str>, raw: &str) -> Coerced {
    match schema_type {
        Some(kind) => {
            coerce_field_value(kind, raw).unwrap_or_else(|_| Coerced::Value(object_convert(raw)))
        }
        None => Coerced::Value(object_convert(raw)),
    }
}

/// Interprets a `--forced` value as a literal JSON document, or as a bare
/// string when it does not parse as one.
pub fn forced_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Coerces a replacement value based on the shape of the field's current
/// value, for updates to populated system fields.
pub fn coerce_like_current(current: &Value, value: &str) -> Result<Coerced, FieldError> {
    match current {
        Value::Object(shape)
            if shape.contains_key("displayName") || shape.contains_key("emailAddress") =>
        {
            Ok(Coerced::UserLookup(value.to_string()))
        }
        Value::Object(shape) if shape.contains_key("name") => {
            Ok(Coerced::Value(json!({ "name": value })))
        }
        Value::Array(_) => Ok(Coerced::Value(json!([{ "name": value }]))),
        Value::String(_) => Ok(Coerced::Value(Value::String(value.to_string()))),
        other => Err(FieldError::UnsupportedShape(other.to_string())),
    }
}

/// Locates the raw-field key matching `fieldname` under the configured case
/// policy, returning the key in its stored casing.
pub fn find_field_key<'a>(
    raw_fields: &'a Map<String, Value>,
    fieldname: &str,
    case_sensitive: bool,
) -> Option<&'a str> {
    raw_fields.keys().find_map(|key| {
        let matched = if case_sensitive {
            key.as_str() == fieldname
        } else {
            key.eq_ignore_ascii_case(fieldname)
        };
        matched.then(|| key.as_str())
    })
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Human display form of a raw field value.
///
/// Null renders as `"None"`, objects render as their `name`, lists join
/// their members' names (or planning-poker votes) with commas, and an
/// optional `substruct` key drills one level into an object first.
pub fn field_display_value(value: &Value, substruct: Option<&str>) -> String {
    if value.is_null() {
        return "None".to_string();
    }
    if let Value::String(text) = value {
        return text.clone();
    }

    if let Some(key) = substruct {
        return match value.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(sub) => match sub.get("name") {
                Some(Value::String(name)) => name.clone(),
                _ => display_scalar(sub),
            },
        };
    }

    if let Some(Value::String(name)) = value.get("name") {
        return name.clone();
    }

    if let Value::Array(members) = value {
        let mut parts = Vec::new();
        for member in members {
            if let Some(Value::String(name)) = member.get("name") {
                parts.push(name.clone());
            } else if let Some(vote) = member.get("vote") {
                parts.push(display_scalar(vote));
            }
        }
        return parts.join(",");
    }

    match value {
        Value::Object(_) => value.to_string(),
        Value::Number(number) => number.to_string(),
        _ => "(undecoded)".to_string(),
    }
}

/// Identifier-to-name map of the custom fields, embedded in machine-readable
/// issue dumps so consumers can decode `customfield_*` keys.
pub fn custom_field_map(fields: &[FieldInfo]) -> Value {
    let mut map = Map::new();
    for field in fields.iter().filter(|field| field.custom) {
        map.insert(field.id.clone(), Value::String(field.name.clone()));
    }
    Value::Object(map)
}

/// Follows a dotted path into a raw value; numeric segments index arrays.
/// This backs the per-field `render` configuration.
pub fn drill<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Array(members) => members.get(segment.parse::<usize>().ok()?)?,
            other => other.get(segment)?,
        };
    }
    Some(current)
}
