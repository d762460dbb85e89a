//! Normalizer
//!
//! Expands author-friendly entity shorthand into the canonical mapping form
//! before validation:
//!
//! - a sequence of bare field names becomes a typed field mapping,
//! - a field with a null descriptor gets one inferred from its name,
//! - every `relationships.belongsTo` target without a matching foreign key
//!   gets one synthesized.
//!
//! Pure and infallible. Anything it does not recognise is passed through
//! untouched so the validator can report it.

use crate::inflect;
use crate::model::{is_reserved_key, RelationTarget};
use serde_yaml::{Mapping, Value};

/// Normalize the raw `models` mapping
#[must_use]
pub fn normalize_entities(raw: &Mapping) -> Mapping {
    raw.iter()
        .map(|(name, body)| (name.clone(), normalize_entity(body)))
        .collect()
}

fn normalize_entity(body: &Value) -> Value {
    let mut fields = match body {
        Value::Sequence(items) => match expand_field_list(items) {
            Some(fields) => fields,
            None => return body.clone(),
        },
        Value::Mapping(map) => fill_null_descriptors(map),
        _ => return body.clone(),
    };
    synthesize_belongs_to_keys(&mut fields);
    Value::Mapping(fields)
}

// `[id, title, user_id, timestamps]` → typed mapping. Non-string items make
// the whole list invalid shorthand.
fn expand_field_list(items: &[Value]) -> Option<Mapping> {
    let mut fields = Mapping::new();
    for item in items {
        let name = item.as_str()?;
        for (field, descriptor) in infer_fields(name) {
            fields.insert(Value::String(field), Value::String(descriptor));
        }
    }
    Some(fields)
}

fn fill_null_descriptors(map: &Mapping) -> Mapping {
    let mut fields = Mapping::new();
    for (key, value) in map {
        match (key.as_str(), value) {
            (Some(name), Value::Null) if !is_reserved_key(name) => {
                for (field, descriptor) in infer_fields(name) {
                    fields.insert(Value::String(field), Value::String(descriptor));
                }
            }
            _ => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
    fields
}

/// Canonical field(s) for a bare name, by naming convention
#[must_use]
pub fn infer_fields(name: &str) -> Vec<(String, String)> {
    match name {
        "timestamps" => vec![
            ("created_at".into(), "timestamp nullable".into()),
            ("updated_at".into(), "timestamp nullable".into()),
        ],
        "softDeletes" | "soft_deletes" => {
            vec![("deleted_at".into(), "timestamp nullable".into())]
        }
        _ => vec![(name.to_string(), infer_descriptor(name).to_string())],
    }
}

/// Descriptor for a single field name
#[must_use]
pub fn infer_descriptor(name: &str) -> &'static str {
    match name {
        "id" => "id",
        "email" | "slug" => "string unique",
        "uuid" => "uuid",
        "quantity" => "integer",
        "price" | "amount" | "total" => "decimal:8,2",
        "body" | "content" | "description" => "text",
        _ if name.ends_with("_id") => "id",
        _ if name.ends_with("_at") => "timestamp nullable",
        _ if name.ends_with("_date") => "date",
        _ if name.starts_with("is_") || name.starts_with("has_") => "boolean default:false",
        _ if name.ends_with("_count") => "integer",
        _ => "string",
    }
}

fn synthesize_belongs_to_keys(fields: &mut Mapping) {
    let targets = belongs_to_targets(fields);
    for target in targets {
        let key = format!(
            "{}_id",
            inflect::singular(&target.alias.clone().unwrap_or_else(|| inflect::snake(&target.entity)))
        );
        if is_reserved_key(&key) || fields.contains_key(key.as_str()) {
            continue;
        }
        let descriptor = match &target.alias {
            Some(_) => format!("id:{}", target.entity),
            None => "id".to_string(),
        };
        fields.insert(Value::String(key), Value::String(descriptor));
    }
}

fn belongs_to_targets(fields: &Mapping) -> Vec<RelationTarget> {
    let Some(Value::Mapping(relationships)) = fields.get("relationships") else {
        return Vec::new();
    };
    match relationships.get("belongsTo") {
        Some(Value::String(list)) => split_references(list),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_references)
            .collect(),
        _ => Vec::new(),
    }
}

/// Split `User, Tag:labels` into targets
#[must_use]
pub fn split_references(list: &str) -> Vec<RelationTarget> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RelationTarget::parse)
        .collect()
}
