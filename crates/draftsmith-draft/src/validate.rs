//! Validator
//!
//! Structural and semantic checks on the (normalized) raw draft. Problems are
//! collected, never thrown: an empty list means the draft is valid.

use crate::inflect;
use crate::model::{is_reserved_key, RelationKind, SeederCategory};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

static ENTITY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("static regex"));
static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("static regex"));
static COLUMN_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex"));
static RELATION_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9]*(:[a-z_][a-z0-9_]*)?$").expect("static regex")
});
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

/// Top-level keys a draft may carry
pub const TOP_LEVEL_KEYS: &[&str] = &["schema_version", "models", "actions", "pages", "routes"];

/// Validate a draft document. Returns every problem found.
#[must_use]
pub fn validate(draft: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Value::Mapping(root) = draft else {
        errors.push("draft must be a mapping at the top level".to_string());
        return errors;
    };

    for key in root.keys() {
        match key.as_str() {
            Some(k) if TOP_LEVEL_KEYS.contains(&k) => {}
            Some(k) => errors.push(format!("unknown top-level key '{k}'")),
            None => errors.push("top-level keys must be strings".to_string()),
        }
    }

    let mut has_content = false;
    for section in ["models", "actions", "pages"] {
        match root.get(section) {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(map)) => has_content |= !map.is_empty(),
            Some(_) => errors.push(format!("'{section}' must be a mapping")),
        }
    }
    if !has_content {
        errors.push("draft must define at least one of 'models', 'actions' or 'pages'".to_string());
    }

    match root.get("schema_version") {
        None | Some(Value::String(_) | Value::Number(_)) => {}
        Some(_) => errors.push("'schema_version' must be a string".to_string()),
    }
    match root.get("routes") {
        None | Some(Value::Null | Value::Mapping(_)) => {}
        Some(_) => errors.push("'routes' must be a mapping".to_string()),
    }

    if let Some(Value::Mapping(models)) = root.get("models") {
        for (name, body) in models {
            validate_entity(name, body, &mut errors);
        }
    }
    if let Some(Value::Mapping(actions)) = root.get("actions") {
        for (name, body) in actions {
            validate_action(name, body, &mut errors);
        }
    }
    if let Some(Value::Mapping(pages)) = root.get("pages") {
        for name in pages.keys() {
            match name.as_str() {
                Some(n) if IDENTIFIER.is_match(n) => {}
                _ => errors.push(format!("pages: invalid page name {}", describe(name))),
            }
        }
    }
    for section in ["models", "actions", "pages"] {
        if let Some(Value::Mapping(map)) = root.get(section) {
            check_name_collisions(section, map, &mut errors);
        }
    }

    errors
}

// Output paths are keyed by the snake_case name, so `HttpRequest` and
// `HTTPRequest` would write the same files.
fn check_name_collisions(section: &str, names: &Mapping, errors: &mut Vec<String>) {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for name in names.keys().filter_map(Value::as_str) {
        let snake = inflect::snake(name);
        if let Some(first) = seen.get(&snake) {
            errors.push(format!(
                "{section}.{name}: collides with '{first}' (both map to '{snake}')"
            ));
        } else {
            seen.insert(snake, name);
        }
    }
}

fn validate_entity(name: &Value, body: &Value, errors: &mut Vec<String>) {
    let Some(name) = name.as_str() else {
        errors.push(format!("models: entity name {} must be a string", describe(name)));
        return;
    };
    if !ENTITY_NAME.is_match(name) {
        errors.push(format!(
            "models.{name}: entity names must be capitalized identifiers (e.g. 'Post')"
        ));
    } else if !inflect::is_singular(name) {
        errors.push(format!(
            "models.{name}: entity names must be singular (did you mean '{}'?)",
            inflect::singular(name)
        ));
    }

    let Value::Mapping(fields) = body else {
        errors.push(format!(
            "models.{name}: entity must be a mapping of fields or a list of field names"
        ));
        return;
    };

    for (key, value) in fields {
        let Some(key) = key.as_str() else {
            errors.push(format!("models.{name}: field name {} must be a string", describe(key)));
            continue;
        };
        let at = format!("models.{name}.{key}");
        match key {
            "relationships" => validate_relationships(&at, value, errors),
            "seeder" => validate_seeder(&at, value, errors),
            "softDeletes" | "timestamps" => {
                if !value.is_bool() {
                    errors.push(format!("{at}: must be true or false"));
                }
            }
            "traits" => validate_traits(&at, value, errors),
            _ => validate_field(&at, key, value, errors),
        }
    }
}

fn validate_field(at: &str, key: &str, value: &Value, errors: &mut Vec<String>) {
    debug_assert!(!is_reserved_key(key));
    if !FIELD_NAME.is_match(key) {
        errors.push(format!("{at}: field names must be snake_case identifiers"));
    }
    let descriptor = match value {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => {
            errors.push(format!(
                "{at}: field descriptor must be a non-empty string like 'string:255 unique'"
            ));
            return;
        }
    };
    let head = descriptor.split_whitespace().next().unwrap_or_default();
    let column_type = head.split_once(':').map_or(head, |(ty, _)| ty);
    if !COLUMN_TYPE.is_match(column_type) {
        errors.push(format!("{at}: invalid column type '{column_type}'"));
    }
}

fn validate_relationships(at: &str, value: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(kinds) = value else {
        errors.push(format!("{at}: must be a mapping of relation kind to targets"));
        return;
    };
    for (kind, targets) in kinds {
        let Some(kind_name) = kind.as_str().filter(|k| RelationKind::from_key(k).is_some()) else {
            let known: Vec<_> = RelationKind::ALL.iter().map(|k| k.key()).collect();
            errors.push(format!(
                "{at}: unknown relation kind {} (expected one of {})",
                describe(kind),
                known.join(", ")
            ));
            continue;
        };
        let references: Vec<&str> = match targets {
            Value::String(list) => list.split(',').map(str::trim).collect(),
            Value::Sequence(items) => {
                let strings: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
                if let Some(strings) = strings {
                    strings.into_iter().map(str::trim).collect()
                } else {
                    errors.push(format!("{at}.{kind_name}: targets must be strings"));
                    continue;
                }
            }
            _ => {
                errors.push(format!(
                    "{at}.{kind_name}: targets must be a string or a list of strings"
                ));
                continue;
            }
        };
        for reference in references {
            if !RELATION_REF.is_match(reference) {
                errors.push(format!(
                    "{at}.{kind_name}: invalid target '{reference}' (expected 'Entity' or 'Entity:alias')"
                ));
            }
        }
    }
}

fn validate_seeder(at: &str, value: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(seeder) = value else {
        errors.push(format!("{at}: must be a mapping with 'category' and 'count'"));
        return;
    };
    for key in seeder.keys() {
        if !matches!(key.as_str(), Some("category" | "count" | "optional")) {
            errors.push(format!("{at}: unknown seeder key {}", describe(key)));
        }
    }
    match seeder.get("category").and_then(Value::as_str) {
        Some(c) if SeederCategory::from_name(c).is_some() => {}
        _ => errors.push(format!(
            "{at}.category: must be one of {}",
            SeederCategory::NAMES.join(", ")
        )),
    }
    match seeder.get("count").and_then(Value::as_u64) {
        Some(n) if u32::try_from(n).is_ok() => {}
        _ => errors.push(format!("{at}.count: must be a non-negative integer")),
    }
    if let Some(optional) = seeder.get("optional") {
        if !optional.is_bool() {
            errors.push(format!("{at}.optional: must be true or false"));
        }
    }
}

fn validate_traits(at: &str, value: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(traits) = value else {
        errors.push(format!("{at}: must be a mapping of flag name to true/false"));
        return;
    };
    for (name, flag) in traits {
        if name.as_str().is_none() || !flag.is_bool() {
            errors.push(format!("{at}: flag {} must map to true or false", describe(name)));
        }
    }
}

fn validate_action(name: &Value, body: &Value, errors: &mut Vec<String>) {
    let Some(name) = name.as_str().filter(|n| IDENTIFIER.is_match(n)) else {
        errors.push(format!("actions: invalid action name {}", describe(name)));
        return;
    };
    let at = format!("actions.{name}");
    let action = match body {
        Value::Null => return,
        Value::Mapping(map) => map,
        _ => {
            errors.push(format!("{at}: action must be a mapping"));
            return;
        }
    };

    for key in action.keys() {
        if !matches!(key.as_str(), Some("model" | "params" | "return")) {
            errors.push(format!("{at}: unknown key {}", describe(key)));
        }
    }

    let model = action.get("model");
    match model {
        None => {}
        Some(Value::String(m)) if ENTITY_NAME.is_match(m) => {}
        Some(other) => errors.push(format!("{at}.model: invalid entity reference {}", describe(other))),
    }

    match action.get("params") {
        None | Some(Value::Null) => {}
        Some(Value::Sequence(params)) => {
            for (idx, param) in params.iter().enumerate() {
                validate_param(&format!("{at}.params[{idx}]"), param, errors);
            }
        }
        Some(_) => errors.push(format!("{at}.params: must be a list")),
    }

    match action.get("return") {
        None => {}
        Some(Value::String(r)) if r == "void" => {}
        Some(Value::String(r)) if r == "model" => {
            if model.is_none() {
                errors.push(format!("{at}.return: 'model' requires the action to declare a model"));
            }
        }
        Some(Value::String(r)) if ENTITY_NAME.is_match(r) => {}
        Some(other) => errors.push(format!(
            "{at}.return: must be 'void', 'model' or an entity name, got {}",
            describe(other)
        )),
    }
}

fn validate_param(at: &str, param: &Value, errors: &mut Vec<String>) {
    match param {
        Value::String(name) if IDENTIFIER.is_match(name) => {}
        Value::Mapping(map) => {
            let has_name = map
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|n| IDENTIFIER.is_match(n));
            if !has_name {
                errors.push(format!("{at}: parameter mapping needs a valid 'name'"));
            }
            if let Some(ty) = map.get("type") {
                if ty.as_str().is_none() {
                    errors.push(format!("{at}.type: must be a string"));
                }
            }
            for key in map.keys() {
                if !matches!(key.as_str(), Some("name" | "type")) {
                    errors.push(format!("{at}: unknown parameter key {}", describe(key)));
                }
            }
        }
        other => errors.push(format!("{at}: invalid parameter {}", describe(other))),
    }
}

// Short rendering of a YAML value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}
